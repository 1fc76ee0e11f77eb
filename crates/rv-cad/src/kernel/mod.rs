//! Geometry kernel abstraction
//!
//! The pipeline talks to geometry through [`GeometryKernel`]. The Truck
//! backend is built with the default `truck` feature; without it
//! [`default_kernel`] hands out a [`NullKernel`].

mod traits;
#[cfg(feature = "truck")]
mod truck;

pub use traits::*;
#[cfg(feature = "truck")]
pub use truck::TruckKernel;
