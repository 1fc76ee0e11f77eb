//! Error taxonomy of the revolution pipeline

use std::fmt;
use std::path::PathBuf;

use rv_cad::KernelError;

/// Step of an export target at which it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    CreateDirectory,
    Tessellate,
    WriteMesh,
    WriteStep,
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportStage::CreateDirectory => "create directory",
            ExportStage::Tessellate => "tessellate",
            ExportStage::WriteMesh => "write mesh",
            ExportStage::WriteStep => "write STEP",
        };
        f.write_str(name)
    }
}

/// Errors of the revolution pipeline
#[derive(Debug, Clone, thiserror::Error)]
pub enum RevolverError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Revolution failed: {0}")]
    RevolutionFailure(String),

    #[error("Export of {path:?} failed during {stage}: {reason}")]
    ExportFailure {
        path: PathBuf,
        stage: ExportStage,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RevolverError {
    /// Map a kernel error raised while constructing curves, wires or faces
    pub fn from_construction(err: KernelError) -> Self {
        match err {
            KernelError::InvalidProfile(msg) | KernelError::DegenerateGeometry(msg) => {
                RevolverError::DegenerateGeometry(msg)
            }
            other => RevolverError::DegenerateGeometry(other.to_string()),
        }
    }

    /// Map a kernel error raised by the revolution sweep
    pub fn from_revolution(err: KernelError) -> Self {
        match err {
            KernelError::RevolutionFailed(msg) => RevolverError::RevolutionFailure(msg),
            other => RevolverError::RevolutionFailure(other.to_string()),
        }
    }

    /// Map a kernel error raised while exporting to `path`
    pub fn export(path: impl Into<PathBuf>, stage: ExportStage, reason: impl fmt::Display) -> Self {
        RevolverError::ExportFailure {
            path: path.into(),
            stage,
            reason: reason.to_string(),
        }
    }
}

/// Result type for pipeline operations
pub type RevolverResult<T> = Result<T, RevolverError>;
