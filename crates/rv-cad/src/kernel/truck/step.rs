//! STEP (ISO 10303-21) output through truck-stepio

use std::path::Path;

use time::OffsetDateTime;
use time::macros::format_description;
use truck_modeling::Solid as TruckSolid;
use truck_stepio::out::{CompleteStepDisplay, StepHeaderDescriptor, StepModel};

use crate::kernel::{KernelError, KernelResult, StepExportOptions};

const PREPROCESSOR: &str = concat!("revolver ", env!("CARGO_PKG_VERSION"));

/// Current UTC time as an ISO 8601 timestamp
fn timestamp_now() -> KernelResult<String> {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    OffsetDateTime::now_utc()
        .format(&format)
        .map_err(|e| KernelError::StepExport(format!("Failed to format timestamp: {e}")))
}

/// Complete STEP document for a solid
pub(super) fn step_document(
    solid: &TruckSolid,
    file_name: &str,
    options: &StepExportOptions,
) -> KernelResult<String> {
    let time_stamp = match &options.timestamp {
        Some(timestamp) => timestamp.clone(),
        None => timestamp_now()?,
    };
    let header = StepHeaderDescriptor {
        file_name: file_name.to_owned(),
        time_stamp,
        authors: options.author.iter().cloned().collect(),
        organization: options.organization.iter().cloned().collect(),
        organization_system: PREPROCESSOR.to_owned(),
        authorization: String::new(),
    };

    let compressed = solid.compress();
    Ok(CompleteStepDisplay::new(StepModel::from(&compressed), header).to_string())
}

/// Write a solid to `path` as a STEP file
pub(super) fn write_step(
    solid: &TruckSolid,
    path: &Path,
    options: &StepExportOptions,
) -> KernelResult<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let document = step_document(solid, &file_name, options)?;
    std::fs::write(path, document).map_err(|e| KernelError::FileIo(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_shape() {
        let stamp = timestamp_now().unwrap();
        assert_eq!(stamp.len(), 19);
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[10..11], "T");
        assert!(stamp[..4].chars().all(|c| c.is_ascii_digit()));
    }
}
