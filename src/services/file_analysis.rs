// src/services/file_analysis.rs
use crate::error::ServiceError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// What the upload widget hands over. Only the size of the content is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub size: usize,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content_type: Option<String>, size: usize) -> Self {
        Self { name: name.into(), content_type, size }
    }

    pub fn is_pdf(&self) -> bool {
        self.name.to_ascii_lowercase().ends_with(".pdf")
            || self.content_type.as_deref() == Some(PDF_CONTENT_TYPE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub file_name: String,
    pub size: String,
}

pub fn check_file_type(file: &UploadedFile) -> Result<(), ServiceError> {
    if file.is_pdf() {
        Ok(())
    } else {
        Err(ServiceError::Validation("Only PDF files can be analyzed.".into()))
    }
}

/// Analysis is not implemented: the content is never inspected and the
/// report only carries the name and size.
pub fn analyze_file(file: &UploadedFile) -> Result<FileReport, ServiceError> {
    Ok(FileReport {
        file_name: file.name.clone(),
        size: format_file_size(file.size),
    })
}

/// Human-readable size in base 1024, e.g. `0 Bytes`, `1.5 KB`, `2 MB`.
pub fn format_file_size(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
