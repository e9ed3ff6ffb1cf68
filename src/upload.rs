//! Upload form state: one candidate file plus its description.
//!
//! Validation all happens locally, before any network call; the submit
//! command only reads file bytes once the form has been accepted.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum ValidationError {
    #[error("{path} is not a PDF file")]
    #[diagnostic(help("only PDF documents are accepted for scanning"))]
    NotPdf { path: PathBuf },

    #[error("no file selected")]
    MissingFile,

    #[error("description must not be empty")]
    MissingDescription,
}

/// Everything needed for one creation request, produced by a validated
/// form.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpload {
    pub description: String,
    pub path: PathBuf,
    pub filename: String,
}

/// Form state for a submission. At most one candidate file is active at
/// a time; selecting a new valid file replaces it, while a rejected
/// selection leaves the previous candidate untouched.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    description: String,
    file: Option<PathBuf>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Accept `path` as the active candidate iff its declared type is
    /// PDF. Rejection has no effect besides the returned notice.
    pub fn select_file(&mut self, path: impl Into<PathBuf>) -> Result<(), ValidationError> {
        let path = path.into();

        if !is_pdf(&path) {
            return Err(ValidationError::NotPdf { path });
        }

        self.file = Some(path);
        Ok(())
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Refuse locally unless both a file and a non-blank description are
    /// present. No network call happens before this passes.
    pub fn validate(&self) -> Result<PendingUpload, ValidationError> {
        let Some(path) = self.file.clone() else {
            return Err(ValidationError::MissingFile);
        };

        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingDescription);
        }

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or(ValidationError::MissingFile)?;

        Ok(PendingUpload {
            description: self.description.clone(),
            path,
            filename,
        })
    }

    /// Reset after a successful submission.
    pub fn clear(&mut self) {
        self.description.clear();
        self.file = None;
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
