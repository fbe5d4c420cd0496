use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Pdf,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            _ => Self::PlainText,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::PlainText)
    }
}

pub fn extract_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    match DocumentFormat::from_path(path) {
        DocumentFormat::PlainText => extract_plain_text(path),
        DocumentFormat::Pdf => extract_pdf(path),
    }
}

fn extract_plain_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes).map_err(|e| load_error(path, format!("not valid UTF-8: {e}")))
}

fn extract_pdf(path: &Path) -> Result<String> {
    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|e| load_error(path, format!("failed to extract PDF text: {e}")))?;
    join_pages(path, pages)
}

fn join_pages(path: &Path, pages: Vec<String>) -> Result<String> {
    let pages: Vec<String> = pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect();

    if pages.is_empty() {
        return Err(load_error(path, "PDF contains no extractable text"));
    }
    Ok(pages.join("\n"))
}

fn load_error(path: &Path, message: impl Into<String>) -> Error {
    Error::Load {
        path: PathBuf::from(path),
        message: message.into(),
    }
}
