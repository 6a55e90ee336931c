//! Reading documents from disk or stdin
//!
//! Inputs are read once into memory; the parser and the inference engine never
//! touch the filesystem.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::ParseResult;

/// Path argument that means "read standard input"
pub const STDIN_MARKER: &str = "-";

#[derive(Debug, Error)]
pub enum InputError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read standard input: {0}")]
    Stdin(std::io::Error),

    #[error("Invalid task JSON in {origin}: {source}")]
    Json {
        origin: String,
        source: serde_json::Error,
    },
}

/// Where a document came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Stdin,
}

impl Source {
    pub fn from_arg(arg: &Path) -> Self {
        if arg.as_os_str() == STDIN_MARKER {
            Source::Stdin
        } else {
            Source::File(arg.to_path_buf())
        }
    }

    /// Returns true if the source looks like task JSON rather than a checklist
    pub fn is_json(&self) -> bool {
        match self {
            Source::File(path) => path.extension().is_some_and(|e| e == "json"),
            Source::Stdin => false,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::Stdin => "<stdin>".to_string(),
        }
    }

    /// Reads the whole source into memory
    pub fn read(&self) -> Result<String, InputError> {
        match self {
            Source::File(path) => read_file(path),
            Source::Stdin => {
                let mut content = String::new();
                std::io::stdin()
                    .read_to_string(&mut content)
                    .map_err(InputError::Stdin)?;
                Ok(content)
            }
        }
    }
}

pub fn read_file(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => InputError::NotFound(path.to_path_buf()),
        _ => InputError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Decodes the `{"sections": [...]}` interchange form
pub fn parse_json_document(content: &str, origin: &str) -> Result<ParseResult, InputError> {
    serde_json::from_str(content).map_err(|source| InputError::Json {
        origin: origin.to_string(),
        source,
    })
}

/// Encodes sections in the interchange form
pub fn to_json_document(result: &ParseResult) -> serde_json::Value {
    serde_json::json!({ "sections": result.sections })
}
