//! Output formatting for CLI commands

use serde::{Deserialize, Serialize};

/// Output format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a status line (text only, ignored in JSON mode)
    pub fn status(&self, message: &str) {
        if self.is_text() {
            println!("{}", message);
        }
    }

    /// Prints a headed bullet list to stdout (text only)
    pub fn list(&self, header: &str, items: &[String]) {
        if self.is_text() && !items.is_empty() {
            println!("{}", header);
            for item in items {
                println!("   - {}", item);
            }
        }
    }

    /// Prints a headed bullet list of problems to stderr, in every format
    pub fn problems(&self, header: &str, items: &[String]) {
        eprintln!("{}", header);
        for item in items {
            eprintln!("   - {}", item);
        }
    }

    /// Prints structured data
    ///
    /// Text mode pretty-prints; JSON mode emits a single line.
    pub fn data<T: Serialize>(&self, data: &T) {
        let rendered = match self.format {
            OutputFormat::Text => serde_json::to_string_pretty(data),
            OutputFormat::Json => serde_json::to_string(data),
        };

        if let Ok(json) = rendered {
            println!("{}", json);
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Returns true if using text format
    pub fn is_text(&self) -> bool {
        self.format == OutputFormat::Text
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}
