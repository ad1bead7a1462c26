//! Output formatting for CLI commands

use serde::Serialize;

use crate::domain::RenderedNode;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
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

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                // Text callers normally print themselves; this is a fallback
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{}", json);
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Prints a tree with two-space indentation per level (text only)
    pub fn tree(&self, nodes: &[RenderedNode]) {
        fn print(nodes: &[RenderedNode], indent: usize) {
            for node in nodes {
                match &node.open_at {
                    Some(at) => println!(
                        "{}{}  ({}:{}:{})",
                        "  ".repeat(indent),
                        node.label,
                        at.path.display(),
                        at.line,
                        at.column
                    ),
                    None => println!("{}{}", "  ".repeat(indent), node.label),
                }
                print(&node.children, indent + 1);
            }
        }

        if self.is_text() {
            print(nodes, 0);
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
