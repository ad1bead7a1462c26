//! Line/column lookups over a YAML text
//!
//! One [`LineIndex`] is built per file and shared by every manifest parsed
//! from it, so positions are file-relative across all documents.

use serde::Serialize;

/// A 1-based line/column position in a source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Byte offsets of every line start in a text
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    text: String,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );

        Self {
            line_starts,
            text: text.to_string(),
        }
    }

    /// Number of lines in the text
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Resolves a byte offset to a position. Offsets past the end clamp to
    /// the last line; the column counts characters, not bytes.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let column = self
            .text
            .get(start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(offset - start);

        Position {
            line: line + 1,
            column: column + 1,
        }
    }
}

/// Returns the byte offset at which each YAML document's content starts.
///
/// The result has one entry per document in the stream; documents without
/// any content (a bare `---`) yield `None`. Document markers are only
/// recognized at column 0, which is also the only place YAML allows them.
pub fn document_offsets(text: &str) -> Vec<Option<usize>> {
    let mut offsets = Vec::new();
    let mut open = false;
    let mut current: Option<usize> = None;
    let mut line_start = 0;

    for line in text.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);

        if let Some(rest) = marker_rest(body, "---") {
            if open {
                offsets.push(current.take());
            }
            open = true;
            current = content_start(rest).map(|i| line_start + 3 + i);
        } else if marker_rest(body, "...").is_some() {
            if open {
                offsets.push(current.take());
            }
            open = false;
        } else if body.starts_with('%') && !open {
            // directive
        } else if let Some(i) = content_start(body) {
            if !open {
                open = true;
                current = None;
            }
            if current.is_none() {
                current = Some(line_start + i);
            }
        }

        line_start += line.len();
    }

    if open {
        offsets.push(current);
    }

    offsets
}

/// Returns what follows a document marker, if `line` starts with one
fn marker_rest<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c == ' ' || c == '\t' => Some(rest),
        Some(_) => None,
    }
}

/// Byte index of the first non-blank, non-comment character
fn content_start(s: &str) -> Option<usize> {
    let i = s.find(|c: char| c != ' ' && c != '\t')?;
    if s[i..].starts_with('#') {
        None
    } else {
        Some(i)
    }
}
