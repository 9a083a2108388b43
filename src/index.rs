//! Reverse-search tree model: groups matches by source file and decorates
//! each occurrence with a one-line preview and highlight columns, ready for
//! hierarchical display or JSON output.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use crate::types::FileReference;

/// The file → occurrence hierarchy produced by a reverse search.
#[derive(Debug, Serialize)]
pub struct ReferenceTree {
    /// One group per referencing source file, in path order.
    pub files: Vec<FileGroup>,
}

/// All occurrences inside one referencing source file.
#[derive(Debug, Serialize)]
pub struct FileGroup {
    /// Occurrences in document order.
    pub occurrences: Vec<Occurrence>,
    /// Absolute path of the referencing file.
    pub path: PathBuf,
}

/// One reference occurrence with its display preview.
#[derive(Debug, Serialize)]
pub struct Occurrence {
    /// The source line the reference sits on, with highlight columns.
    pub preview: Preview,
    /// The matching reference itself.
    pub reference: FileReference,
}

/// A one-line text preview of an occurrence.
#[derive(Debug, Serialize)]
pub struct Preview {
    /// Highlighted column span within `text`, in UTF-16 units, widened by
    /// one column on each side and clamped to the line.
    pub highlight: (u32, u32),
    /// The full text of the line containing the occurrence's start.
    pub text: String,
}

impl ReferenceTree {
    /// Build the tree from grouped reverse-search results, reading each
    /// source file once for line previews. A file that cannot be re-read
    /// keeps its occurrences with empty preview text.
    pub fn from_matches(matches: &BTreeMap<PathBuf, Vec<FileReference>>) -> Self {
        let files = matches
            .iter()
            .map(|(path, references)| {
                let text = std::fs::read_to_string(path).unwrap_or_default();
                FileGroup {
                    path: path.clone(),
                    occurrences: references
                        .iter()
                        .map(|reference| occurrence_for(reference, &text))
                        .collect(),
                }
            })
            .collect();

        ReferenceTree { files }
    }

    /// Total number of occurrences across all files.
    pub fn total_references(&self) -> usize {
        self.files.iter().map(|group| group.occurrences.len()).sum()
    }

    /// Render the tree as indented text for terminal output.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for group in &self.files {
            let count = group.occurrences.len();
            let _ = writeln!(out, "{} ({count})", group.path.display());
            for occurrence in &group.occurrences {
                let line = occurrence.reference.range.start.line + 1;
                let column = occurrence.reference.range.start.character + 1;
                let _ = writeln!(out, "  {line}:{column}  {}", occurrence.preview.text.trim_end());
            }
        }
        out
    }
}

fn occurrence_for(reference: &FileReference, text: &str) -> Occurrence {
    let start = reference.range.start;
    let line_text = text
        .lines()
        .nth(start.line as usize)
        .unwrap_or_default()
        .to_string();
    let line_len = line_text.encode_utf16().count() as u32;

    // A multi-line occurrence highlights from its start to the end of the
    // preview line.
    let end_character = if reference.range.end.line == start.line {
        reference.range.end.character
    } else {
        line_len
    };

    let highlight = (
        start.character.saturating_sub(1),
        (end_character + 1).min(line_len),
    );

    Occurrence {
        preview: Preview {
            highlight,
            text: line_text,
        },
        reference: reference.clone(),
    }
}
