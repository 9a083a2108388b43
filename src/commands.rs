//! CLI command bodies: list, resolve, refs.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::Config;
use crate::diagnostics;
use crate::error::Error;
use crate::index::ReferenceTree;
use crate::providers::normalize_path;
use crate::service::ReferenceService;
use crate::types::{FileReference, Position};

/// Print every reference in one YAML document.
///
/// # Errors
///
/// Returns errors from reading the file or loading the config.
pub fn list(root: &Path, file: &Path, json: bool) -> Result<ExitCode, Error> {
    let root = absolutize(root)?;
    let file = absolutize(file)?;
    let text = std::fs::read_to_string(&file)?;

    let config = Config::load(&root)?;
    let mut service = ReferenceService::new(root, config);
    let references = service.all_references(&text, &file);

    if json {
        print_json(&references);
    } else if references.is_empty() {
        println!("no references in {}", file.display());
    } else {
        for reference in &references {
            print_reference_line(reference);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Resolve the reference under a 1-based `LINE:COLUMN` cursor.
///
/// Exit codes: 0 when the reference resolves to an existing file or is
/// external (reported informationally), 2 when it resolves to a missing
/// path. No reference under the cursor is an error (exit 1 via main).
///
/// # Errors
///
/// Returns `Error::InvalidPosition` for a malformed cursor argument,
/// `Error::NoReferenceAtPosition` when nothing sits under the cursor, and
/// I/O or config errors from setup.
pub fn resolve(root: &Path, file: &Path, position_arg: &str) -> Result<ExitCode, Error> {
    let root = absolutize(root)?;
    let file = absolutize(file)?;
    let (line, character) = parse_position(position_arg)?;
    let text = std::fs::read_to_string(&file)?;

    let config = Config::load(&root)?;
    let mut service = ReferenceService::new(root, config);

    let position = Position::new(line - 1, character - 1);
    let Some(reference) = service.reference_at_cursor(&text, &file, position) else {
        return Err(Error::NoReferenceAtPosition { file, line, character });
    };

    if reference.is_external {
        let repo = reference.external_repo.as_deref().unwrap_or("<unknown>");
        println!(
            "external reference `{}` lives in repository `{repo}` (not resolved locally)",
            reference.path
        );
        return Ok(ExitCode::SUCCESS);
    }

    if reference.resolved_path.exists() {
        println!(
            "{} -> {}",
            reference.path,
            reference.resolved_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    // Missing on disk: report both halves so the user can tell whether the
    // raw reference or the resolution is at fault.
    diagnostics::print_error(&Error::UnresolvedReference {
        raw: reference.path,
        resolved: reference.resolved_path,
    });
    Ok(ExitCode::from(2))
}

/// Reverse search: print every YAML document referencing `target`.
///
/// # Errors
///
/// Returns `Error::TargetNotFound` when the target does not exist, plus
/// I/O or config errors from setup.
pub fn refs(root: &Path, target: &Path, json: bool) -> Result<ExitCode, Error> {
    let root = absolutize(root)?;
    let target = absolutize(target)?;
    if !target.exists() {
        return Err(Error::TargetNotFound { path: target });
    }

    let config = Config::load(&root)?;
    let mut service = ReferenceService::new(root, config);
    let matches = service.find_references_to_file(&target);
    let tree = ReferenceTree::from_matches(&matches);

    if json {
        print_json(&tree);
    } else if tree.files.is_empty() {
        println!("no references to {}", target.display());
    } else {
        print!("{}", tree.render());
        let total = tree.total_references();
        let files = tree.files.len();
        println!("{total} reference(s) in {files} file(s)");
    }

    Ok(ExitCode::SUCCESS)
}

/// One human-readable line per reference: kind, location, raw text, and
/// where it points.
fn print_reference_line(reference: &FileReference) {
    let line = reference.range.start.line + 1;
    let column = reference.range.start.character + 1;
    let destination = if reference.is_external {
        let repo = reference.external_repo.as_deref().unwrap_or("<unknown>");
        format!("external, repository `{repo}`")
    } else {
        reference.resolved_path.display().to_string()
    };
    println!("{line}:{column}  {}  {} -> {destination}", reference.kind, reference.path);
}

fn print_json<T: serde::Serialize>(value: &T) {
    if let Ok(rendered) = serde_json::to_string_pretty(value) {
        println!("{rendered}");
    }
}

/// Parse a 1-based `LINE:COLUMN` argument.
///
/// # Errors
///
/// Returns `Error::InvalidPosition` for anything that is not two positive
/// integers separated by a colon.
fn parse_position(arg: &str) -> Result<(u32, u32), Error> {
    let invalid = || Error::InvalidPosition { arg: arg.to_string() };

    let (line, character) = arg.split_once(':').ok_or_else(invalid)?;
    let line: u32 = line.trim().parse().map_err(|_| invalid())?;
    let character: u32 = character.trim().parse().map_err(|_| invalid())?;
    if line == 0 || character == 0 {
        return Err(invalid());
    }
    Ok((line, character))
}

/// Make a path absolute against the current directory and collapse
/// `.`/`..` segments, without touching the filesystem beyond cwd lookup.
///
/// # Errors
///
/// Returns `Error::Io` if the current directory cannot be determined.
pub(crate) fn absolutize(path: &Path) -> Result<PathBuf, Error> {
    if path.is_absolute() {
        return Ok(normalize_path(path));
    }
    Ok(normalize_path(&std::env::current_dir()?.join(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_position_accepts_one_based_pairs() {
        assert_eq!(parse_position("12:7").unwrap(), (12, 7));
        assert_eq!(parse_position(" 3 : 1 ").unwrap(), (3, 1));
    }

    #[test]
    fn parse_position_rejects_malformed_and_zero() {
        for bad in ["", "12", "a:b", "0:3", "3:0", "1:2:3"] {
            assert!(
                matches!(parse_position(bad), Err(Error::InvalidPosition { .. })),
                "expected rejection of {bad:?}"
            );
        }
    }

    #[test]
    fn absolutize_collapses_relative_segments() {
        let absolute = absolutize(Path::new("/repo/a/../b/./c.yml")).unwrap();
        assert_eq!(absolute, PathBuf::from("/repo/b/c.yml"));
    }
}
