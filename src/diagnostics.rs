use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is a
/// concrete next step, how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::UnresolvedReference { raw, resolved } => format!(
            "\
# Error: Unresolved Reference

`{raw}` resolved to `{}` which does not exist.

## Fix

Check whether the reference text or the resolution is wrong: the raw text
and the resolved path are both shown above. Create the file if the
reference is correct.
",
            resolved.display()
        ),

        Error::NoReferenceAtPosition { file, line, character } => format!(
            "\
# Error: No Reference At Position

No file reference sits under {}:{line}:{character}.

## Fix

Place the cursor on a `template:` value or a `*.yml` path.
",
            file.display()
        ),

        Error::ParseFailed { file, reason } => format!(
            "\
# Error: Parse Failed

Could not parse `{}`: {reason}
",
            file.display()
        ),

        Error::TargetNotFound { path } => format!(
            "\
# Error: Target Not Found

`{}` does not exist, so nothing can reference it.
",
            path.display()
        ),

        Error::InvalidPosition { arg } => format!(
            "\
# Error: Invalid Position

`{arg}` is not a cursor position.

## Fix

Pass LINE:COLUMN with 1-based numbers, for example `12:7`.
"
        ),

        Error::WatchSetup { reason } => format!(
            "\
# Error: Watch Setup Failed

{reason}
"
        ),

        Error::Io(e) => format!(
            "\
# Error: I/O

{e}
"
        ),

        Error::TomlDe(e) => format!(
            "\
# Error: Invalid TOML

{e}
"
        ),
    }
}
