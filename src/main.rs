use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use yamlnav::{commands, diagnostics, watch};

/// Find, resolve, and reverse-search file-path references in YAML documents.
#[derive(Parser)]
#[command(name = "yamlnav", version, about)]
struct Cli {
    /// Workspace root that root-relative references resolve against.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every file reference found in a YAML document.
    List {
        /// The YAML document to scan.
        file: PathBuf,
        /// Emit the references as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Resolve the reference under a LINE:COLUMN position in a document.
    Resolve {
        /// The YAML document to query.
        file: PathBuf,
        /// Cursor position as 1-based LINE:COLUMN.
        position: String,
    },
    /// Find every YAML file in the workspace that references a target file.
    Refs {
        /// The file to search for references to.
        target: PathBuf,
        /// Emit the result tree as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Re-run the reverse search whenever the workspace changes.
    Watch {
        /// The file to search for references to.
        target: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List { file, json } => commands::list(&cli.root, &file, json),
        Commands::Resolve { file, position } => commands::resolve(&cli.root, &file, &position),
        Commands::Refs { target, json } => commands::refs(&cli.root, &target, json),
        Commands::Watch { target } => watch::run(&cli.root, &target),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
