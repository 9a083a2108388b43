//! File watcher: runs the reverse search on startup, then re-runs it on
//! workspace changes, invalidating cached provider selections for the
//! changed documents first.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::commands::absolutize;
use crate::config::Config;
use crate::error::Error;
use crate::index::ReferenceTree;
use crate::service::{is_yaml_path, ReferenceService};

/// Debounce delay between filesystem events and a re-search.
const DEBOUNCE_MS: u64 = 100;

/// Create a filesystem watcher that forwards changed paths on the channel.
///
/// # Errors
///
/// Returns `Error::WatchSetup` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<Vec<PathBuf>>,
) -> Result<notify::RecommendedWatcher, Error> {
    notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res {
            if matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            ) {
                let _ = tx.send(event.paths);
            }
        }
    })
    .map_err(|e| Error::WatchSetup {
        reason: e.to_string(),
    })
}

/// Entry point for the watch command.
///
/// Runs an initial reverse search for `target`, then watches the workspace
/// root and re-searches whenever a YAML file changes.
///
/// # Errors
///
/// Returns errors from config loading or watcher setup, or
/// `Error::TargetNotFound` if the target does not exist.
pub fn run(root: &Path, target: &Path) -> Result<ExitCode, Error> {
    let root = absolutize(root)?;
    let target = absolutize(target)?;
    if !target.exists() {
        return Err(Error::TargetNotFound { path: target });
    }

    let config = Config::load(&root)?;
    let mut service = ReferenceService::new(root.clone(), config);

    eprintln!("watch: initial search");
    print_references(&mut service, &target);

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;
    watcher
        .watch(&root, RecursiveMode::Recursive)
        .map_err(|e| Error::WatchSetup {
            reason: e.to_string(),
        })?;

    eprintln!(
        "watch: monitoring {}, press Ctrl+C to stop",
        root.display()
    );

    while let Ok(first) = rx.recv() {
        let mut changed = first;
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while let Ok(more) = rx.recv_timeout(debounce) {
            changed.extend(more);
        }

        let mut touched_yaml = false;
        for path in &changed {
            if is_yaml_path(path) {
                // Content may have changed; the next detection must re-run.
                service.on_document_changed(path);
                touched_yaml = true;
            }
        }

        if touched_yaml {
            eprintln!("watch: change detected, re-searching...");
            print_references(&mut service, &target);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Run one reverse search and print the resulting tree.
fn print_references(service: &mut ReferenceService, target: &Path) {
    let matches = service.find_references_to_file(target);
    let tree = ReferenceTree::from_matches(&matches);
    if tree.files.is_empty() {
        println!("no references to {}", target.display());
    } else {
        print!("{}", tree.render());
        let total = tree.total_references();
        println!("{total} reference(s)");
    }
}
