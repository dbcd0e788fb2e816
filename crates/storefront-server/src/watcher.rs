//! File watching for live reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A stylesheet was modified
    StyleModified(PathBuf),

    /// A TOML configuration file was modified
    ConfigModified(PathBuf),

    Created(PathBuf),

    Deleted(PathBuf),

    /// Any other modification
    Modified(PathBuf),
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch the given files and directories.
    ///
    /// Paths that do not exist are skipped. Returns the watcher, which must be
    /// kept alive, and a channel of classified events.
    pub fn new(
        paths: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if !path.exists() {
                tracing::debug!("Not watching missing path {}", path.display());
                continue;
            }
            let mode = if path.is_dir() {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };
            watcher.watch(path, mode).map_err(std::io::Error::other)?;
        }

        std::thread::spawn(move || {
            let debounce = Duration::from_millis(100);
            let mut last_event: Option<Instant> = None;

            while let Ok(event) = sync_rx.recv() {
                let now = Instant::now();
                if last_event.is_some_and(|t| now.duration_since(t) < debounce) {
                    continue;
                }
                last_event = Some(now);

                for path in &event.paths {
                    if let Some(e) = classify_event(path, &event.kind) {
                        if async_tx.blocking_send(e).is_err() {
                            return;
                        }
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Classify a notify event into a [`WatchEvent`].
fn classify_event(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match kind {
        EventKind::Create(_) => Some(WatchEvent::Created(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Deleted(path.to_path_buf())),
        EventKind::Modify(_) => match ext {
            "css" => Some(WatchEvent::StyleModified(path.to_path_buf())),
            "toml" => Some(WatchEvent::ConfigModified(path.to_path_buf())),
            _ => Some(WatchEvent::Modified(path.to_path_buf())),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, ModifyKind};
    use notify::EventKind;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn classifies_by_extension() {
        let modify = EventKind::Modify(ModifyKind::Data(DataChange::Content));

        assert_eq!(
            classify_event(Path::new("theme.css"), &modify),
            Some(WatchEvent::StyleModified(PathBuf::from("theme.css")))
        );
        assert_eq!(
            classify_event(Path::new("storefront.toml"), &modify),
            Some(WatchEvent::ConfigModified(PathBuf::from("storefront.toml")))
        );
        assert_eq!(
            classify_event(Path::new("logo.svg"), &modify),
            Some(WatchEvent::Modified(PathBuf::from("logo.svg")))
        );
        assert_eq!(
            classify_event(Path::new("new.css"), &EventKind::Create(CreateKind::File)),
            Some(WatchEvent::Created(PathBuf::from("new.css")))
        );
        assert_eq!(classify_event(Path::new("x.css"), &EventKind::Any), None);
    }

    #[tokio::test]
    async fn watches_file_changes() {
        let temp = tempdir().unwrap();
        let test_file = temp.path().join("theme.css");

        let (watcher, mut rx) = FileWatcher::new(&[temp.path().to_path_buf()]).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(&test_file, ".card { color: red; }").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        assert!(event.is_ok(), "timeout waiting for file watch event");
        assert!(event.unwrap().is_some(), "channel should not be closed");
    }

    #[test]
    fn skips_missing_paths() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope");

        assert!(FileWatcher::new(&[missing]).is_ok());
    }
}
