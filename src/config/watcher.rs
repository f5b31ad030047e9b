use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::Duration;
use tracing::{error, info, warn};

/// Quiet period that collapses bursts of file events into one reload
const DEBOUNCE: Duration = Duration::from_millis(200);

/// Watches the config file and endpoint directory, invoking a reload callback
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    pub fn new<F>(paths: &[PathBuf], on_change: F) -> Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let (tx, rx) = channel::<notify::Result<Event>>();
        let mut watcher = RecommendedWatcher::new(tx, Config::default())?;

        for path in paths {
            if path.exists() {
                watcher.watch(path, RecursiveMode::Recursive)?;
                info!("Watching configuration path: {}", path.display());
            } else {
                warn!("Configuration path does not exist, skipping: {}", path.display());
            }
        }

        std::thread::spawn(move || loop {
            match rx.recv() {
                Ok(Ok(event)) if is_relevant(&event.kind) => {
                    // Drain follow-up events until the burst settles
                    loop {
                        match rx.recv_timeout(DEBOUNCE) {
                            Ok(_) => continue,
                            Err(RecvTimeoutError::Timeout) => break,
                            Err(RecvTimeoutError::Disconnected) => return,
                        }
                    }
                    info!("Configuration change detected, reloading...");
                    on_change();
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => error!("Watch error: {:?}", e),
                Err(e) => {
                    error!("Watch channel error: {:?}", e);
                    break;
                }
            }
        });

        Ok(Self { _watcher: watcher })
    }
}

fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    #[test]
    fn test_only_content_changes_trigger_reload() {
        assert!(is_relevant(&EventKind::Create(CreateKind::File)));
        assert!(is_relevant(&EventKind::Modify(ModifyKind::Any)));
        assert!(!is_relevant(&EventKind::Access(AccessKind::Any)));
    }

    #[test]
    fn test_missing_paths_are_skipped() {
        let watcher = ConfigWatcher::new(&[PathBuf::from("/definitely/not/here")], || {});
        assert!(watcher.is_ok());
    }
}
