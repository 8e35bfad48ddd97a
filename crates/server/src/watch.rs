//! Reload the bundle when its file changes on disk.

use std::path::Path;
use std::sync::Arc;

use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use addonkit_core::bundle::BundleProvider;

/// Start watching the provider's bundle file. The returned watcher must be kept
/// alive for as long as reloads are wanted. `None` for in-memory bundles.
pub fn watch_bundle(provider: Arc<BundleProvider>) -> notify::Result<Option<RecommendedWatcher>> {
    let Some(path) = provider.path().map(Path::to_path_buf) else {
        return Ok(None);
    };
    // Editors often replace the file, so watch the directory and match by name.
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    let file_name = path.file_name().map(|n| n.to_os_string());

    let mut watcher = recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) if is_change(&event.kind) => {
            let touches_bundle = event
                .paths
                .iter()
                .any(|p| p.file_name() == file_name.as_deref());
            if touches_bundle {
                if let Err(e) = provider.reload() {
                    tracing::warn!(error = %e, "bundle reload failed; keeping the previous bundle");
                }
            }
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "bundle watch error"),
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    tracing::info!(path = %path.display(), "watching bundle for changes");
    Ok(Some(watcher))
}

fn is_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Modify(_) | EventKind::Create(_))
}
