//! Preview server with rebuild on change

use anyhow::{Context, Result};
use axum::Router;
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::net::SocketAddr;
use std::path::{Component, Path};
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::{Folio, CONFIG_FILE};

/// Serve the output directory, rebuilding when content changes if `watch` is set
pub async fn start(folio: &Folio, ip: &str, port: u16, watch: bool) -> Result<()> {
    let service = ServeDir::new(&folio.output_dir).append_index_html_on_directories(true);
    let app = Router::new()
        .fallback_service(service)
        .layer(TraceLayer::new_for_http());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    // Bind before watching so a taken port fails fast
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Watching {:?} for changes...", folio.content_dir);

        // Detached: the watch loop never returns and must not hold up runtime shutdown
        let folio = folio.clone();
        std::thread::spawn(move || {
            if let Err(e) = watch_and_rebuild(&folio) {
                tracing::error!("File watcher error: {:#}", e);
            }
        });
    }
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Block on file events and rebuild the site after each debounced batch
fn watch_and_rebuild(folio: &Folio) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if folio.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&folio.content_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", folio.content_dir);
    }

    let config_path = folio.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<_> = events
                    .iter()
                    .filter(|e| is_relevant(&e.path))
                    .collect();
                if changed.is_empty() {
                    continue;
                }

                for event in &changed {
                    tracing::info!("File changed: {}", event.path.display());
                }

                // Config edits take effect on the next rebuild
                let rebuilt = Folio::new(&folio.base_dir).and_then(|f| f.build(false));
                match rebuilt {
                    Ok(report) => tracing::info!(
                        "Rebuilt {} articles ({} failed)",
                        report.articles.len(),
                        report.failures.len()
                    ),
                    Err(e) => tracing::error!("Rebuild failed: {:#}", e),
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Ignore editor droppings and VCS internals
fn is_relevant(path: &Path) -> bool {
    let in_vcs = path.components().any(|c| match c {
        Component::Normal(name) => name == ".git",
        _ => false,
    });
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    !in_vcs && name != ".DS_Store" && !name.ends_with('~') && !name.ends_with(".swp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("content/go-pointers.md")));
        assert!(!is_relevant(Path::new("content/.git/index")));
        assert!(!is_relevant(Path::new("content/draft.md~")));
        assert!(!is_relevant(Path::new("content/.draft.md.swp")));
        assert!(!is_relevant(Path::new("content/images/.DS_Store")));
        assert!(is_relevant(Path::new("content/why-.gitignore-matters.md")));
        assert!(is_relevant(Path::new("content/.github-notes/setup.md")));
    }

    #[tokio::test]
    async fn test_taken_port_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::with_config(dir.path().to_path_buf(), Default::default());
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            start(&folio, "127.0.0.1", port, true),
        )
        .await
        .expect("start should return instead of serving");

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to bind"));
    }
}
