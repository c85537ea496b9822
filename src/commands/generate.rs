//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::content::loader::ContentLoader;
use crate::generator::Generator;
use crate::Site;

/// Generate the static site
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(site)?;
    let articles = loader.load_articles()?;
    tracing::info!("Loaded {} posts", articles.len());

    Generator::new(site).generate(&articles)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Watch sources, stories and config, regenerating on change
pub async fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    if site.source_dir.exists() {
        watcher.watch(&site.source_dir, notify::RecursiveMode::Recursive)?;
    }
    if site.stories_dir.exists() {
        watcher.watch(&site.stories_dir, notify::RecursiveMode::Recursive)?;
    }
    let config_path = site.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                // Only rebuild if more than 500ms since last rebuild
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    if let Err(e) = rebuild(site) {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

/// Reload the configuration, then regenerate the site and the catalog
fn rebuild(site: &Site) -> Result<()> {
    let site = Site::new(&site.base_dir)?;
    run(&site)?;
    super::catalog::run(&site)
}
