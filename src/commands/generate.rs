//! Generate static files

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::time::Duration;

use crate::content::{DataSource, PostRepository};
use crate::generator::Generator;
use crate::Folio;

/// Generate the static site
pub async fn run(folio: &Folio) -> Result<()> {
    let start = std::time::Instant::now();

    let repository = folio.load_posts().await?;
    tracing::info!("Loaded {} posts", repository.len());

    generate_from(folio, &repository)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Render an already loaded repository into the public directory
pub fn generate_from(folio: &Folio, repository: &PostRepository) -> Result<()> {
    let generator = Generator::new(folio)?;
    generator.generate(repository)
}

/// Watch the data document and static assets, and regenerate on change
pub async fn watch(folio: &Folio) -> Result<()> {
    let DataSource::File(data_path) = folio.data_source.clone() else {
        anyhow::bail!(
            "Cannot watch remote data source {}",
            folio.data_source.location()
        );
    };

    let folio = folio.clone();
    tokio::task::spawn_blocking(move || watch_blocking(&folio, &data_path)).await?
}

fn watch_blocking(folio: &Folio, data_path: &std::path::Path) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Debounce rapid saves into one rebuild
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    debouncer
        .watcher()
        .watch(data_path, RecursiveMode::NonRecursive)?;
    tracing::debug!("Watching: {:?}", data_path);

    if folio.static_dir.exists() {
        debouncer
            .watcher()
            .watch(&folio.static_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", folio.static_dir);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                for event in &events {
                    tracing::info!("File changed: {}", event.path.display());
                }

                // A broken document leaves the previous output in place
                match PostRepository::load_file(data_path) {
                    Ok(repository) => match generate_from(folio, &repository) {
                        Ok(()) => tracing::info!("Regenerated {} posts", repository.len()),
                        Err(e) => tracing::error!("Generation failed: {}", e),
                    },
                    Err(e) => tracing::error!("Failed to load posts: {}", e),
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
