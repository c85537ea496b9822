//! Build the story catalog

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::{Catalog, MockRouter};
use crate::Site;

/// Directory the catalog is written to
pub fn output_dir(site: &Site) -> PathBuf {
    site.public_dir.join("catalog")
}

/// Build the catalog with a fresh router
pub fn run(site: &Site) -> Result<()> {
    build(site, Arc::new(MockRouter::new()))?;
    Ok(())
}

/// Build the catalog, recording navigation on `router`
pub fn build(site: &Site, router: Arc<MockRouter>) -> Result<Catalog> {
    let start = std::time::Instant::now();

    let catalog = Catalog::configure(&site.stories_dir, &site.config, router);
    catalog.write(&output_dir(site))?;

    tracing::info!(
        "Built catalog with {} stories in {:.2}s",
        catalog.stories().len(),
        start.elapsed().as_secs_f64()
    );
    Ok(catalog)
}
