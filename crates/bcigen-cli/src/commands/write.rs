use std::path::Path;

use anyhow::Context;
use bcigen_build::{RenderContext, write_files_to_folder};

use super::load_catalog;

pub async fn write(catalog: Option<&Path>, selector: &str, destination: &Path) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog)?;
    let image = catalog.resolve(selector).context("resolving image")?;
    tracing::debug!(
        %selector,
        key = %image.catalog_key(),
        dest = %destination.display(),
        "image resolved"
    );

    let ctx = RenderContext::now();
    let files = write_files_to_folder(image, destination, &ctx)
        .await
        .with_context(|| format!("writing files of {}", image.catalog_key()))?;

    for file in files {
        println!("{file}");
    }
    Ok(())
}
