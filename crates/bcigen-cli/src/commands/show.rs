use std::path::Path;

use anyhow::Context;
use bcigen_core::{ImageDescriptor, ImageVariant};
use serde::Serialize;

use super::load_catalog;

/// The derived view of an image, as printed by `bcigen show`.
#[derive(Serialize)]
struct ImageSummary {
    key: String,
    name: String,
    variant: ImageVariant,
    os_version: String,
    build_type: String,
    version: Option<String>,
    stability_tag: Option<String>,
    build_tags: Vec<String>,
    reference: String,
    title: String,
    description: String,
    labelprefix: String,
    from_image: Option<String>,
    image_type: String,
    release_stage: String,
    support_level: String,
    build_description_file: String,
}

impl From<&ImageDescriptor> for ImageSummary {
    fn from(image: &ImageDescriptor) -> Self {
        Self {
            key: image.catalog_key(),
            name: image.name().to_owned(),
            variant: image.variant(),
            os_version: image.os_version().pretty_print(),
            build_type: image.build_recipe_type().to_string(),
            version: image.version().map(str::to_owned),
            stability_tag: image.stability_tag().map(|tag| tag.to_string()),
            build_tags: image.build_tags(),
            reference: image.reference(),
            title: image.title(),
            description: image.description(),
            labelprefix: image.labelprefix(),
            from_image: image.from_image(),
            image_type: image.image_type().to_string(),
            release_stage: image.release_stage().to_string(),
            support_level: image.support_level().to_string(),
            build_description_file: image.build_description_file(),
        }
    }
}

pub fn show(catalog: Option<&Path>, selector: &str) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog)?;
    let image = catalog.resolve(selector).context("resolving image")?;
    tracing::debug!(%selector, key = %image.catalog_key(), "image resolved");

    let json = serde_json::to_string_pretty(&ImageSummary::from(image))
        .context("serializing image summary")?;
    println!("{json}");
    Ok(())
}
