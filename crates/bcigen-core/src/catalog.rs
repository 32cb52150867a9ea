//! The collection of all known images, keyed by `{uid}-{os}`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::descriptor::ImageDescriptor;
use crate::spec::ImageSpec;

/// A set of validated images addressable by their catalog key.
///
/// # Examples
///
/// ```
/// use bcigen_core::Catalog;
///
/// let catalog = Catalog::builtin().unwrap();
/// let init = catalog.resolve("init-sp6").unwrap();
/// assert_eq!(init.name(), "init");
/// assert!(catalog.resolve("no-such-image").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    images: BTreeMap<String, ImageDescriptor>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The images shipped with bcigen.
    pub fn builtin() -> crate::Result<Self> {
        let mut catalog = Self::new();
        catalog.extend_specs(crate::images::all())?;
        tracing::debug!(images = catalog.len(), "built-in catalog loaded");
        Ok(catalog)
    }

    /// Validate and add an image.
    ///
    /// # Errors
    ///
    /// Any validation error of [`ImageDescriptor::new`], or
    /// [`Error::DuplicateImage`](crate::Error::DuplicateImage) if the key is taken.
    pub fn add_spec(&mut self, spec: ImageSpec) -> crate::Result<()> {
        self.add(ImageDescriptor::new(spec)?)
    }

    pub fn extend_specs(&mut self, specs: impl IntoIterator<Item = ImageSpec>) -> crate::Result<()> {
        for spec in specs {
            self.add_spec(spec)?;
        }
        Ok(())
    }

    pub fn add(&mut self, image: ImageDescriptor) -> crate::Result<()> {
        let key = image.catalog_key();
        if self.images.contains_key(&key) {
            return Err(crate::Error::DuplicateImage { key });
        }
        tracing::debug!(%key, "image registered");
        self.images.insert(key, image);
        Ok(())
    }

    /// Load additional images from a TOML catalog file.
    pub fn load_file(&mut self, path: &Path) -> crate::Result<()> {
        let file = CatalogFile::load(path)?;
        let count = file.image.len();
        self.extend_specs(file.image)?;
        tracing::debug!(path = %path.display(), images = count, "catalog file loaded");
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ImageDescriptor> {
        self.images.get(key)
    }

    /// Resolve a user supplied selector to exactly one image.
    ///
    /// Priority:
    /// 1. Exact catalog key (`python-3.11-sp6`)
    /// 2. Unique key starting with `{selector}-` (`python-3.12` → `python-3.12-sp6`)
    ///
    /// # Errors
    ///
    /// - [`Error::AmbiguousImage`](crate::Error::AmbiguousImage) if several keys match the prefix
    /// - [`Error::UnknownImage`](crate::Error::UnknownImage) if nothing matches
    pub fn resolve(&self, selector: &str) -> crate::Result<&ImageDescriptor> {
        if let Some(image) = self.images.get(selector) {
            return Ok(image);
        }

        let prefix = format!("{selector}-");
        let candidates: Vec<(&String, &ImageDescriptor)> = self
            .images
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .collect();

        match candidates.as_slice() {
            [] => Err(crate::Error::UnknownImage {
                selector: selector.to_owned(),
            }),
            [(key, image)] => {
                tracing::debug!(%selector, %key, "selector resolved by prefix");
                Ok(image)
            }
            many => Err(crate::Error::AmbiguousImage {
                selector: selector.to_owned(),
                candidates: many.iter().map(|(key, _)| (*key).clone()).collect(),
            }),
        }
    }

    /// All keys, sorted by the OS version as written in catalog files
    /// (`3` < `6` < `Basalt` < `Tumbleweed`) and then by key.
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut entries: Vec<(String, &str)> = self
            .images
            .iter()
            .map(|(key, image)| (image.os_version().to_string(), key.as_str()))
            .collect();
        entries.sort();
        entries.into_iter().map(|(_, key)| key).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ImageDescriptor)> {
        self.images.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// A TOML file with additional image definitions:
///
/// ```toml
/// [[image]]
/// kind = "language-stack"
/// name = "zig"
/// pretty_name = "Zig 0.13"
/// package_name = "zig-0.13-image"
/// os_version = "Tumbleweed"
/// version = "0.13"
/// package_list = ["zig"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(default)]
    pub image: Vec<ImageSpec>,
}

impl CatalogFile {
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::CatalogLoad {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| crate::Error::CatalogParse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
