mod list;
mod show;
mod write;

use std::path::Path;

use anyhow::Context;
use bcigen_core::Catalog;

pub use list::list;
pub use show::show;
pub use write::write;

/// The built-in catalog, extended by the `--catalog` file if given.
pub(crate) fn load_catalog(extra: Option<&Path>) -> anyhow::Result<Catalog> {
    let mut catalog = Catalog::builtin().context("loading built-in catalog")?;
    if let Some(path) = extra {
        catalog
            .load_file(path)
            .with_context(|| format!("loading catalog {}", path.display()))?;
    }
    Ok(catalog)
}
