use std::path::Path;

use super::load_catalog;

pub fn list(catalog: Option<&Path>) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog)?;
    for key in catalog.sorted_keys() {
        println!("{key}");
    }
    Ok(())
}
