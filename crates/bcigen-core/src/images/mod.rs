//! Built-in image definitions.

mod apps;
mod base;
mod golang;
mod node;
mod openjdk;
mod php;
mod python;
mod rust;

use crate::os::OsVersion;
use crate::package::Package;
use crate::spec::ImageSpec;

/// Every built-in image definition.
pub fn all() -> Vec<ImageSpec> {
    let mut specs = Vec::new();
    specs.extend(python::images());
    specs.extend(golang::images());
    specs.extend(node::images());
    specs.extend(openjdk::images());
    specs.extend(php::images());
    specs.extend(rust::images());
    specs.extend(base::images());
    specs.extend(apps::images());
    specs
}

/// Contents of an OBS `_constraints` file requiring `size_gb` GB of disk.
pub fn generate_disk_size_constraints(size_gb: u32) -> String {
    format!(
        r#"<constraints>
  <hardware>
    <disk>
      <size unit="G">{size_gb}</size>
    </disk>
  </hardware>
</constraints>
"#
    )
}

/// `packages` followed by the lifecycle data package of `os_version`.
fn with_lifecycle_data(packages: &[&str], os_version: OsVersion) -> Vec<Package> {
    let mut list: Vec<Package> = packages.iter().map(|p| Package::from(*p)).collect();
    list.extend(os_version.lifecycle_data_pkg().into_iter().map(Package::from));
    list
}

/// Name of the package providing `/etc/os-release`.
fn release_package(os_version: OsVersion) -> &'static str {
    match os_version {
        OsVersion::Tumbleweed => "openSUSE-release",
        OsVersion::Basalt => "ALP-dummy-release",
        _ => "sles-release",
    }
}
