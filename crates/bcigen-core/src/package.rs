use std::fmt;

use serde::{Deserialize, Serialize};

/// The `<packages type="...">` section a package lands in for kiwi builds.
///
/// Dockerfile based builds only support [`PackageType::Image`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Delete,
    Uninstall,
    Bootstrap,
    #[default]
    Image,
}

impl PackageType {
    /// Order of the `<packages>` sections in a kiwi build description.
    pub const KIWI_ORDER: [PackageType; 4] = [
        PackageType::Delete,
        PackageType::Bootstrap,
        PackageType::Image,
        PackageType::Uninstall,
    ];
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PackageType::Delete => "delete",
            PackageType::Uninstall => "uninstall",
            PackageType::Bootstrap => "bootstrap",
            PackageType::Image => "image",
        })
    }
}

/// A package installed into the image.
///
/// Deserializes from a bare name or from `{ name = "...", type = "bootstrap" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PackageDef")]
pub struct Package {
    pub name: String,
    #[serde(rename = "type")]
    pub pkg_type: PackageType,
}

impl Package {
    pub fn new(name: impl Into<String>, pkg_type: PackageType) -> Self {
        Self {
            name: name.into(),
            pkg_type,
        }
    }

    pub fn bootstrap(name: impl Into<String>) -> Self {
        Self::new(name, PackageType::Bootstrap)
    }

    pub fn delete(name: impl Into<String>) -> Self {
        Self::new(name, PackageType::Delete)
    }

    pub fn uninstall(name: impl Into<String>) -> Self {
        Self::new(name, PackageType::Uninstall)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Package {
    fn from(name: &str) -> Self {
        Self::new(name, PackageType::Image)
    }
}

impl From<String> for Package {
    fn from(name: String) -> Self {
        Self::new(name, PackageType::Image)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PackageDef {
    Name(String),
    Full {
        name: String,
        #[serde(rename = "type", default)]
        pkg_type: PackageType,
    },
}

impl From<PackageDef> for Package {
    fn from(def: PackageDef) -> Self {
        match def {
            PackageDef::Name(name) => Package::from(name),
            PackageDef::Full { name, pkg_type } => Package::new(name, pkg_type),
        }
    }
}

/// How `replace_using_package_version` formats the queried version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseVersion {
    Major,
    Minor,
    Patch,
    PatchUpdate,
    Offset,
}

impl fmt::Display for ParseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseVersion::Major => "major",
            ParseVersion::Minor => "minor",
            ParseVersion::Patch => "patch",
            ParseVersion::PatchUpdate => "patch_update",
            ParseVersion::Offset => "offset",
        })
    }
}

/// A build-time substitution of a placeholder with the version of a package,
/// performed by the `replace_using_package_version` OBS service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Regex replaced in the build description
    pub regex_in_build_description: String,
    /// Package whose version is queried
    pub package_name: String,
    #[serde(default)]
    pub parse_version: Option<ParseVersion>,
}

impl Replacement {
    pub fn new(regex: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            regex_in_build_description: regex.into(),
            package_name: package_name.into(),
            parse_version: None,
        }
    }

    pub fn with_parse_version(mut self, parse_version: ParseVersion) -> Self {
        self.parse_version = Some(parse_version);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_bare_and_typed_packages() {
        #[derive(Deserialize)]
        struct Doc {
            packages: Vec<Package>,
        }

        let doc: Doc = toml::from_str(
            r#"packages = ["bash", { name = "filesystem", type = "bootstrap" }, { name = "coreutils" }]"#,
        )
        .unwrap();

        assert_eq!(
            doc.packages,
            vec![
                Package::from("bash"),
                Package::bootstrap("filesystem"),
                Package::from("coreutils"),
            ]
        );
    }
}
