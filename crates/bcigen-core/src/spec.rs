//! Raw image definitions, as declared in code or in a catalog file.
//!
//! An [`ImageSpec`] is not validated; turn it into an
//! [`ImageDescriptor`](crate::ImageDescriptor) with
//! [`ImageDescriptor::new`](crate::ImageDescriptor::new).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ordered::{OrderedMap, Scalar};
use crate::os::{Arch, OsVersion};
use crate::package::{Package, Replacement};

/// The three image flavours, differing in tag and title derivation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageVariant {
    /// OS base image, published as `bci-{name}`
    Os,
    /// Language stack, published under the BCI prefix with a version
    LanguageStack,
    /// Application stack, published under the application prefix with a version
    ApplicationStack,
}

/// Values of the `image-type` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageType {
    #[serde(rename = "sle-bci")]
    SleBci,
    #[serde(rename = "application")]
    Application,
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageType::SleBci => "sle-bci",
            ImageType::Application => "application",
        })
    }
}

/// Which build backend consumes the build description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    Docker,
    Kiwi,
}

impl BuildType {
    /// Build type used when an image does not pick one.
    pub fn default_for(os_version: OsVersion) -> Self {
        if os_version == OsVersion::Sp3 {
            BuildType::Kiwi
        } else {
            BuildType::Docker
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuildType::Docker => "docker",
            BuildType::Kiwi => "kiwi",
        })
    }
}

/// Values of the `supportlevel` label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportLevel {
    L2,
    L3,
    /// Additional Customer Contract
    Acc,
    Unsupported,
    #[default]
    Techpreview,
}

impl fmt::Display for SupportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SupportLevel::L2 => "l2",
            SupportLevel::L3 => "l3",
            SupportLevel::Acc => "acc",
            SupportLevel::Unsupported => "unsupported",
            SupportLevel::Techpreview => "techpreview",
        })
    }
}

/// Unvalidated definition of one container image.
///
/// # Examples
///
/// ```
/// use bcigen_core::{ImageSpec, OsVersion};
///
/// let spec = ImageSpec {
///     version: Some("3.11".into()),
///     package_list: vec!["python311".into()],
///     ..ImageSpec::language_stack("python", "Python 3.11", "python-3.11-image", OsVersion::Sp6)
/// };
/// assert_eq!(spec.name, "python");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageSpec {
    pub kind: ImageVariant,
    /// Name under which the image is published
    pub name: String,
    /// Human readable name inserted into title and description
    pub pretty_name: String,
    /// Name of the OBS package, also the base name of emitted files
    pub package_name: String,
    pub os_version: OsVersion,
    /// Epoch to handle `os_version` downgrades
    #[serde(default)]
    pub os_epoch: Option<u32>,
    /// Explicit base image; the OS default is used when unset
    #[serde(default)]
    pub from_image: Option<String>,
    /// Build from nothing: no `FROM` line, no `derived_from`
    #[serde(default)]
    pub no_base_image: bool,
    /// Restrict the build to these architectures
    #[serde(default)]
    pub exclusive_arch: Option<Vec<Arch>>,
    #[serde(default)]
    pub is_latest: bool,
    #[serde(default)]
    pub entrypoint: Option<Vec<String>>,
    #[serde(default)]
    pub entrypoint_user: Option<String>,
    #[serde(default)]
    pub cmd: Option<Vec<String>>,
    #[serde(default)]
    pub volumes: Option<Vec<String>>,
    #[serde(default)]
    pub exposes_tcp: Option<Vec<u16>>,
    #[serde(default)]
    pub env: OrderedMap<Scalar>,
    #[serde(default)]
    pub replacements_via_service: Vec<Replacement>,
    #[serde(default)]
    pub extra_labels: OrderedMap<String>,
    #[serde(default)]
    pub package_list: Vec<Package>,
    /// Free-form Dockerfile instructions appended to the build description
    #[serde(default)]
    pub custom_end: Option<String>,
    /// Script run in `config.sh` (kiwi) or as a trailing `RUN` (Dockerfile)
    #[serde(default)]
    pub config_sh_script: Option<String>,
    #[serde(default = "default_config_sh_interpreter")]
    pub config_sh_interpreter: String,
    #[serde(default)]
    pub maintainer: Option<String>,
    /// Files copied verbatim next to the build description
    #[serde(default)]
    pub extra_files: OrderedMap<String>,
    /// Extra names under which the image is published
    #[serde(default)]
    pub additional_names: Vec<String>,
    /// Replaces the name at the end of the label prefix
    #[serde(default)]
    pub custom_labelprefix_end: Option<String>,
    #[serde(default)]
    pub custom_description: Option<String>,
    #[serde(default)]
    pub build_recipe_type: Option<BuildType>,
    #[serde(default = "default_license")]
    pub license: String,
    #[serde(default)]
    pub support_level: SupportLevel,
    #[serde(default)]
    pub supported_until: Option<NaiveDate>,
    /// Pass `--no-recommends` to zypper
    #[serde(default = "default_true")]
    pub no_recommends: bool,

    // ── Stack images ──
    /// Primary version of the language or application
    #[serde(default)]
    pub version: Option<Scalar>,
    /// Rolling channel marker, `stable` or `oldstable`
    #[serde(default)]
    pub stability_tag: Option<String>,
    #[serde(default)]
    pub additional_versions: Vec<String>,
    #[serde(default = "default_true")]
    pub version_in_uid: bool,
}

impl ImageSpec {
    pub fn new(
        kind: ImageVariant,
        name: impl Into<String>,
        pretty_name: impl Into<String>,
        package_name: impl Into<String>,
        os_version: OsVersion,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            pretty_name: pretty_name.into(),
            package_name: package_name.into(),
            os_version,
            os_epoch: None,
            from_image: None,
            no_base_image: false,
            exclusive_arch: None,
            is_latest: false,
            entrypoint: None,
            entrypoint_user: None,
            cmd: None,
            volumes: None,
            exposes_tcp: None,
            env: OrderedMap::new(),
            replacements_via_service: Vec::new(),
            extra_labels: OrderedMap::new(),
            package_list: Vec::new(),
            custom_end: None,
            config_sh_script: None,
            config_sh_interpreter: default_config_sh_interpreter(),
            maintainer: None,
            extra_files: OrderedMap::new(),
            additional_names: Vec::new(),
            custom_labelprefix_end: None,
            custom_description: None,
            build_recipe_type: None,
            license: default_license(),
            support_level: SupportLevel::default(),
            supported_until: None,
            no_recommends: true,
            version: None,
            stability_tag: None,
            additional_versions: Vec::new(),
            version_in_uid: true,
        }
    }

    pub fn os(
        name: impl Into<String>,
        pretty_name: impl Into<String>,
        package_name: impl Into<String>,
        os_version: OsVersion,
    ) -> Self {
        Self::new(ImageVariant::Os, name, pretty_name, package_name, os_version)
    }

    pub fn language_stack(
        name: impl Into<String>,
        pretty_name: impl Into<String>,
        package_name: impl Into<String>,
        os_version: OsVersion,
    ) -> Self {
        Self::new(
            ImageVariant::LanguageStack,
            name,
            pretty_name,
            package_name,
            os_version,
        )
    }

    pub fn application_stack(
        name: impl Into<String>,
        pretty_name: impl Into<String>,
        package_name: impl Into<String>,
        os_version: OsVersion,
    ) -> Self {
        Self::new(
            ImageVariant::ApplicationStack,
            name,
            pretty_name,
            package_name,
            os_version,
        )
    }
}

fn default_config_sh_interpreter() -> String {
    "/bin/bash".to_owned()
}

fn default_license() -> String {
    "MIT".to_owned()
}

fn default_true() -> bool {
    true
}
