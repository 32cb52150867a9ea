//! Validated, immutable container image descriptors.

use std::path::{Component, Path};

use chrono::NaiveDate;

use crate::ordered::{OrderedMap, Scalar};
use crate::os::{Arch, OsVersion, ReleaseStage};
use crate::package::{Package, PackageType, Replacement};
use crate::properties::ImageProperties;
use crate::spec::{BuildType, ImageSpec, ImageType, ImageVariant, SupportLevel};
use crate::tags::StabilityTag;

/// `RUN` with bash flags that make every failing command fail the build.
pub const DOCKERFILE_RUN: &str = "RUN set -euo pipefail;";

/// The base image an image is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseImage {
    /// The default base of the OS version
    OsDefault,
    Image(String),
    /// Built from nothing
    None,
}

/// Instructions appended after the package installation.
///
/// Free-form Dockerfile instructions and a `config.sh` script exclude each
/// other, hence a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrailingInstructions {
    None,
    /// Arbitrary Dockerfile instructions, only valid for Dockerfile builds
    CustomEnd(String),
    /// Script run by kiwi's `config.sh` or as a trailing `RUN`
    ConfigScript(String),
}

/// A fully validated container image.
///
/// Constructed once through [`ImageDescriptor::new`] and never mutated
/// afterwards; every derived value (tags, reference, labels) is computed
/// from it on demand.
///
/// # Examples
///
/// ```
/// use bcigen_core::{ImageDescriptor, ImageSpec, OsVersion};
///
/// let spec = ImageSpec {
///     package_list: vec!["systemd".into()],
///     ..ImageSpec::os("init", "Init", "init-image", OsVersion::Sp6)
/// };
/// let init = ImageDescriptor::new(spec).unwrap();
/// assert_eq!(init.uid(), "init");
/// assert_eq!(init.catalog_key(), "init-sp6");
/// assert_eq!(init.reference(), "registry.suse.com/bci/bci-init:%OS_VERSION_ID_SP%.%RELEASE%");
/// ```
#[derive(Debug, Clone)]
pub struct ImageDescriptor {
    pub(crate) variant: ImageVariant,
    pub(crate) name: String,
    pub(crate) pretty_name: String,
    pub(crate) package_name: String,
    pub(crate) os_version: OsVersion,
    pub(crate) os_epoch: Option<u32>,
    pub(crate) base_image: BaseImage,
    pub(crate) exclusive_arch: Option<Vec<Arch>>,
    pub(crate) is_latest: bool,
    pub(crate) entrypoint: Option<Vec<String>>,
    pub(crate) entrypoint_user: Option<String>,
    pub(crate) cmd: Option<Vec<String>>,
    pub(crate) volumes: Option<Vec<String>>,
    pub(crate) exposes_tcp: Option<Vec<u16>>,
    pub(crate) env: OrderedMap<Scalar>,
    pub(crate) replacements: Vec<Replacement>,
    pub(crate) extra_labels: OrderedMap<String>,
    pub(crate) package_list: Vec<Package>,
    pub(crate) trailing: TrailingInstructions,
    pub(crate) config_sh_interpreter: String,
    pub(crate) maintainer: String,
    pub(crate) extra_files: OrderedMap<String>,
    pub(crate) additional_names: Vec<String>,
    pub(crate) custom_labelprefix_end: Option<String>,
    pub(crate) custom_description: Option<String>,
    pub(crate) build_recipe_type: BuildType,
    pub(crate) license: String,
    pub(crate) support_level: SupportLevel,
    pub(crate) supported_until: Option<NaiveDate>,
    pub(crate) no_recommends: bool,
    pub(crate) properties: &'static ImageProperties,
    pub(crate) version: Option<String>,
    pub(crate) stability_tag: Option<StabilityTag>,
    pub(crate) additional_versions: Vec<String>,
    pub(crate) version_in_uid: bool,
}

impl ImageDescriptor {
    /// Validate an image definition.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyPackageList`](crate::Error::EmptyPackageList) if no package is listed
    /// - [`Error::LocalArchitecture`](crate::Error::LocalArchitecture) if `exclusive_arch` contains `local`
    /// - [`Error::CustomEndWithConfigScript`](crate::Error::CustomEndWithConfigScript) if both trailing forms are set
    /// - [`Error::ConflictingBaseImage`](crate::Error::ConflictingBaseImage) if `from_image` is set with `no_base_image`
    /// - [`Error::MissingVersion`](crate::Error::MissingVersion) for a stack image without version
    /// - [`Error::UnknownStabilityTag`](crate::Error::UnknownStabilityTag) for a tag outside `stable`/`oldstable`
    /// - [`Error::PackageTypeInDockerfile`](crate::Error::PackageTypeInDockerfile) for non-image packages in a Dockerfile build
    /// - [`Error::CustomEndInKiwiBuild`](crate::Error::CustomEndInKiwiBuild) for a kiwi build with a custom end
    /// - [`Error::ExtraFileOutsideDestination`](crate::Error::ExtraFileOutsideDestination) for an extra file that is not a plain file name
    /// - [`Error::ExtraFileNameCollision`](crate::Error::ExtraFileNameCollision) for an extra file named like a generated file
    pub fn new(spec: ImageSpec) -> crate::Result<Self> {
        let image = spec.pretty_name.clone();

        if spec.package_list.is_empty() {
            return Err(crate::Error::EmptyPackageList { image });
        }

        if spec
            .exclusive_arch
            .as_ref()
            .is_some_and(|archs| archs.contains(&Arch::Local))
        {
            return Err(crate::Error::LocalArchitecture { image });
        }

        let custom_end = spec.custom_end.filter(|s| !s.is_empty());
        let config_sh_script = spec.config_sh_script.filter(|s| !s.is_empty());
        let trailing = match (custom_end, config_sh_script) {
            (Some(_), Some(_)) => {
                return Err(crate::Error::CustomEndWithConfigScript { image });
            }
            (Some(end), None) => TrailingInstructions::CustomEnd(end),
            (None, Some(script)) => TrailingInstructions::ConfigScript(script),
            (None, None) => TrailingInstructions::None,
        };

        let from_image = spec.from_image.filter(|s| !s.is_empty());
        let base_image = match (from_image, spec.no_base_image) {
            (Some(from_image), true) => {
                return Err(crate::Error::ConflictingBaseImage { image, from_image });
            }
            (Some(from_image), false) => BaseImage::Image(from_image),
            (None, true) => BaseImage::None,
            (None, false) => BaseImage::OsDefault,
        };

        let version = spec.version.filter(|v| !v.is_empty()).map(|v| v.to_string());
        if spec.kind != ImageVariant::Os && version.is_none() {
            return Err(crate::Error::MissingVersion { image });
        }

        let stability_tag = spec
            .stability_tag
            .filter(|t| !t.is_empty())
            .map(|tag| {
                tag.parse::<StabilityTag>()
                    .map_err(|_| crate::Error::UnknownStabilityTag {
                        image: image.clone(),
                        tag,
                    })
            })
            .transpose()?;

        let build_recipe_type = spec
            .build_recipe_type
            .unwrap_or_else(|| BuildType::default_for(spec.os_version));

        match build_recipe_type {
            BuildType::Docker => {
                if let Some(pkg) = spec
                    .package_list
                    .iter()
                    .find(|p| p.pkg_type != PackageType::Image)
                {
                    return Err(crate::Error::PackageTypeInDockerfile {
                        image,
                        package: pkg.name.clone(),
                        pkg_type: pkg.pkg_type.to_string(),
                    });
                }
            }
            BuildType::Kiwi => {
                if matches!(trailing, TrailingInstructions::CustomEnd(_)) {
                    return Err(crate::Error::CustomEndInKiwiBuild { image });
                }
            }
        }

        let properties = ImageProperties::for_os(spec.os_version);
        let maintainer = spec
            .maintainer
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| properties.maintainer.to_owned());

        let descriptor = Self {
            variant: spec.kind,
            name: spec.name,
            pretty_name: spec.pretty_name,
            package_name: spec.package_name,
            os_version: spec.os_version,
            os_epoch: spec.os_epoch,
            base_image,
            exclusive_arch: spec.exclusive_arch.filter(|a| !a.is_empty()),
            is_latest: spec.is_latest,
            entrypoint: spec.entrypoint.filter(|e| !e.is_empty()),
            entrypoint_user: spec.entrypoint_user.filter(|u| !u.is_empty()),
            cmd: spec.cmd.filter(|c| !c.is_empty()),
            volumes: spec.volumes.filter(|v| !v.is_empty()),
            exposes_tcp: spec.exposes_tcp.filter(|p| !p.is_empty()),
            env: spec.env,
            replacements: spec.replacements_via_service,
            extra_labels: spec.extra_labels,
            package_list: spec.package_list,
            trailing,
            config_sh_interpreter: spec.config_sh_interpreter,
            maintainer,
            extra_files: spec.extra_files,
            additional_names: spec.additional_names,
            custom_labelprefix_end: spec.custom_labelprefix_end.filter(|s| !s.is_empty()),
            custom_description: spec.custom_description.filter(|s| !s.is_empty()),
            build_recipe_type,
            license: spec.license,
            support_level: spec.support_level,
            supported_until: spec.supported_until,
            no_recommends: spec.no_recommends,
            properties,
            version,
            stability_tag,
            additional_versions: spec.additional_versions,
            version_in_uid: spec.version_in_uid,
        };

        descriptor.check_extra_file_names()?;

        tracing::debug!(
            key = %descriptor.catalog_key(),
            build_type = %descriptor.build_recipe_type,
            "image descriptor validated"
        );

        Ok(descriptor)
    }

    // ── Accessors ──

    pub fn variant(&self) -> ImageVariant {
        self.variant
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pretty_name(&self) -> &str {
        &self.pretty_name
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn os_version(&self) -> OsVersion {
        self.os_version
    }

    pub fn base_image(&self) -> &BaseImage {
        &self.base_image
    }

    pub fn exclusive_arch(&self) -> Option<&[Arch]> {
        self.exclusive_arch.as_deref()
    }

    pub fn is_latest(&self) -> bool {
        self.is_latest
    }

    pub fn entrypoint(&self) -> Option<&[String]> {
        self.entrypoint.as_deref()
    }

    pub fn entrypoint_user(&self) -> Option<&str> {
        self.entrypoint_user.as_deref()
    }

    pub fn cmd(&self) -> Option<&[String]> {
        self.cmd.as_deref()
    }

    pub fn volumes(&self) -> Option<&[String]> {
        self.volumes.as_deref()
    }

    pub fn exposes_tcp(&self) -> Option<&[u16]> {
        self.exposes_tcp.as_deref()
    }

    pub fn env(&self) -> &OrderedMap<Scalar> {
        &self.env
    }

    pub fn replacements(&self) -> &[Replacement] {
        &self.replacements
    }

    pub fn extra_labels(&self) -> &OrderedMap<String> {
        &self.extra_labels
    }

    pub fn package_list(&self) -> &[Package] {
        &self.package_list
    }

    pub fn trailing(&self) -> &TrailingInstructions {
        &self.trailing
    }

    pub fn config_sh_interpreter(&self) -> &str {
        &self.config_sh_interpreter
    }

    pub fn maintainer(&self) -> &str {
        &self.maintainer
    }

    pub fn extra_files(&self) -> &OrderedMap<String> {
        &self.extra_files
    }

    pub fn additional_names(&self) -> &[String] {
        &self.additional_names
    }

    pub fn build_recipe_type(&self) -> BuildType {
        self.build_recipe_type
    }

    pub fn license(&self) -> &str {
        &self.license
    }

    pub fn support_level(&self) -> SupportLevel {
        self.support_level
    }

    pub fn supported_until(&self) -> Option<NaiveDate> {
        self.supported_until
    }

    pub fn no_recommends(&self) -> bool {
        self.no_recommends
    }

    pub fn properties(&self) -> &'static ImageProperties {
        self.properties
    }

    /// Primary version of a stack image, `None` for OS images.
    pub fn version(&self) -> Option<&str> {
        match self.variant {
            ImageVariant::Os => None,
            _ => self.version.as_deref(),
        }
    }

    pub fn stability_tag(&self) -> Option<StabilityTag> {
        match self.variant {
            ImageVariant::Os => None,
            _ => self.stability_tag,
        }
    }

    pub fn additional_versions(&self) -> &[String] {
        match self.variant {
            ImageVariant::Os => &[],
            _ => &self.additional_versions,
        }
    }

    pub fn version_in_uid(&self) -> bool {
        self.version_in_uid
    }

    // ── Derived properties ──

    /// Unique identifier: `name` for OS images, `{name}-{version}` for stacks
    /// unless `version_in_uid` is unset.
    pub fn uid(&self) -> String {
        match (self.variant, self.version()) {
            (ImageVariant::Os, _) | (_, None) => self.name.clone(),
            (_, Some(_)) if !self.version_in_uid => self.name.clone(),
            (_, Some(version)) => format!("{}-{version}", self.name),
        }
    }

    /// Key of this image in the catalog: `{uid}-{os pretty name}`, lowercased.
    pub fn catalog_key(&self) -> String {
        format!(
            "{}-{}",
            self.uid(),
            self.os_version.pretty_print().to_lowercase()
        )
    }

    /// The `org.opencontainers.image.version` label and primary tag version.
    pub fn version_label(&self) -> String {
        match self.variant {
            ImageVariant::Os => "%OS_VERSION_ID_SP%.%RELEASE%".to_owned(),
            _ => self.version.clone().unwrap_or_default(),
        }
    }

    pub fn image_type(&self) -> ImageType {
        match self.variant {
            ImageVariant::ApplicationStack => ImageType::Application,
            ImageVariant::Os | ImageVariant::LanguageStack => ImageType::SleBci,
        }
    }

    pub fn release_stage(&self) -> ReleaseStage {
        self.os_version.release_stage()
    }

    pub fn is_opensuse(&self) -> bool {
        self.os_version.is_opensuse()
    }

    pub fn registry(&self) -> &'static str {
        self.properties.registry
    }

    pub fn vendor(&self) -> &'static str {
        self.properties.vendor
    }

    pub fn url(&self) -> &'static str {
        self.properties.url
    }

    pub fn eula(&self) -> &'static str {
        self.properties.eula
    }

    pub fn lifecycle_url(&self) -> &'static str {
        self.properties.lifecycle_url
    }

    pub fn title(&self) -> String {
        let distro = self.properties.distribution_base_name;
        match self.variant {
            ImageVariant::ApplicationStack => format!("{distro} {}", self.pretty_name),
            ImageVariant::Os | ImageVariant::LanguageStack => {
                format!("{distro} BCI {}", self.pretty_name)
            }
        }
    }

    /// The `org.opencontainers.image.description` label.
    ///
    /// A custom description may use the placeholders `{pretty_name}`,
    /// `{based_on_container}` and `{podman_only}`.
    pub fn description(&self) -> String {
        let based_on_container = match self.properties.based_on_container_description {
            Some(desc) => desc.to_owned(),
            None => format!(
                "based on the {} Base Container Image",
                self.properties.distribution_base_name
            ),
        };
        let template = self
            .custom_description
            .as_deref()
            .unwrap_or("{pretty_name} container {based_on_container}.");

        template
            .replace("{pretty_name}", &self.pretty_name)
            .replace("{based_on_container}", &based_on_container)
            .replace("{podman_only}", "This container is only supported with podman.")
    }

    /// Prefix under which the labels are duplicated, e.g.
    /// `com.suse.bci.python`.
    pub fn labelprefix(&self) -> String {
        let kind = match self.image_type() {
            ImageType::SleBci => "bci",
            ImageType::Application => "application",
        };
        let end = self.custom_labelprefix_end.as_deref().unwrap_or(&self.name);
        format!("{}.{kind}.{end}", self.properties.label_prefix)
    }

    /// The resolved base image, `None` when built from nothing.
    pub fn from_image(&self) -> Option<String> {
        match &self.base_image {
            BaseImage::None => None,
            BaseImage::Image(image) => Some(image.clone()),
            BaseImage::OsDefault => Some(match self.os_version {
                OsVersion::Tumbleweed => "opensuse/tumbleweed:latest".to_owned(),
                OsVersion::Basalt => format!(
                    "{}/bci-base:latest",
                    crate::properties::build_tag_prefix(OsVersion::Basalt)
                ),
                sp => format!("suse/sle15:15.{sp}"),
            }),
        }
    }

    /// The `#!BuildVersion` of SLE images: `15.{epoch.}{sp}`, extended by the
    /// version and stability index of stack images with a numeric version.
    pub fn build_version(&self) -> Option<String> {
        let sp = self.os_version.service_pack()?;
        let epoch = match self.os_epoch {
            Some(epoch) if epoch > 0 => format!("{epoch}."),
            _ => String::new(),
        };
        let base = format!("15.{epoch}{sp}");

        match self.version() {
            Some(version) if is_release_version(version) => {
                let stability = self
                    .stability_tag()
                    .map(|tag| format!(".{}", tag.index()))
                    .unwrap_or_default();
                Some(format!("{base}.{version}{stability}"))
            }
            _ => Some(base),
        }
    }

    /// Version of the kiwi build description.
    pub fn kiwi_version(&self, year: i32) -> String {
        match self.os_version.service_pack() {
            Some(sp) => format!("15.{sp}.0"),
            None => year.to_string(),
        }
    }

    /// The trailing Dockerfile instructions: the custom end as is, or the
    /// config script behind [`DOCKERFILE_RUN`].
    pub fn dockerfile_custom_end(&self) -> String {
        match &self.trailing {
            TrailingInstructions::CustomEnd(end) => end.clone(),
            TrailingInstructions::ConfigScript(script) => format!("{DOCKERFILE_RUN} {script}"),
            TrailingInstructions::None => String::new(),
        }
    }

    pub fn config_sh_script(&self) -> Option<&str> {
        match &self.trailing {
            TrailingInstructions::ConfigScript(script) => Some(script),
            _ => None,
        }
    }

    /// Name of the build description file.
    pub fn build_description_file(&self) -> String {
        match self.build_recipe_type {
            BuildType::Docker => "Dockerfile".to_owned(),
            BuildType::Kiwi => format!("{}.kiwi", self.package_name),
        }
    }

    /// Names of the files rendered for every build, independent of `extra_files`.
    pub fn generated_file_names(&self) -> Vec<String> {
        vec![
            self.build_description_file(),
            "config.sh".to_owned(),
            "_service".to_owned(),
            self.changes_file_name(),
        ]
    }

    /// Extra files must land directly in the destination directory and must
    /// not replace a generated file.
    fn check_extra_file_names(&self) -> crate::Result<()> {
        let generated = self.generated_file_names();
        for file in self.extra_files.keys() {
            let mut components = Path::new(file).components();
            let is_plain_name = matches!(
                (components.next(), components.next()),
                (Some(Component::Normal(_)), None)
            );
            if !is_plain_name {
                return Err(crate::Error::ExtraFileOutsideDestination {
                    image: self.pretty_name.clone(),
                    file: file.to_owned(),
                });
            }
            if generated.iter().any(|name| name == file) {
                return Err(crate::Error::ExtraFileNameCollision {
                    image: self.pretty_name.clone(),
                    file: file.to_owned(),
                });
            }
        }
        Ok(())
    }

    pub fn changes_file_name(&self) -> String {
        format!("{}.changes", self.package_name)
    }
}

/// Whether `version` is a plain dotted release number such as `1.70` or `17`.
fn is_release_version(version: &str) -> bool {
    !version.is_empty()
        && version
            .split('.')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}
