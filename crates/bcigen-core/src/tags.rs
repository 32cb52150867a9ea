//! Build tag and pull reference derivation.
//!
//! Tags are emitted in a fixed order: primary name before additional names,
//! every version label before its release-suffixed twin, `latest` last for
//! each name. Collisions between names are not de-duplicated.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::descriptor::ImageDescriptor;
use crate::spec::ImageVariant;

/// Placeholder substituted by the build service with the rebuild counter.
pub const RELEASE_PLACEHOLDER: &str = "%RELEASE%";

/// Placeholder substituted with the OS version, e.g. `15.6`.
pub const OS_VERSION_PLACEHOLDER: &str = "%OS_VERSION_ID_SP%";

/// A rolling channel marker.
///
/// The position in the ordering `(none, stable, oldstable)` namespaces the
/// release number, so that two channels never publish the same
/// `{version}-{release}` tag after a version moves from one channel to the
/// other:
///
/// ```text
/// lang-stable:    1.70-1.1.1     lang-oldstable: 1.69-2.5.1
/// after rollover:
/// lang-stable:    1.71-1.1.1     lang-oldstable: 1.70-2.1.1
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StabilityTag {
    Stable,
    Oldstable,
}

impl StabilityTag {
    /// Position in the stability ordering; 0 is reserved for "no tag".
    pub fn index(self) -> u8 {
        match self {
            StabilityTag::Stable => 1,
            StabilityTag::Oldstable => 2,
        }
    }
}

impl fmt::Display for StabilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StabilityTag::Stable => "stable",
            StabilityTag::Oldstable => "oldstable",
        })
    }
}

impl FromStr for StabilityTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stable" => Ok(StabilityTag::Stable),
            "oldstable" => Ok(StabilityTag::Oldstable),
            other => Err(other.to_owned()),
        }
    }
}

impl ImageDescriptor {
    /// Numeric stability index: 0 without a stability tag.
    pub fn stability_index(&self) -> u8 {
        self.stability_tag().map_or(0, StabilityTag::index)
    }

    /// `%RELEASE%`, prefixed by the stability index when a tag is set.
    pub fn release_suffix(&self) -> String {
        match self.stability_tag() {
            Some(tag) => format!("{}.{RELEASE_PLACEHOLDER}", tag.index()),
            None => RELEASE_PLACEHOLDER.to_owned(),
        }
    }

    /// Repository prefix of the build tags, e.g. `bci` or `suse`.
    pub fn registry_prefix(&self) -> &'static str {
        match self.variant {
            ImageVariant::ApplicationStack => {
                self.properties.application_container_build_tag_prefix
            }
            ImageVariant::Os | ImageVariant::LanguageStack => self.properties.build_tag_prefix,
        }
    }

    /// All registry paths this image is published under.
    pub fn build_tags(&self) -> Vec<String> {
        let prefix = self.registry_prefix();
        let names = std::iter::once(&self.name).chain(&self.additional_names);
        let mut tags = Vec::new();

        match self.variant {
            ImageVariant::Os => {
                let version_label = self.version_label();
                for name in names {
                    tags.push(format!("{prefix}/bci-{name}:{OS_VERSION_PLACEHOLDER}"));
                    tags.push(format!("{prefix}/bci-{name}:{version_label}"));
                    if self.is_latest {
                        tags.push(format!("{prefix}/bci-{name}:latest"));
                    }
                }
            }
            ImageVariant::LanguageStack | ImageVariant::ApplicationStack => {
                let release_suffix = self.release_suffix();
                let mut ver_labels: Vec<String> = Vec::new();
                if let Some(tag) = self.stability_tag() {
                    ver_labels.push(tag.to_string());
                }
                ver_labels.push(self.version_label());
                ver_labels.extend(self.additional_versions().iter().cloned());

                for name in names {
                    for label in &ver_labels {
                        tags.push(format!("{prefix}/{name}:{label}"));
                        tags.push(format!("{prefix}/{name}:{label}-{release_suffix}"));
                    }
                    if self.is_latest {
                        tags.push(format!("{prefix}/{name}:latest"));
                    }
                }
            }
        }

        tags
    }

    /// The preferred pull reference, built from the primary name only.
    pub fn reference(&self) -> String {
        let registry = self.registry();
        let prefix = self.registry_prefix();
        match self.variant {
            ImageVariant::Os => format!(
                "{registry}/{prefix}/bci-{}:{}",
                self.name,
                self.version_label()
            ),
            ImageVariant::LanguageStack | ImageVariant::ApplicationStack => format!(
                "{registry}/{prefix}/{}:{}-{}",
                self.name,
                self.version_label(),
                self.release_suffix()
            ),
        }
    }

    /// The `#!BuildName`: the first build tag with `/` and `:` replaced by `-`.
    pub fn build_name(&self) -> Option<String> {
        self.build_tags()
            .first()
            .map(|tag| tag.replace(['/', ':'], "-"))
    }

    /// Comma separated tags, after the first, whose repository ends with the
    /// image name. Used as kiwi's `additionaltags`.
    pub fn kiwi_additional_tags(&self) -> Option<String> {
        let extra: Vec<String> = self
            .build_tags()
            .iter()
            .skip(1)
            .filter_map(|tag| tag.rsplit_once(':'))
            .filter(|(path, _)| path.ends_with(self.name.as_str()))
            .map(|(_, tag)| tag.to_owned())
            .collect();

        if extra.is_empty() {
            None
        } else {
            Some(extra.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::os::OsVersion;
    use crate::spec::ImageSpec;

    fn stack(stability_tag: Option<&str>) -> ImageDescriptor {
        ImageDescriptor::new(ImageSpec {
            version: Some("1.70".into()),
            stability_tag: stability_tag.map(str::to_owned),
            package_list: vec!["rust1.70".into()],
            ..ImageSpec::language_stack("rust", "Rust 1.70", "rust-image", OsVersion::Sp6)
        })
        .unwrap()
    }

    #[test]
    fn stability_indices_are_fixed() {
        assert_eq!(stack(None).stability_index(), 0);
        assert_eq!(stack(Some("stable")).stability_index(), 1);
        assert_eq!(stack(Some("oldstable")).stability_index(), 2);
    }

    #[test]
    fn release_suffix_carries_stability_index() {
        assert_eq!(stack(None).release_suffix(), "%RELEASE%");
        assert_eq!(stack(Some("stable")).release_suffix(), "1.%RELEASE%");
        assert_eq!(stack(Some("oldstable")).release_suffix(), "2.%RELEASE%");
    }

    #[test]
    fn stability_tag_is_the_first_tag() {
        assert_eq!(
            stack(Some("oldstable")).build_tags(),
            vec![
                "bci/rust:oldstable",
                "bci/rust:oldstable-2.%RELEASE%",
                "bci/rust:1.70",
                "bci/rust:1.70-2.%RELEASE%",
            ]
        );
    }

    #[test]
    fn kiwi_additional_tags_skip_primary() {
        assert_eq!(
            stack(None).kiwi_additional_tags().as_deref(),
            Some("1.70-%RELEASE%")
        );
    }

    #[test]
    fn build_name_flattens_first_tag() {
        assert_eq!(stack(None).build_name().as_deref(), Some("bci-rust-1.70"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn stability() -> impl Strategy<Value = Option<&'static str>> {
            prop_oneof![Just(None), Just(Some("stable")), Just(Some("oldstable"))]
        }

        fn descriptor(
            name: &str,
            version: &str,
            tag: Option<&str>,
            aliases: &[String],
            is_latest: bool,
        ) -> ImageDescriptor {
            ImageDescriptor::new(ImageSpec {
                version: Some(version.into()),
                stability_tag: tag.map(str::to_owned),
                additional_names: aliases.to_vec(),
                is_latest,
                package_list: vec!["pkg".into()],
                ..ImageSpec::language_stack(name, "Demo", "demo-image", OsVersion::Sp5)
            })
            .unwrap()
        }

        proptest! {
            #[test]
            fn derivation_is_deterministic(
                name in "[a-z][a-z0-9-]{0,12}",
                version in "[0-9]{1,2}(\\.[0-9]{1,2}){0,2}",
                tag in stability(),
                aliases in proptest::collection::vec("[a-z]{1,8}", 0..3),
                is_latest in any::<bool>(),
            ) {
                let a = descriptor(&name, &version, tag, &aliases, is_latest);
                let b = descriptor(&name, &version, tag, &aliases, is_latest);
                prop_assert_eq!(a.build_tags(), b.build_tags());
                prop_assert_eq!(a.reference(), b.reference());
            }

            #[test]
            fn tag_count_and_latest_position(
                name in "[a-z][a-z0-9-]{0,12}",
                tag in stability(),
                aliases in proptest::collection::vec("[a-z]{1,8}", 0..3),
                is_latest in any::<bool>(),
            ) {
                let image = descriptor(&name, "2.0", tag, &aliases, is_latest);
                let tags = image.build_tags();
                let labels = 1 + usize::from(tag.is_some());
                let per_name = labels * 2 + usize::from(is_latest);
                prop_assert_eq!(tags.len(), per_name * (1 + aliases.len()));
                if is_latest {
                    prop_assert!(tags.last().unwrap().ends_with(":latest"));
                }
            }

            #[test]
            fn reference_never_uses_aliases(
                aliases in proptest::collection::vec("[a-z]{1,8}", 1..3),
                tag in stability(),
            ) {
                let image = descriptor("primary", "1.0", tag, &aliases, false);
                let reference = image.reference();
                let expected_prefix = "registry.suse.com/bci/primary:1.0-";
                prop_assert!(reference.starts_with(expected_prefix));
            }
        }
    }
}
