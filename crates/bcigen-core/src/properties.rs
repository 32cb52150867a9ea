//! Vendor metadata that depends on the base operating system.

use crate::os::OsVersion;

/// Properties of an image that differ between vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageProperties {
    /// Default maintainer of the image
    pub maintainer: &'static str,
    /// Value of the `org.opencontainers.image.vendor` label
    pub vendor: &'static str,
    /// Inserted into titles as `{distribution_base_name} BCI {pretty_name}`
    pub distribution_base_name: &'static str,
    /// Registry the images are published on
    pub registry: &'static str,
    /// Vendor home page
    pub url: &'static str,
    pub eula: &'static str,
    pub lifecycle_url: &'static str,
    /// Prefix of the label names, `{label_prefix}.bci.{name}`
    pub label_prefix: &'static str,
    /// Build tag prefix of OS and language stack images
    pub build_tag_prefix: &'static str,
    /// Build tag prefix of application stack images
    pub application_container_build_tag_prefix: &'static str,
    /// Replaces the `based on the ... Base Container Image` description suffix
    pub based_on_container_description: Option<&'static str>,
}

/// Build tag prefix of OS and language stack images on `os_version`.
pub fn build_tag_prefix(os_version: OsVersion) -> &'static str {
    match os_version {
        OsVersion::Tumbleweed => "opensuse/bci",
        OsVersion::Basalt => "alp/bci",
        OsVersion::Sp3 => "suse/ltss/sle15.3",
        OsVersion::Sp4 | OsVersion::Sp5 | OsVersion::Sp6 => "bci",
    }
}

/// openSUSE Tumbleweed
pub static OPENSUSE_IMAGE_PROPS: ImageProperties = ImageProperties {
    maintainer: "openSUSE (https://www.opensuse.org/)",
    vendor: "openSUSE Project",
    distribution_base_name: "openSUSE Tumbleweed",
    registry: "registry.opensuse.org",
    url: "https://www.opensuse.org",
    eula: "sle-bci",
    lifecycle_url: "https://en.opensuse.org/Lifetime",
    label_prefix: "org.opensuse",
    build_tag_prefix: "opensuse/bci",
    application_container_build_tag_prefix: "opensuse",
    based_on_container_description: None,
};

/// SUSE Linux Enterprise 15 mainline service packs
pub static SLE_IMAGE_PROPS: ImageProperties = ImageProperties {
    maintainer: "SUSE LLC (https://www.suse.com/)",
    vendor: "SUSE LLC",
    distribution_base_name: "SLE",
    registry: "registry.suse.com",
    url: "https://www.suse.com/products/server/",
    eula: "sle-bci",
    lifecycle_url: "https://www.suse.com/lifecycle#suse-linux-enterprise-server-15",
    label_prefix: "com.suse",
    build_tag_prefix: "bci",
    application_container_build_tag_prefix: "suse",
    based_on_container_description: None,
};

/// SUSE Linux Enterprise 15 SP3 under long term service pack support
pub static SLE_15_SP3_LTSS_IMAGE_PROPS: ImageProperties = ImageProperties {
    maintainer: "SUSE LLC (https://www.suse.com/)",
    vendor: "SUSE LLC",
    distribution_base_name: "SLE LTSS",
    registry: "registry.suse.com",
    url: "https://www.suse.com/products/server/",
    eula: "sle-eula",
    lifecycle_url: "https://www.suse.com/lifecycle#suse-linux-enterprise-server-15",
    label_prefix: "com.suse",
    build_tag_prefix: "suse/ltss/sle15.3",
    application_container_build_tag_prefix: "suse",
    based_on_container_description: None,
};

/// Adaptable Linux Platform
pub static BASALT_IMAGE_PROPS: ImageProperties = ImageProperties {
    maintainer: "SUSE LLC (https://www.suse.com/)",
    vendor: "SUSE LLC",
    distribution_base_name: "Basalt Project",
    registry: "registry.suse.com",
    url: "https://susealp.io/",
    eula: "sle-bci",
    lifecycle_url: "https://www.suse.com/lifecycle",
    label_prefix: "com.suse.basalt",
    build_tag_prefix: "alp/bci",
    application_container_build_tag_prefix: "suse",
    based_on_container_description: Some("based on the SUSE Adaptable Linux Platform (ALP)"),
};

impl ImageProperties {
    /// Selects the vendor bundle for an OS version.
    pub fn for_os(os_version: OsVersion) -> &'static ImageProperties {
        match os_version {
            OsVersion::Tumbleweed => &OPENSUSE_IMAGE_PROPS,
            OsVersion::Basalt => &BASALT_IMAGE_PROPS,
            OsVersion::Sp3 => &SLE_15_SP3_LTSS_IMAGE_PROPS,
            OsVersion::Sp4 | OsVersion::Sp5 | OsVersion::Sp6 => &SLE_IMAGE_PROPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_prefix_matches_tag_prefix_helper() {
        for os in [
            OsVersion::Sp3,
            OsVersion::Sp4,
            OsVersion::Sp5,
            OsVersion::Sp6,
            OsVersion::Tumbleweed,
            OsVersion::Basalt,
        ] {
            assert_eq!(ImageProperties::for_os(os).build_tag_prefix, build_tag_prefix(os));
        }
    }

    #[test]
    fn selects_one_of_four_bundles() {
        assert_eq!(ImageProperties::for_os(OsVersion::Tumbleweed).vendor, "openSUSE Project");
        assert_eq!(ImageProperties::for_os(OsVersion::Sp3).eula, "sle-eula");
        assert_eq!(ImageProperties::for_os(OsVersion::Sp6).label_prefix, "com.suse");
        assert_eq!(
            ImageProperties::for_os(OsVersion::Basalt).label_prefix,
            "com.suse.basalt"
        );
    }
}
