use crate::images::release_package;
use crate::ordered::OrderedMap;
use crate::os::{CAN_BE_LATEST_OS_VERSION, OsVersion};
use crate::package::Package;
use crate::properties::build_tag_prefix;
use crate::spec::{BuildType, ImageSpec, SupportLevel};

/// OS versions with the small OS images and `init`.
const OS_IMAGE_VERSIONS: [OsVersion; 3] = [OsVersion::Sp5, OsVersion::Sp6, OsVersion::Tumbleweed];

/// Tag of the base OS release: `15.6` or `latest` for rolling releases.
fn container_os_version(os_version: OsVersion) -> String {
    match os_version.service_pack() {
        Some(sp) => format!("15.{sp}"),
        None => "latest".to_owned(),
    }
}

fn bootstrap(names: &[&str], os_version: OsVersion) -> Vec<Package> {
    names
        .iter()
        .copied()
        .chain(std::iter::once(release_package(os_version)))
        .map(Package::bootstrap)
        .collect()
}

fn init_spec(os_version: OsVersion) -> ImageSpec {
    ImageSpec {
        is_latest: CAN_BE_LATEST_OS_VERSION.contains(&os_version),
        support_level: SupportLevel::L3,
        custom_description: Some(
            "Systemd environment for containers {based_on_container}. {podman_only}".to_owned(),
        ),
        package_list: vec!["systemd".into(), "gzip".into()],
        cmd: Some(vec!["/usr/lib/systemd/systemd".to_owned()]),
        extra_labels: OrderedMap::from_iter([(
            "usage",
            "This container should only be used to build containers for daemons. \
             Add your packages and enable services using systemctl."
                .to_owned(),
        )]),
        custom_end: Some(
            "RUN mkdir -p /etc/systemd/system.conf.d/ && \\\n    \
             printf \"[Manager]\\nLogColor=no\" > \\\n        \
             /etc/systemd/system.conf.d/01-sle-bci-nocolor.conf\n\
             RUN systemctl disable getty@tty1.service\n\
             HEALTHCHECK --interval=5s --timeout=5s --retries=5 CMD [\"/usr/bin/systemctl\", \"is-active\", \"multi-user.target\"]\n\
             STOPSIGNAL SIGRTMIN+3"
                .to_owned(),
        ),
        build_recipe_type: Some(BuildType::Docker),
        ..ImageSpec::os("init", "Init", "init-image", os_version)
    }
}

fn micro_spec(os_version: OsVersion) -> ImageSpec {
    ImageSpec {
        is_latest: CAN_BE_LATEST_OS_VERSION.contains(&os_version),
        support_level: SupportLevel::L3,
        no_base_image: true,
        build_recipe_type: Some(BuildType::Kiwi),
        custom_description: Some(
            "{pretty_name} container {based_on_container}. Intended for static binaries.".to_owned(),
        ),
        package_list: bootstrap(
            &["bash", "ca-certificates-mozilla-prebuilt", "coreutils", "glibc", "libcap2"],
            os_version,
        ),
        cmd: Some(vec!["/bin/sh".to_owned()]),
        config_sh_script: Some(
            "#======================================\n\
             # Remove locale files\n\
             #--------------------------------------\n\
             shopt -s globstar\n\
             rm -f /usr/share/locale/**/*.mo"
                .to_owned(),
        ),
        ..ImageSpec::os("micro", "Micro", "micro-image", os_version)
    }
}

fn minimal_spec(os_version: OsVersion) -> ImageSpec {
    ImageSpec {
        is_latest: CAN_BE_LATEST_OS_VERSION.contains(&os_version),
        support_level: SupportLevel::L3,
        from_image: Some(format!(
            "{}/bci-micro:{}",
            build_tag_prefix(os_version),
            container_os_version(os_version)
        )),
        build_recipe_type: Some(BuildType::Kiwi),
        package_list: vec![
            Package::from("rpm"),
            Package::from("zypper"),
            Package::uninstall("libsolv-tools-base"),
            Package::uninstall("libzypp"),
        ],
        config_sh_script: Some(
            "# not making sense in a zypper-free image\n\
             rm -f /var/lib/zypp/AutoInstalled"
                .to_owned(),
        ),
        ..ImageSpec::os("minimal", "Minimal", "minimal-image", os_version)
    }
}

fn busybox_spec(os_version: OsVersion) -> ImageSpec {
    ImageSpec {
        is_latest: CAN_BE_LATEST_OS_VERSION.contains(&os_version),
        no_base_image: true,
        build_recipe_type: Some(BuildType::Kiwi),
        custom_description: Some(
            "{pretty_name} container {based_on_container} with busybox as the only userspace."
                .to_owned(),
        ),
        package_list: bootstrap(
            &["busybox", "busybox-links", "ca-certificates-mozilla-prebuilt"],
            os_version,
        ),
        cmd: Some(vec!["/bin/sh".to_owned()]),
        config_sh_interpreter: "/bin/sh".to_owned(),
        config_sh_script: Some(
            "sed -i 's|/bin/bash|/bin/sh|' /etc/passwd\n\
             \n\
             # Will be recreated by the next rpm(1) run as root user\n\
             rm -v /usr/lib/sysimage/rpm/Index.db"
                .to_owned(),
        ),
        ..ImageSpec::os("busybox", "Busybox", "busybox-image", os_version)
    }
}

fn basalt_base_spec() -> ImageSpec {
    let os_version = OsVersion::Basalt;
    ImageSpec {
        is_latest: true,
        no_base_image: true,
        build_recipe_type: Some(BuildType::Kiwi),
        custom_description: Some("Image for containers {based_on_container}.".to_owned()),
        package_list: bootstrap(
            &[
                "aaa_base",
                "bash",
                "ca-certificates-mozilla",
                "coreutils",
                "gzip",
                "netcfg",
                "tar",
                "timezone",
                "zypper",
            ],
            os_version,
        ),
        config_sh_script: Some(
            "# remove the installation logs\n\
             rm -rf /var/log/zypper.log /var/log/zypp/history"
                .to_owned(),
        ),
        ..ImageSpec::os("base", "Base", "base-image", os_version)
    }
}

pub(crate) fn images() -> Vec<ImageSpec> {
    let mut images: Vec<ImageSpec> = OS_IMAGE_VERSIONS
        .iter()
        .flat_map(|&os_version| {
            [
                init_spec(os_version),
                micro_spec(os_version),
                minimal_spec(os_version),
                busybox_spec(os_version),
            ]
        })
        .collect();
    images.push(basalt_base_spec());
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PackageType;

    #[test]
    fn minimal_derives_from_micro() {
        assert_eq!(
            minimal_spec(OsVersion::Sp6).from_image.as_deref(),
            Some("bci/bci-micro:15.6")
        );
        assert_eq!(
            minimal_spec(OsVersion::Tumbleweed).from_image.as_deref(),
            Some("opensuse/bci/bci-micro:latest")
        );
    }

    #[test]
    fn micro_bootstraps_release_package() {
        let spec = micro_spec(OsVersion::Tumbleweed);
        let last = spec.package_list.last().unwrap();
        assert_eq!(last.name, "openSUSE-release");
        assert_eq!(last.pkg_type, PackageType::Bootstrap);
    }
}
