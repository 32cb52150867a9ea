use crate::descriptor::DOCKERFILE_RUN;
use crate::images::generate_disk_size_constraints;
use crate::ordered::OrderedMap;
use crate::os::{ALL_NONBASE_OS_VERSIONS, Arch, CAN_BE_LATEST_OS_VERSION, OsVersion};
use crate::package::Package;
use crate::properties::build_tag_prefix;
use crate::spec::{ImageSpec, SupportLevel};

fn openjdk_spec(os_version: OsVersion, devel: bool, java_version: u32) -> ImageSpec {
    let java_home = format!("/usr/lib64/jvm/java-{java_version}-openjdk-{java_version}");
    let package_name = if devel {
        format!("openjdk-{java_version}-devel-image")
    } else {
        format!("openjdk-{java_version}-image")
    };

    let common = ImageSpec {
        version: Some(java_version.into()),
        is_latest: java_version == 17 && CAN_BE_LATEST_OS_VERSION.contains(&os_version),
        support_level: SupportLevel::L3,
        // JAVA_HOME hardcodes /usr/lib64
        exclusive_arch: Some(vec![Arch::Aarch64, Arch::X86_64, Arch::Ppc64le, Arch::S390x]),
        env: OrderedMap::from_iter([
            ("JAVA_BINDIR", format!("{java_home}/bin").into()),
            ("JAVA_HOME", java_home.as_str().into()),
            ("JAVA_ROOT", java_home.as_str().into()),
            ("JAVA_VERSION", java_version.to_string().into()),
        ]),
        extra_files: OrderedMap::from_iter([("_constraints", generate_disk_size_constraints(6))]),
        // smoke test of the environment
        custom_end: Some(format!(
            r#"{DOCKERFILE_RUN} [ -d $JAVA_HOME ]; [ -d $JAVA_BINDIR ]; [ -f "$JAVA_BINDIR/java" ] && [ -x "$JAVA_BINDIR/java" ]"#
        )),
        ..ImageSpec::language_stack("openjdk", "", package_name, os_version)
    };

    if devel {
        ImageSpec {
            name: "openjdk-devel".to_owned(),
            pretty_name: format!("OpenJDK {java_version} development"),
            custom_labelprefix_end: Some("openjdk.devel".to_owned()),
            package_list: vec![
                Package::from(format!("java-{java_version}-openjdk-devel")),
                Package::from("git-core"),
                Package::from("maven"),
            ],
            cmd: Some(vec!["/usr/bin/jshell".to_owned()]),
            from_image: Some(format!(
                "{}/openjdk:{java_version}",
                build_tag_prefix(os_version)
            )),
            ..common
        }
    } else {
        ImageSpec {
            pretty_name: format!("OpenJDK {java_version} runtime"),
            package_list: vec![Package::from(format!("java-{java_version}-openjdk"))],
            ..common
        }
    }
}

pub(crate) fn images() -> Vec<ImageSpec> {
    let mut images = Vec::new();
    for java_version in [11, 17] {
        for &os_version in ALL_NONBASE_OS_VERSIONS {
            for devel in [true, false] {
                images.push(openjdk_spec(os_version, devel, java_version));
            }
        }
    }
    for devel in [true, false] {
        images.push(openjdk_spec(OsVersion::Tumbleweed, devel, 21));
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn devel_image_builds_on_runtime() {
        let spec = openjdk_spec(OsVersion::Tumbleweed, true, 21);
        assert_eq!(spec.from_image.as_deref(), Some("opensuse/bci/openjdk:21"));
        assert_eq!(spec.package_name, "openjdk-21-devel-image");
        assert!(!spec.is_latest);
    }

    #[test]
    fn only_17_is_latest() {
        assert!(openjdk_spec(OsVersion::Sp5, false, 17).is_latest);
        assert!(!openjdk_spec(OsVersion::Sp6, false, 17).is_latest);
        assert!(!openjdk_spec(OsVersion::Sp5, false, 11).is_latest);
    }
}
