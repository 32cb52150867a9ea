use crate::images::{generate_disk_size_constraints, with_lifecycle_data};
use crate::ordered::OrderedMap;
use crate::os::{ALL_NONBASE_OS_VERSIONS, CAN_BE_LATEST_OS_VERSION, OsVersion};
use crate::package::{ParseVersion, Replacement};
use crate::spec::ImageSpec;
use crate::tags::StabilityTag;

const RUST_VERSIONS: [(&str, StabilityTag); 2] = [
    ("1.76", StabilityTag::Stable),
    ("1.75", StabilityTag::Oldstable),
];

fn rust_spec(ver: &str, stability: StabilityTag, os_version: OsVersion) -> ImageSpec {
    let rust = format!("rust{ver}");
    let cargo = format!("cargo{ver}");
    let version_replacement = "%%RUST_VERSION%%";

    ImageSpec {
        version: Some(ver.into()),
        stability_tag: Some(stability.to_string()),
        is_latest: stability == StabilityTag::Stable
            && CAN_BE_LATEST_OS_VERSION.contains(&os_version),
        env: OrderedMap::from_iter([
            ("RUST_VERSION", version_replacement.into()),
            ("CARGO_HOME", "/root/.cargo".into()),
            ("PATH", "/root/.cargo/bin:/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin".into()),
        ]),
        replacements_via_service: vec![
            Replacement::new(version_replacement, rust.clone())
                .with_parse_version(ParseVersion::Patch),
        ],
        package_list: with_lifecycle_data(
            &[rust.as_str(), cargo.as_str(), "distribution-release"],
            os_version,
        ),
        extra_files: OrderedMap::from_iter([("_constraints", generate_disk_size_constraints(6))]),
        ..ImageSpec::language_stack(
            "rust",
            format!("Rust {ver}"),
            format!("rust-{stability}-image"),
            os_version,
        )
    }
}

pub(crate) fn images() -> Vec<ImageSpec> {
    ALL_NONBASE_OS_VERSIONS
        .iter()
        .flat_map(|&os_version| {
            RUST_VERSIONS
                .iter()
                .map(move |&(ver, stability)| rust_spec(ver, stability, os_version))
        })
        .collect()
}
