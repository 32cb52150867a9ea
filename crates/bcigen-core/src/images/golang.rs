use crate::descriptor::DOCKERFILE_RUN;
use crate::images::{generate_disk_size_constraints, with_lifecycle_data};
use crate::ordered::OrderedMap;
use crate::os::{ALL_NONBASE_OS_VERSIONS, CAN_BE_LATEST_OS_VERSION, OsVersion};
use crate::package::Replacement;
use crate::spec::{ImageSpec, SupportLevel};
use crate::tags::StabilityTag;

/// Go releases currently maintained, newest first.
const GOLANG_VERSIONS: [(&str, StabilityTag); 2] = [
    ("1.22", StabilityTag::Stable),
    ("1.21", StabilityTag::Oldstable),
];

fn golang_spec(ver: &str, stability: StabilityTag, os_version: OsVersion) -> ImageSpec {
    let go = format!("go{ver}");
    let version_replacement = "%%golang_version%%";

    ImageSpec {
        version: Some(ver.into()),
        stability_tag: Some(stability.to_string()),
        is_latest: stability == StabilityTag::Stable
            && CAN_BE_LATEST_OS_VERSION.contains(&os_version),
        support_level: SupportLevel::L3,
        env: OrderedMap::from_iter([
            ("GOLANG_VERSION", version_replacement.into()),
            ("GOPATH", "/go".into()),
            (
                "PATH",
                "/go/bin:/usr/local/go/bin:/root/go/bin/:/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin".into(),
            ),
        ]),
        replacements_via_service: vec![Replacement::new(version_replacement, go.clone())],
        package_list: with_lifecycle_data(&[go.as_str(), "distribution-release", "make", "git-core"], os_version),
        // the go toolchains are huge and fail on workers with a 4GB root partition
        extra_files: OrderedMap::from_iter([("_constraints", generate_disk_size_constraints(8))]),
        custom_end: Some(format!(
            "{DOCKERFILE_RUN} install -m 755 -d /go/bin /go/src /go/pkg\nWORKDIR /go"
        )),
        ..ImageSpec::language_stack(
            "golang",
            format!("Go {ver} development"),
            format!("golang-{stability}-image"),
            os_version,
        )
    }
}

pub(crate) fn images() -> Vec<ImageSpec> {
    ALL_NONBASE_OS_VERSIONS
        .iter()
        .flat_map(|&os_version| {
            GOLANG_VERSIONS
                .iter()
                .map(move |&(ver, stability)| golang_spec(ver, stability, os_version))
        })
        .collect()
}
