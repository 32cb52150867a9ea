use crate::images::with_lifecycle_data;
use crate::ordered::OrderedMap;
use crate::os::{ALL_NONBASE_OS_VERSIONS, CAN_BE_LATEST_OS_VERSION, OsVersion};
use crate::package::Replacement;
use crate::spec::{ImageSpec, SupportLevel};

const NODE_VERSIONS: [u32; 2] = [18, 20];

fn node_spec(ver: u32, os_version: OsVersion) -> ImageSpec {
    let nodejs = format!("nodejs{ver}");
    let npm = format!("npm{ver}");
    let npm_replacement = "%%npm_ver%%";

    ImageSpec {
        version: Some(ver.into()),
        additional_names: vec!["node".to_owned()],
        is_latest: ver == NODE_VERSIONS[NODE_VERSIONS.len() - 1]
            && CAN_BE_LATEST_OS_VERSION.contains(&os_version),
        support_level: SupportLevel::L3,
        env: OrderedMap::from_iter([
            ("NODE_VERSION", ver.into()),
            ("NPM_VERSION", npm_replacement.into()),
        ]),
        replacements_via_service: vec![Replacement::new(npm_replacement, npm.clone())],
        package_list: with_lifecycle_data(
            &[
                nodejs.as_str(),
                npm.as_str(),
                "git-core",
                // dependency of nodejs
                "update-alternatives",
                "distribution-release",
            ],
            os_version,
        ),
        ..ImageSpec::language_stack(
            "nodejs",
            format!("Node.js {ver} development"),
            format!("nodejs-{ver}-image"),
            os_version,
        )
    }
}

pub(crate) fn images() -> Vec<ImageSpec> {
    ALL_NONBASE_OS_VERSIONS
        .iter()
        .flat_map(|&os_version| NODE_VERSIONS.iter().map(move |&ver| node_spec(ver, os_version)))
        .collect()
}
