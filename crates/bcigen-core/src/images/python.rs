use chrono::NaiveDate;

use crate::images::with_lifecycle_data;
use crate::ordered::OrderedMap;
use crate::os::{CAN_BE_LATEST_OS_VERSION, OsVersion};
use crate::package::Replacement;
use crate::spec::{ImageSpec, SupportLevel};

fn python_spec(py3_ver: &str, os_version: OsVersion) -> ImageSpec {
    let system_py = if os_version == OsVersion::Tumbleweed {
        "3.11"
    } else {
        "3.6"
    };
    let is_system_py = py3_ver == system_py;
    let nodots = py3_ver.replace('.', "");

    let py3 = if is_system_py && os_version != OsVersion::Tumbleweed {
        "python3".to_owned()
    } else {
        format!("python{nodots}")
    };
    let py3_ver_replacement = format!("%%py{nodots}_ver%%");
    let pip3 = format!("{py3}-pip");
    let pip3_replacement = "%%pip_ver%%";

    // pipx is shipped on Tumbleweed and with Python 3.11 on SLE
    let has_pipx = os_version == OsVersion::Tumbleweed
        || (!os_version.is_rolling() && py3_ver == "3.11");

    let mut packages = vec![
        format!("{py3}-devel"),
        py3.clone(),
        pip3.clone(),
        "curl".to_owned(),
        "git-core".to_owned(),
    ];
    if is_system_py || os_version == OsVersion::Tumbleweed {
        packages.push(format!("{py3}-wheel"));
    }
    if has_pipx {
        packages.push(format!("{py3}-pipx"));
    }
    let packages: Vec<&str> = packages.iter().map(String::as_str).collect();

    let mut config_sh_script = "install -d -m 0755 /root/.local/bin".to_owned();
    if !is_system_py {
        config_sh_script.push_str(&format!(
            "; ln -s /usr/bin/python{py3_ver} /usr/local/bin/python3; \\\n    ln -s /usr/bin/pydoc{py3_ver} /usr/local/bin/pydoc"
        ));
    }

    ImageSpec {
        version: Some(py3_ver.into()),
        additional_versions: vec!["3".to_owned()],
        env: OrderedMap::from_iter([
            ("PYTHON_VERSION", py3_ver_replacement.as_str().into()),
            ("PATH", "$PATH:/root/.local/bin".into()),
            ("PIP_VERSION", pip3_replacement.into()),
        ]),
        package_list: with_lifecycle_data(&packages, os_version),
        replacements_via_service: vec![
            Replacement::new(py3_ver_replacement.clone(), format!("{py3}-base")),
            Replacement::new(pip3_replacement, pip3.clone()),
        ],
        config_sh_script: Some(config_sh_script),
        ..ImageSpec::language_stack(
            "python",
            format!("Python {py3_ver} development"),
            format!("python-{py3_ver}-image"),
            os_version,
        )
    }
}

pub(crate) fn images() -> Vec<ImageSpec> {
    let mut images = Vec::new();

    for os_version in [OsVersion::Sp5, OsVersion::Sp6] {
        images.push(ImageSpec {
            support_level: SupportLevel::L3,
            ..python_spec("3.6", os_version)
        });
    }

    // TODO: add 3.12 to Tumbleweed once it leaves the staging project
    let tw_versions = ["3.9", "3.10", "3.11"];
    for pyver in tw_versions {
        images.push(ImageSpec {
            is_latest: Some(&pyver) == tw_versions.last(),
            ..python_spec(pyver, OsVersion::Tumbleweed)
        });
    }

    for os_version in [OsVersion::Sp5, OsVersion::Sp6] {
        images.push(ImageSpec {
            support_level: SupportLevel::L3,
            // PEP 664 ends upstream support 2027-10-31, SUSE supports until the end of the year
            supported_until: NaiveDate::from_ymd_opt(2027, 12, 31),
            is_latest: CAN_BE_LATEST_OS_VERSION.contains(&os_version),
            ..python_spec("3.11", os_version)
        });
    }

    // the long term 3.11 stays `latest` on SP6
    images.push(ImageSpec {
        support_level: SupportLevel::L3,
        supported_until: OsVersion::Sp6.supported_until(),
        is_latest: false,
        ..python_spec("3.12", OsVersion::Sp6)
    });

    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::Package;

    #[test]
    fn system_python_uses_unversioned_packages() {
        let spec = python_spec("3.6", OsVersion::Sp5);
        assert_eq!(spec.package_list[0], Package::from("python3-devel"));
        assert!(spec.package_list.contains(&Package::from("python3-wheel")));
        assert!(
            !spec
                .config_sh_script
                .as_deref()
                .unwrap()
                .contains("ln -s")
        );
    }

    #[test]
    fn non_system_python_links_interpreter() {
        let spec = python_spec("3.11", OsVersion::Sp6);
        assert!(spec.package_list.contains(&Package::from("python311-pipx")));
        assert!(
            spec.config_sh_script
                .as_deref()
                .unwrap()
                .contains("/usr/bin/python3.11")
        );
    }
}
