use crate::descriptor::DOCKERFILE_RUN;
use crate::images::with_lifecycle_data;
use crate::ordered::OrderedMap;
use crate::os::{ALL_NONBASE_OS_VERSIONS, CAN_BE_LATEST_OS_VERSION, OsVersion};
use crate::package::{Package, ParseVersion, Replacement};
use crate::spec::{ImageSpec, SupportLevel};

const POSTGRES_ENTRYPOINT: &str = include_str!("files/postgres-entrypoint.sh");
const REGISTRY_CONFIG: &str = include_str!("files/registry-config.yml");
const NGINX_ENTRYPOINT: &str = include_str!("files/nginx-entrypoint.sh");

const POSTGRES_VERSIONS: [u32; 3] = [16, 15, 14];

fn can_be_latest(os_version: OsVersion) -> bool {
    CAN_BE_LATEST_OS_VERSION.contains(&os_version)
}

fn three_eight_nine_ds(os_version: OsVersion) -> ImageSpec {
    let version = "%%389ds_version%%";
    ImageSpec {
        version: Some(version.into()),
        version_in_uid: false,
        is_latest: can_be_latest(os_version),
        support_level: SupportLevel::L3,
        maintainer: Some("william.brown@suse.com".to_owned()),
        replacements_via_service: vec![
            Replacement::new(version, "389-ds").with_parse_version(ParseVersion::Minor),
        ],
        package_list: vec![
            "389-ds".into(),
            "timezone".into(),
            "openssl".into(),
            "nss_synonyms".into(),
        ],
        cmd: Some(vec!["/usr/lib/dirsrv/dscontainer".to_owned(), "-r".to_owned()]),
        volumes: Some(vec!["/data".to_owned()]),
        exposes_tcp: Some(vec![3389, 3636]),
        custom_end: Some(format!(
            "{DOCKERFILE_RUN} mkdir -p /data/config; \\\n    \
             mkdir -p /data/ssca; \\\n    \
             mkdir -p /data/run; \\\n    \
             mkdir -p /var/run/dirsrv; \\\n    \
             ln -s /data/config /etc/dirsrv/slapd-localhost; \\\n    \
             ln -s /data/ssca /etc/dirsrv/ssca; \\\n    \
             ln -s /data/run /var/run/dirsrv\n\n\
             HEALTHCHECK --start-period=5m --timeout=5s --interval=5s --retries=2 \\\n    \
             CMD /usr/lib/dirsrv/dscontainer -H"
        )),
        ..ImageSpec::application_stack(
            "389-ds",
            "389 Directory Server",
            "389-ds-container",
            os_version,
        )
    }
}

fn postgres(os_version: OsVersion, ver: u32) -> ImageSpec {
    let pg_version = "%%pg_version%%";
    let server = format!("postgresql{ver}-server");
    ImageSpec {
        version: Some(ver.into()),
        additional_versions: vec![pg_version.to_owned()],
        is_latest: ver == POSTGRES_VERSIONS[0] && can_be_latest(os_version),
        support_level: SupportLevel::Acc,
        license: "PostgreSQL".to_owned(),
        package_list: with_lifecycle_data(
            &[server.as_str(), "distribution-release", "findutils"],
            os_version,
        ),
        replacements_via_service: vec![
            Replacement::new(pg_version, server.clone()).with_parse_version(ParseVersion::Minor),
        ],
        entrypoint: Some(vec!["/usr/local/bin/docker-entrypoint.sh".to_owned()]),
        cmd: Some(vec!["postgres".to_owned()]),
        env: OrderedMap::from_iter([
            ("LANG", "en_US.utf8".into()),
            ("PG_MAJOR", ver.into()),
            ("PG_VERSION", pg_version.into()),
            ("PGDATA", "/var/lib/postgresql/data".into()),
        ]),
        extra_files: OrderedMap::from_iter([(
            "docker-entrypoint.sh",
            POSTGRES_ENTRYPOINT.to_owned(),
        )]),
        volumes: Some(vec!["$PGDATA".to_owned()]),
        exposes_tcp: Some(vec![5432]),
        custom_end: Some(
            "COPY docker-entrypoint.sh /usr/local/bin/\n\
             RUN chmod +x /usr/local/bin/docker-entrypoint.sh; \\\n    \
             sed -i -e 's/exec gosu postgres \"/exec setpriv --reuid=postgres --regid=postgres --clear-groups -- \"/g' /usr/local/bin/docker-entrypoint.sh; \\\n    \
             mkdir /docker-entrypoint-initdb.d; \\\n    \
             install -m 1775 -o postgres -g postgres -d /run/postgresql\n\n\
             STOPSIGNAL SIGINT\n\
             HEALTHCHECK --interval=10s --start-period=10s --timeout=5s \\\n    \
             CMD pg_isready -U ${POSTGRES_USER:-postgres} -h localhost -p 5432"
                .to_owned(),
        ),
        ..ImageSpec::application_stack(
            "postgres",
            format!("PostgreSQL {ver}"),
            format!("postgres-{ver}-image"),
            os_version,
        )
    }
}

fn git(os_version: OsVersion) -> ImageSpec {
    let version = "%%git_version%%";
    ImageSpec {
        version: Some(version.into()),
        version_in_uid: false,
        is_latest: can_be_latest(os_version),
        support_level: SupportLevel::L3,
        license: "GPL-2.0-only".to_owned(),
        replacements_via_service: vec![
            Replacement::new(version, "git-core").with_parse_version(ParseVersion::Minor),
        ],
        package_list: vec!["git-core".into(), "openssh-clients".into()],
        custom_end: Some(format!("{DOCKERFILE_RUN} git --version")),
        ..ImageSpec::application_stack("git", "Git", "git-container", os_version)
    }
}

fn registry(os_version: OsVersion) -> ImageSpec {
    let version = "%%registry_version%%";
    ImageSpec {
        version: Some(version.into()),
        version_in_uid: false,
        is_latest: can_be_latest(os_version),
        license: "Apache-2.0".to_owned(),
        replacements_via_service: vec![
            Replacement::new(version, "distribution-registry")
                .with_parse_version(ParseVersion::Minor),
        ],
        package_list: vec![
            Package::from("apache2-utils"),
            Package::from("ca-certificates-mozilla"),
            Package::from("distribution-registry"),
            Package::from("perl"),
            Package::from("util-linux"),
        ],
        entrypoint: Some(vec!["/usr/bin/registry".to_owned()]),
        entrypoint_user: Some("registry".to_owned()),
        cmd: Some(vec!["serve".to_owned(), "/etc/registry/config.yml".to_owned()]),
        extra_files: OrderedMap::from_iter([("config.yml", REGISTRY_CONFIG.to_owned())]),
        volumes: Some(vec!["/var/lib/docker-registry".to_owned()]),
        exposes_tcp: Some(vec![5000]),
        custom_end: Some(format!(
            "{DOCKERFILE_RUN} mkdir -p /etc/registry; \\\n    \
             install -o registry -g registry -m 755 -d /var/lib/docker-registry\n\
             COPY config.yml /etc/registry/config.yml"
        )),
        ..ImageSpec::application_stack(
            "registry",
            "OCI Container Registry (Distribution)",
            "distribution-image",
            os_version,
        )
    }
}

fn nginx(os_version: OsVersion) -> ImageSpec {
    let version = "%%nginx_version%%";
    ImageSpec {
        version: Some(version.into()),
        version_in_uid: false,
        is_latest: can_be_latest(os_version),
        license: "BSD-2-Clause".to_owned(),
        replacements_via_service: vec![
            Replacement::new(version, "nginx").with_parse_version(ParseVersion::Minor),
        ],
        package_list: vec![
            "gawk".into(),
            "nginx".into(),
            "findutils".into(),
            "envsubst".into(),
        ],
        entrypoint: Some(vec!["/usr/local/bin/docker-entrypoint.sh".to_owned()]),
        cmd: Some(vec![
            "nginx".to_owned(),
            "-g".to_owned(),
            "daemon off;".to_owned(),
        ]),
        extra_files: OrderedMap::from_iter([(
            "docker-entrypoint.sh",
            NGINX_ENTRYPOINT.to_owned(),
        )]),
        exposes_tcp: Some(vec![80]),
        custom_end: Some(format!(
            "{DOCKERFILE_RUN} mkdir /docker-entrypoint.d\n\
             COPY docker-entrypoint.sh /usr/local/bin/\n\
             RUN chmod +x /usr/local/bin/docker-entrypoint.sh\n\
             {DOCKERFILE_RUN} ln -sf /dev/stdout /var/log/nginx/access.log; \\\n    \
             ln -sf /dev/stderr /var/log/nginx/error.log\n\
             STOPSIGNAL SIGQUIT"
        )),
        ..ImageSpec::application_stack("nginx", "NGINX", "rmt-nginx-image", os_version)
    }
}

pub(crate) fn images() -> Vec<ImageSpec> {
    let mut images = Vec::new();
    for &os_version in ALL_NONBASE_OS_VERSIONS {
        images.push(three_eight_nine_ds(os_version));
        images.push(git(os_version));
        images.push(registry(os_version));
        images.push(nginx(os_version));
        images.extend(POSTGRES_VERSIONS.iter().map(|&ver| postgres(os_version, ver)));
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_latest_is_newest_major() {
        assert!(postgres(OsVersion::Sp5, 16).is_latest);
        assert!(!postgres(OsVersion::Sp5, 15).is_latest);
        assert!(!postgres(OsVersion::Sp6, 16).is_latest);
    }

    #[test]
    fn bundled_files_are_not_empty() {
        assert!(POSTGRES_ENTRYPOINT.starts_with("#!/bin/bash"));
        assert!(REGISTRY_CONFIG.contains("rootdirectory: /var/lib/docker-registry"));
        assert!(NGINX_ENTRYPOINT.starts_with("#!/bin/sh"));
    }
}
