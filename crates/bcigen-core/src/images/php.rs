use std::fmt;

use crate::descriptor::DOCKERFILE_RUN;
use crate::ordered::{OrderedMap, Scalar};
use crate::os::OsVersion;
use crate::package::{Package, Replacement};
use crate::spec::ImageSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhpVariant {
    Cli,
    Apache,
    Fpm,
}

impl PhpVariant {
    /// Command that `docker-php-entrypoint` prepends to option-only arguments.
    fn command(self) -> &'static str {
        match self {
            PhpVariant::Cli => "php",
            PhpVariant::Apache => "apache2-foreground",
            PhpVariant::Fpm => "php-fpm",
        }
    }
}

impl fmt::Display for PhpVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PhpVariant::Cli => "PHP",
            PhpVariant::Apache => "PHP-Apache",
            PhpVariant::Fpm => "PHP-FPM",
        })
    }
}

const EMPTY_SCRIPT: &str = r#"#!/bin/sh
echo "This script is not required in this PHP container."
"#;

const COMMON_END: &str = "COPY docker-php-source docker-php-entrypoint docker-php-ext-configure docker-php-ext-enable docker-php-ext-install /usr/local/bin/
RUN chmod +x /usr/local/bin/docker-php-*
";

const APACHE_END: &str = "
STOPSIGNAL SIGWINCH

# create our own apache2-foreground from the systemd startup script
RUN sed 's|^exec $apache_bin|exec $apache_bin -DFOREGROUND|' /usr/sbin/start_apache2 > /usr/local/bin/apache2-foreground
RUN chmod +x /usr/local/bin/apache2-foreground

# apache fails to start without its log folder
RUN mkdir -p /var/log/apache2

WORKDIR /srv/www/htdocs

EXPOSE 80
";

const FPM_CONFIG: &str = r#" \
	cd /etc/php8/fpm/; \
        test -e php-fpm.d/www.conf.default && cp -p php-fpm.d/www.conf.default php-fpm.d/www.conf; \
        test -e php-fpm.conf.default && cp -p php-fpm.conf.default php-fpm.conf; \
	{ \
		echo '[global]'; \
		echo 'error_log = /proc/self/fd/2'; \
		echo; echo 'log_limit = 8192'; \
		echo; \
		echo '[www]'; \
		echo '; if we send this to /proc/self/fd/1, it never appears'; \
		echo 'access.log = /proc/self/fd/2'; \
		echo; \
		echo 'clear_env = no'; \
		echo; \
		echo '; Ensure worker stdout and stderr are sent to the main error log.'; \
		echo 'catch_workers_output = yes'; \
		echo 'decorate_workers_output = no'; \
	} | tee php-fpm.d/docker.conf; \
	{ \
		echo '[global]'; \
		echo 'daemonize = no'; \
	} | tee php-fpm.d/zz-docker.conf

# stop gracefully
STOPSIGNAL SIGQUIT

EXPOSE 9000
"#;

fn php_entrypoint(variant: PhpVariant) -> String {
    let cmd = variant.command();
    format!(
        r#"#!/bin/sh
set -e

# first arg is `-f` or `--some-option`
if [ "${{1#-}}" != "$1" ]; then
	set -- {cmd} "$@"
fi

exec "$@"
"#
    )
}

fn php_ext_install(php_version: u32) -> String {
    format!(
        r#"#!/bin/bash
set -euo pipefail

extensions=()

for ext in $@; do
    [[ "$ext" =~ ^- ]] || extensions+=("php{php_version}-$ext")
done

zypper -n in ${{extensions[*]}}
"#
    )
}

fn php_spec(os_version: OsVersion, variant: PhpVariant, php_version: u32) -> ImageSpec {
    let php = format!("php{php_version}");
    let mut env: OrderedMap<Scalar> = OrderedMap::from_iter([
        ("PHP_VERSION", "%%php_version%%".into()),
        ("PHP_INI_DIR", format!("/etc/php{php_version}/").into()),
        ("PHPIZE_DEPS", format!("php{php_version}-devel awk make").into()),
        ("COMPOSER_VERSION", "%%composer_version%%".into()),
    ]);

    let (extra_pkgs, cmd, custom_end) = match variant {
        PhpVariant::Apache => {
            env.insert("APACHE_CONFDIR", "/etc/apache2".into());
            // Tumbleweed's apache has dropped envvars
            if os_version != OsVersion::Tumbleweed {
                env.insert("APACHE_ENVVARS", "/usr/sbin/envvars".into());
            }
            (
                vec![format!("apache2-mod_php{php_version}")],
                vec!["apache2-foreground"],
                format!("{COMMON_END}{APACHE_END}"),
            )
        }
        PhpVariant::Fpm => (
            vec![format!("php{php_version}-fpm")],
            vec!["php-fpm"],
            format!("{COMMON_END}WORKDIR /srv/www/htdocs\n\n{DOCKERFILE_RUN}{FPM_CONFIG}"),
        ),
        PhpVariant::Cli => {
            let extra = if matches!(os_version, OsVersion::Tumbleweed | OsVersion::Sp6) {
                vec![format!("php{php_version}-readline")]
            } else {
                Vec::new()
            };
            (extra, vec!["php", "-a"], COMMON_END.to_owned())
        }
    };

    let mut package_list: Vec<Package> = [
        php.clone(),
        format!("{php}-cli"),
        "php-composer2".to_owned(),
        format!("{php}-curl"),
        format!("{php}-zip"),
        format!("{php}-zlib"),
        format!("{php}-phar"),
        format!("{php}-mbstring"),
    ]
    .into_iter()
    .map(Package::from)
    .collect();
    package_list.extend(extra_pkgs.into_iter().map(Package::from));

    let name = variant.to_string().to_lowercase();
    ImageSpec {
        version: Some(php_version.into()),
        no_recommends: false,
        package_list,
        replacements_via_service: vec![
            Replacement::new("%%composer_version%%", "php-composer2"),
            Replacement::new("%%php_version%%", php),
        ],
        cmd: Some(cmd.into_iter().map(str::to_owned).collect()),
        entrypoint: Some(vec!["docker-php-entrypoint".to_owned()]),
        env,
        extra_files: OrderedMap::from_iter([
            ("docker-php-entrypoint", php_entrypoint(variant)),
            ("docker-php-source", EMPTY_SCRIPT.to_owned()),
            ("docker-php-ext-configure", EMPTY_SCRIPT.to_owned()),
            ("docker-php-ext-enable", EMPTY_SCRIPT.to_owned()),
            ("docker-php-ext-install", php_ext_install(php_version)),
        ]),
        custom_end: Some(custom_end),
        ..ImageSpec::language_stack(
            name.clone(),
            format!("{variant} {php_version}"),
            format!("{name}{php_version}-image"),
            os_version,
        )
    }
}

pub(crate) fn images() -> Vec<ImageSpec> {
    [OsVersion::Sp5, OsVersion::Sp6, OsVersion::Tumbleweed]
        .into_iter()
        .flat_map(|os_version| {
            [PhpVariant::Cli, PhpVariant::Apache, PhpVariant::Fpm]
                .into_iter()
                .map(move |variant| php_spec(os_version, variant, 8))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apache_envvars_only_on_sle() {
        let sle = php_spec(OsVersion::Sp6, PhpVariant::Apache, 8);
        let tw = php_spec(OsVersion::Tumbleweed, PhpVariant::Apache, 8);
        assert!(sle.env.get("APACHE_ENVVARS").is_some());
        assert!(tw.env.get("APACHE_ENVVARS").is_none());
        assert_eq!(sle.name, "php-apache");
        assert_eq!(sle.package_name, "php-apache8-image");
    }

    #[test]
    fn entrypoint_prepends_variant_command() {
        assert!(php_entrypoint(PhpVariant::Fpm).contains("set -- php-fpm \"$@\""));
        assert!(php_entrypoint(PhpVariant::Cli).contains("${1#-}"));
    }
}
