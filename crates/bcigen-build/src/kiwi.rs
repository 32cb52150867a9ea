use bcigen_core::{ImageDescriptor, PackageType};

use crate::context::{RenderContext, indent};
use crate::dockerfile::labels;

/// Generates the kiwi build description (`{package_name}.kiwi`).
pub struct KiwiGenerator<'a> {
    image: &'a ImageDescriptor,
    ctx: &'a RenderContext,
}

impl<'a> KiwiGenerator<'a> {
    pub fn new(image: &'a ImageDescriptor, ctx: &'a RenderContext) -> Self {
        Self { image, ctx }
    }

    pub fn render(&self) -> String {
        let image = self.image;
        let maintainer = xml_escape(image.maintainer());

        let mut lines: Vec<String> = vec![
            r#"<?xml version="1.0" encoding="utf-8"?>"#.to_owned(),
            format!("<!-- SPDX-License-Identifier: {} -->", image.license()),
            String::new(),
            "<!--".to_owned(),
            indent(&self.ctx.info_header(), "  "),
            "-->".to_owned(),
        ];
        if let Some(archs) = image.exclusive_arch() {
            let archs: Vec<String> = archs.iter().map(ToString::to_string).collect();
            lines.push(format!("<!-- OBS-ExclusiveArch: {} -->", archs.join(" ")));
        }

        let derived_from = image
            .from_image()
            .map(|from| {
                format!(
                    r#" derived_from="obsrepositories:/{}""#,
                    xml_escape(&from.replace(':', "#"))
                )
            })
            .unwrap_or_default();
        lines.push(format!(
            r#"<image schemaversion="7.4" name="{}-image" xmlns:suse_label_helper="com.suse.label_helper"{derived_from}>"#,
            xml_escape(&image.uid())
        ));
        lines.extend([
            r#"  <description type="system">"#.to_owned(),
            format!("    <author>{maintainer}</author>"),
            format!("    <contact>{}</contact>", xml_escape(image.url())),
            format!("    <specification>{}</specification>", xml_escape(&image.title())),
            "  </description>".to_owned(),
            "  <preferences>".to_owned(),
            r#"    <type image="docker">"#.to_owned(),
            "      <containerconfig".to_owned(),
        ]);

        let tags = image.build_tags();
        if let Some((name, tag)) = tags.first().and_then(|t| t.split_once(':')) {
            lines.push(format!(r#"          name="{}""#, xml_escape(name)));
            lines.push(format!(r#"          tag="{}""#, xml_escape(tag)));
        }
        lines.push(format!(r#"          maintainer="{maintainer}""#));
        if let Some(additional) = image.kiwi_additional_tags() {
            lines.push(format!(r#"          additionaltags="{}""#, xml_escape(&additional)));
        }
        lines.push("      >".to_owned());

        lines.push("        <labels>".to_owned());
        lines.push(format!(
            r#"          <suse_label_helper:add_prefix prefix="{}">"#,
            xml_escape(&image.labelprefix())
        ));
        lines.extend(labels(image).into_iter().map(|(name, value)| {
            format!(
                r#"            <label name="{name}" value="{}"/>"#,
                xml_escape(&value)
            )
        }));
        lines.push("          </suse_label_helper:add_prefix>".to_owned());
        lines.extend(image.extra_labels().iter().map(|(name, value)| {
            format!(
                r#"          <label name="{}" value="{}"/>"#,
                xml_escape(name),
                xml_escape(value)
            )
        }));
        lines.push("        </labels>".to_owned());

        if let Some(entrypoint) = image.entrypoint() {
            lines.extend(command_element("entrypoint", entrypoint));
        }
        if let Some(cmd) = image.cmd() {
            lines.extend(command_element("subcommand", cmd));
        }
        if let Some(volumes) = image.volumes() {
            lines.push("        <volumes>".to_owned());
            lines.extend(
                volumes
                    .iter()
                    .map(|v| format!(r#"          <volume name="{}"/>"#, xml_escape(v))),
            );
            lines.push("        </volumes>".to_owned());
        }
        if let Some(ports) = image.exposes_tcp() {
            lines.push("        <expose>".to_owned());
            lines.extend(
                ports
                    .iter()
                    .map(|p| format!(r#"          <port number="{p}"/>"#)),
            );
            lines.push("        </expose>".to_owned());
        }
        if !image.env().is_empty() {
            lines.push("        <environment>".to_owned());
            lines.extend(image.env().iter().map(|(name, value)| {
                format!(
                    r#"          <env name="{}" value="{}"/>"#,
                    xml_escape(name),
                    xml_escape(&value.to_string())
                )
            }));
            lines.push("        </environment>".to_owned());
        }

        lines.extend([
            "      </containerconfig>".to_owned(),
            "    </type>".to_owned(),
            format!("    <version>{}</version>", image.kiwi_version(self.ctx.year())),
            "    <packagemanager>zypper</packagemanager>".to_owned(),
            "    <rpm-check-signatures>false</rpm-check-signatures>".to_owned(),
            "    <rpm-excludedocs>true</rpm-excludedocs>".to_owned(),
            "  </preferences>".to_owned(),
            r#"  <repository type="rpm-md">"#.to_owned(),
            r#"    <source path="obsrepositories:/"/>"#.to_owned(),
            "  </repository>".to_owned(),
        ]);

        for pkg_type in PackageType::KIWI_ORDER {
            let packages: Vec<&str> = image
                .package_list()
                .iter()
                .filter(|p| p.pkg_type == pkg_type)
                .map(|p| p.name.as_str())
                .collect();
            if packages.is_empty() {
                continue;
            }
            lines.push(format!(r#"  <packages type="{pkg_type}">"#));
            lines.extend(
                packages
                    .iter()
                    .map(|name| format!(r#"    <package name="{}"/>"#, xml_escape(name))),
            );
            lines.push("  </packages>".to_owned());
        }
        lines.push("</image>".to_owned());

        let mut description = lines.join("\n");
        description.push('\n');
        description
    }
}

/// The `config.sh` run by kiwi after the package installation, `None` if
/// the image has no config script.
pub fn render_config_sh(image: &ImageDescriptor, ctx: &RenderContext) -> Option<String> {
    let script = image.config_sh_script()?;
    Some(format!(
        r#"#!{interpreter}
# SPDX-License-Identifier: MIT
# SPDX-FileCopyrightText: (c) 2022-{year} SUSE LLC

set -euo pipefail

test -f /.kconfig && . /.kconfig
test -f /.profile && . /.profile

echo "Configure image: [$kiwi_iname]..."

#============================================
# Import repositories' keys if rpm is present
#--------------------------------------------
if command -v rpm > /dev/null; then
    suseImportBuildKey
fi

{script}

#=======================================
# Clean up after zypper if it is present
#---------------------------------------
if command -v zypper > /dev/null; then
    zypper -n clean
fi

rm -rf /var/log/zypp

exit 0
"#,
        interpreter = image.config_sh_interpreter(),
        year = ctx.year(),
    ))
}

/// `<entrypoint execute="..."/>` or the element with `<argument>` children.
fn command_element(element: &str, args: &[String]) -> Vec<String> {
    match args {
        [] => Vec::new(),
        [exe] => vec![format!(
            r#"        <{element} execute="{}"/>"#,
            xml_escape(exe)
        )],
        [exe, rest @ ..] => {
            let mut lines = vec![format!(
                r#"        <{element} execute="{}">"#,
                xml_escape(exe)
            )];
            lines.extend(
                rest.iter()
                    .map(|arg| format!(r#"          <argument name="{}"/>"#, xml_escape(arg))),
            );
            lines.push(format!("        </{element}>"));
            lines
        }
    }
}

/// Escape the XML special characters of text and attribute values.
pub fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
