use bcigen_core::{DOCKERFILE_RUN, ImageDescriptor};

use crate::context::{RenderContext, indent};

/// Log files removed after the package installation.
const CLEANUP: &str = "zypper -n clean; rm -rf /var/log/{lastlog,tallylog,zypper.log,zypp/history,YaST2}";

/// Generates the Dockerfile of an image built by the OBS docker backend.
pub struct DockerfileGenerator<'a> {
    image: &'a ImageDescriptor,
    ctx: &'a RenderContext,
}

impl<'a> DockerfileGenerator<'a> {
    pub fn new(image: &'a ImageDescriptor, ctx: &'a RenderContext) -> Self {
        Self { image, ctx }
    }

    pub fn render(&self) -> String {
        let image = self.image;
        let mut lines: Vec<String> = vec![
            format!("# SPDX-License-Identifier: {}", image.license()),
            String::new(),
        ];

        if let Some(archs) = image.exclusive_arch() {
            let archs: Vec<String> = archs.iter().map(ToString::to_string).collect();
            lines.push(format!("#!ExclusiveArch: {}", archs.join(" ")));
        }
        lines.push(indent(&self.ctx.info_header(), "# "));
        lines.push(String::new());

        lines.extend(image.build_tags().iter().map(|tag| format!("#!BuildTag: {tag}")));
        if let Some(name) = image.build_name() {
            lines.push(format!("#!BuildName: {name}"));
        }
        if let Some(version) = image.build_version() {
            lines.push(format!("#!BuildVersion: {version}"));
        }
        lines.push(String::new());

        if let Some(from) = image.from_image() {
            lines.push(format!("FROM {from}"));
            lines.push(String::new());
        }
        lines.push(format!("MAINTAINER {}", image.maintainer()));
        lines.push(String::new());

        lines.push(
            "# Define labels according to https://en.opensuse.org/Building_derived_containers"
                .to_owned(),
        );
        lines.push(format!("# labelprefix={}", image.labelprefix()));
        lines.extend(
            labels(image)
                .into_iter()
                .map(|(name, value)| format!("LABEL {name}=\"{}\"", escape_label(&value))),
        );
        lines.push("# endlabelprefix".to_owned());
        lines.extend(
            image
                .extra_labels()
                .iter()
                .map(|(name, value)| format!("LABEL {name}=\"{}\"", escape_label(value))),
        );
        lines.push(String::new());

        let packages: Vec<&str> = image.package_list().iter().map(|p| p.name.as_str()).collect();
        let no_recommends = if image.no_recommends() {
            " --no-recommends"
        } else {
            ""
        };
        lines.push(format!(
            "{DOCKERFILE_RUN} zypper -n in{no_recommends} {}",
            packages.join(" ")
        ));

        if !image.env().is_empty() {
            lines.push(String::new());
            lines.extend(
                image
                    .env()
                    .iter()
                    .map(|(name, value)| {
                        format!("ENV {name}=\"{}\"", escape_label(&value.to_string()))
                    }),
            );
        }

        let mut runtime = Vec::new();
        if let Some(user) = image.entrypoint_user() {
            runtime.push(format!("USER {user}"));
        }
        if let Some(entrypoint) = image.entrypoint() {
            runtime.push(format!("ENTRYPOINT {}", exec_form(entrypoint)));
        }
        if let Some(cmd) = image.cmd() {
            runtime.push(format!("CMD {}", exec_form(cmd)));
        }
        if let Some(ports) = image.exposes_tcp() {
            let ports: Vec<String> = ports.iter().map(ToString::to_string).collect();
            runtime.push(format!("EXPOSE {}", ports.join(" ")));
        }
        if let Some(volumes) = image.volumes() {
            runtime.push(format!("VOLUME {}", volumes.join(" ")));
        }
        if !runtime.is_empty() {
            lines.push(String::new());
            lines.extend(runtime);
        }

        let custom_end = image.dockerfile_custom_end();
        if !custom_end.is_empty() {
            lines.push(String::new());
            lines.push(custom_end.trim_end_matches('\n').to_owned());
        }

        lines.push(String::new());
        lines.push(format!("{DOCKERFILE_RUN} {CLEANUP}"));

        let mut dockerfile = lines.join("\n");
        dockerfile.push('\n');
        dockerfile
    }
}

/// The labels duplicated under the image's label prefix, in emission order.
pub(crate) fn labels(image: &ImageDescriptor) -> Vec<(&'static str, String)> {
    let mut labels = vec![
        ("org.opencontainers.image.title", image.title()),
        ("org.opencontainers.image.description", image.description()),
        ("org.opencontainers.image.version", image.version_label()),
        ("org.opencontainers.image.url", image.url().to_owned()),
        ("org.opencontainers.image.created", "%BUILDTIME%".to_owned()),
        ("org.opencontainers.image.vendor", image.vendor().to_owned()),
        ("org.opencontainers.image.source", "%SOURCEURL%".to_owned()),
        ("org.opensuse.reference", image.reference()),
        ("org.openbuildservice.disturl", "%DISTURL%".to_owned()),
        ("com.suse.supportlevel", image.support_level().to_string()),
    ];
    if let Some(until) = image.supported_until() {
        labels.push(("com.suse.supportlevel.until", until.format("%Y-%m-%d").to_string()));
    }
    labels.extend([
        ("com.suse.eula", image.eula().to_owned()),
        ("com.suse.lifecycle-url", image.lifecycle_url().to_owned()),
        ("com.suse.image-type", image.image_type().to_string()),
        ("com.suse.release-stage", image.release_stage().to_string()),
    ]);
    labels
}

/// `["a", "b"]`, the exec form of `ENTRYPOINT` and `CMD`.
fn exec_form(args: &[String]) -> String {
    let quoted: Vec<String> = args.iter().map(|arg| format!("\"{}\"", escape_label(arg))).collect();
    format!("[{}]", quoted.join(", "))
}

fn escape_label(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
