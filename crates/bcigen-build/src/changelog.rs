use bcigen_core::{ImageDescriptor, ImageVariant};

use crate::context::RenderContext;

const CHANGELOG_AUTHOR: &str = "SUSE Update Bot <bci-internal@suse.de>";
const SEPARATOR: &str = "-------------------------------------------------------------------";

/// Name of the image as it appears in the initial changelog entry.
///
/// Pretty names containing a `%%macro%%` fall back to the capitalized name.
/// Stack images append their version unless it is already part of the name
/// or excluded from the uid.
pub fn changelog_name(image: &ImageDescriptor) -> String {
    let mut name = if image.pretty_name().contains('%') {
        capitalize(image.name())
    } else {
        image.pretty_name().to_owned()
    };

    if image.variant() != ImageVariant::Os && image.version_in_uid() {
        if let Some(version) = image.version() {
            if !name.contains(version) {
                name.push(' ');
                name.push_str(version);
            }
        }
    }
    name
}

/// The initial `{package_name}.changes` entry.
pub fn render_changelog(image: &ImageDescriptor, ctx: &RenderContext) -> String {
    format!(
        "{SEPARATOR}\n{date} - {CHANGELOG_AUTHOR}\n\n- First version of the {name} BCI\n",
        date = ctx.timestamp.format("%a %b %d %H:%M:%S UTC %Y"),
        name = changelog_name(image),
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
