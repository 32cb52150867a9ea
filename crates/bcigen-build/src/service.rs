use bcigen_core::ImageDescriptor;

use crate::kiwi::xml_escape;

/// Renders the OBS `_service` file: the label helpers and one
/// `replace_using_package_version` run per replacement, all at build time.
pub fn render_service(image: &ImageDescriptor) -> String {
    let file = image.build_description_file();
    let mut lines = vec![
        "<services>".to_owned(),
        r#"  <service mode="buildtime" name="kiwi_metainfo_helper"/>"#.to_owned(),
        r#"  <service mode="buildtime" name="docker_label_helper"/>"#.to_owned(),
    ];

    for replacement in image.replacements() {
        lines.push(r#"  <service name="replace_using_package_version" mode="buildtime">"#.to_owned());
        lines.push(format!(r#"    <param name="file">{}</param>"#, xml_escape(&file)));
        lines.push(format!(
            r#"    <param name="regex">{}</param>"#,
            xml_escape(&replacement.regex_in_build_description)
        ));
        lines.push(format!(
            r#"    <param name="package">{}</param>"#,
            xml_escape(&replacement.package_name)
        ));
        if let Some(parse_version) = replacement.parse_version {
            lines.push(format!(
                r#"    <param name="parse-version">{parse_version}</param>"#
            ));
        }
        lines.push("  </service>".to_owned());
    }

    lines.push("</services>".to_owned());
    let mut service = lines.join("\n");
    service.push('\n');
    service
}
