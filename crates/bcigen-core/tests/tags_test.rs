use bcigen_core::{ImageDescriptor, ImageSpec, OsVersion};
use pretty_assertions::assert_eq;

fn demo(is_latest: bool) -> ImageSpec {
    ImageSpec {
        version: Some("3.9".into()),
        is_latest,
        package_list: vec!["demo".into()],
        ..ImageSpec::language_stack("demo", "Demo 3.9", "demo-image", OsVersion::Sp5)
    }
}

#[test]
fn language_stack_tag_order() {
    let image = ImageDescriptor::new(demo(true)).unwrap();
    assert_eq!(
        image.build_tags(),
        vec!["bci/demo:3.9", "bci/demo:3.9-%RELEASE%", "bci/demo:latest"]
    );
    assert_eq!(image.reference(), "registry.suse.com/bci/demo:3.9-%RELEASE%");
}

#[test]
fn os_image_tags() {
    let image = ImageDescriptor::new(ImageSpec {
        package_list: vec!["systemd".into()],
        ..ImageSpec::os("init", "Init", "init-image", OsVersion::Sp6)
    })
    .unwrap();
    assert_eq!(
        image.build_tags(),
        vec![
            "bci/bci-init:%OS_VERSION_ID_SP%",
            "bci/bci-init:%OS_VERSION_ID_SP%.%RELEASE%",
        ]
    );
    assert_eq!(
        image.reference(),
        "registry.suse.com/bci/bci-init:%OS_VERSION_ID_SP%.%RELEASE%"
    );
    assert_eq!(image.build_name().as_deref(), Some("bci-bci-init-%OS_VERSION_ID_SP%"));
}

#[test]
fn aliases_follow_primary_name() {
    let image = ImageDescriptor::new(ImageSpec {
        additional_names: vec!["node".to_owned()],
        additional_versions: vec!["20.1".to_owned()],
        is_latest: true,
        version: Some(20u32.into()),
        package_list: vec!["nodejs20".into()],
        ..ImageSpec::language_stack("nodejs", "Node.js 20", "nodejs-20-image", OsVersion::Tumbleweed)
    })
    .unwrap();

    assert_eq!(
        image.build_tags(),
        vec![
            "opensuse/bci/nodejs:20",
            "opensuse/bci/nodejs:20-%RELEASE%",
            "opensuse/bci/nodejs:20.1",
            "opensuse/bci/nodejs:20.1-%RELEASE%",
            "opensuse/bci/nodejs:latest",
            "opensuse/bci/node:20",
            "opensuse/bci/node:20-%RELEASE%",
            "opensuse/bci/node:20.1",
            "opensuse/bci/node:20.1-%RELEASE%",
            "opensuse/bci/node:latest",
        ]
    );
    assert_eq!(
        image.reference(),
        "registry.opensuse.org/opensuse/bci/nodejs:20-%RELEASE%"
    );
    assert_eq!(
        image.kiwi_additional_tags().as_deref(),
        Some("20-%RELEASE%,20.1,20.1-%RELEASE%,latest")
    );
}

#[test]
fn colliding_aliases_are_not_deduplicated() {
    let image = ImageDescriptor::new(ImageSpec {
        additional_names: vec!["demo".to_owned()],
        ..demo(false)
    })
    .unwrap();
    assert_eq!(
        image.build_tags(),
        vec![
            "bci/demo:3.9",
            "bci/demo:3.9-%RELEASE%",
            "bci/demo:3.9",
            "bci/demo:3.9-%RELEASE%",
        ]
    );
}

#[test]
fn application_images_use_application_prefix() {
    let image = ImageDescriptor::new(ImageSpec {
        version: Some(16u32.into()),
        package_list: vec!["postgresql16-server".into()],
        ..ImageSpec::application_stack("postgres", "PostgreSQL 16", "postgres-16-image", OsVersion::Sp6)
    })
    .unwrap();
    assert_eq!(image.build_tags()[0], "suse/postgres:16");
    assert_eq!(image.reference(), "registry.suse.com/suse/postgres:16-%RELEASE%");
}

#[test]
fn stability_channels_never_share_release_numbers() {
    let tagged = |tag: &str| {
        ImageDescriptor::new(ImageSpec {
            stability_tag: Some(tag.to_owned()),
            ..demo(false)
        })
        .unwrap()
    };
    let stable = tagged("stable");
    let oldstable = tagged("oldstable");

    assert_eq!(stable.reference(), "registry.suse.com/bci/demo:3.9-1.%RELEASE%");
    assert_eq!(oldstable.reference(), "registry.suse.com/bci/demo:3.9-2.%RELEASE%");
    assert_eq!(stable.build_tags()[0], "bci/demo:stable");
    assert_eq!(oldstable.build_tags()[0], "bci/demo:oldstable");
}

#[test]
fn derivation_is_repeatable() {
    let a = ImageDescriptor::new(demo(true)).unwrap();
    let b = ImageDescriptor::new(demo(true)).unwrap();
    assert_eq!(a.build_tags(), b.build_tags());
    assert_eq!(a.reference(), b.reference());
    assert_eq!(a.build_tags(), a.build_tags());
}
