use bcigen_build::{RenderContext, WriteError, write_files_to_folder};
use bcigen_core::{BuildType, Catalog, Error, ImageDescriptor, ImageSpec, OsVersion, Package};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn ctx() -> RenderContext {
    RenderContext::new(Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap())
}

fn docker_image() -> ImageDescriptor {
    ImageDescriptor::new(ImageSpec {
        version: Some("1.0".into()),
        package_list: vec!["demo".into()],
        extra_files: [("_constraints", "<constraints/>\n".to_owned())]
            .into_iter()
            .collect(),
        ..ImageSpec::language_stack("demo", "Demo", "demo-image", OsVersion::Sp6)
    })
    .unwrap()
}

fn kiwi_image(config_sh_script: Option<&str>) -> ImageDescriptor {
    ImageDescriptor::new(ImageSpec {
        no_base_image: true,
        build_recipe_type: Some(BuildType::Kiwi),
        package_list: vec![Package::bootstrap("bash")],
        config_sh_script: config_sh_script.map(str::to_owned),
        ..ImageSpec::os("tiny", "Tiny", "tiny-image", OsVersion::Sp6)
    })
    .unwrap()
}

#[tokio::test]
async fn writes_docker_build_files() {
    let tmp = TempDir::new().unwrap();
    let files = write_files_to_folder(&docker_image(), tmp.path(), &ctx())
        .await
        .unwrap();

    assert_eq!(
        files,
        vec!["Dockerfile", "_constraints", "_service", "demo-image.changes"]
    );
    for file in &files {
        assert!(tmp.path().join(file).is_file(), "{file} missing");
    }
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("_constraints")).unwrap(),
        "<constraints/>\n"
    );
}

#[tokio::test]
async fn writes_config_sh_only_for_kiwi_with_script() {
    let tmp = TempDir::new().unwrap();
    let files = write_files_to_folder(&kiwi_image(Some("rm -rf /usr/share/doc")), tmp.path(), &ctx())
        .await
        .unwrap();
    assert_eq!(
        files,
        vec!["_service", "config.sh", "tiny-image.changes", "tiny-image.kiwi"]
    );

    let tmp = TempDir::new().unwrap();
    let files = write_files_to_folder(&kiwi_image(None), tmp.path(), &ctx())
        .await
        .unwrap();
    assert_eq!(files, vec!["_service", "tiny-image.changes", "tiny-image.kiwi"]);
    assert!(!tmp.path().join("config.sh").exists());
}

#[tokio::test]
async fn extra_file_cannot_replace_existing_changelog() {
    let tmp = TempDir::new().unwrap();
    let changes = tmp.path().join("demo-image.changes");
    std::fs::write(&changes, "KEEP ME\n").unwrap();

    let err = ImageDescriptor::new(ImageSpec {
        version: Some("1.0".into()),
        package_list: vec!["demo".into()],
        extra_files: [("demo-image.changes", "CLOBBERED\n".to_owned())]
            .into_iter()
            .collect(),
        ..ImageSpec::language_stack("demo", "Demo", "demo-image", OsVersion::Sp6)
    })
    .unwrap_err();
    assert!(matches!(err, Error::ExtraFileNameCollision { .. }));

    write_files_to_folder(&docker_image(), tmp.path(), &ctx())
        .await
        .unwrap();
    assert_eq!(std::fs::read_to_string(changes).unwrap(), "KEEP ME\n");
}

#[tokio::test]
async fn extra_file_cannot_escape_destination() {
    let tmp = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    let escaped = outside.path().join("escaped.txt");

    let err = ImageDescriptor::new(ImageSpec {
        version: Some("1.0".into()),
        package_list: vec!["demo".into()],
        extra_files: [(escaped.display().to_string(), "x".to_owned())]
            .into_iter()
            .collect(),
        ..ImageSpec::language_stack("demo", "Demo", "demo-image", OsVersion::Sp6)
    })
    .unwrap_err();
    assert!(matches!(err, Error::ExtraFileOutsideDestination { .. }));
    assert!(!escaped.exists());
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn existing_changelog_is_kept() {
    let tmp = TempDir::new().unwrap();
    let changes = tmp.path().join("demo-image.changes");
    std::fs::write(&changes, "hand written history\n").unwrap();

    let files = write_files_to_folder(&docker_image(), tmp.path(), &ctx())
        .await
        .unwrap();

    assert!(!files.contains(&"demo-image.changes".to_owned()));
    assert_eq!(
        std::fs::read_to_string(&changes).unwrap(),
        "hand written history\n"
    );
}

#[tokio::test]
async fn repeated_writes_are_idempotent() {
    let tmp = TempDir::new().unwrap();
    let image = docker_image();
    write_files_to_folder(&image, tmp.path(), &ctx()).await.unwrap();
    let first = std::fs::read_to_string(tmp.path().join("Dockerfile")).unwrap();
    let changes = std::fs::read_to_string(tmp.path().join("demo-image.changes")).unwrap();

    let later = RenderContext::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    let files = write_files_to_folder(&image, tmp.path(), &later).await.unwrap();

    assert_eq!(files, vec!["Dockerfile", "_constraints", "_service"]);
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("demo-image.changes")).unwrap(),
        changes
    );
    assert_ne!(
        std::fs::read_to_string(tmp.path().join("Dockerfile")).unwrap(),
        first,
        "the copyright year follows the render context"
    );
}

#[tokio::test]
async fn missing_destination_fails() {
    let tmp = TempDir::new().unwrap();
    let dest = tmp.path().join("does-not-exist");

    let err = write_files_to_folder(&docker_image(), &dest, &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, WriteError::Write { .. }));
}

#[tokio::test]
async fn every_builtin_image_writes() {
    let catalog = Catalog::builtin().unwrap();
    for (key, image) in catalog.iter() {
        let tmp = TempDir::new().unwrap();
        let files = write_files_to_folder(image, tmp.path(), &ctx())
            .await
            .unwrap();
        assert!(files.contains(&image.build_description_file()), "{key}");
        assert!(files.contains(&"_service".to_owned()), "{key}");
    }
}
