use bcigen_core::{
    BuildType, Catalog, CatalogFile, Error, ErrorKind, ImageSpec, ImageVariant, OsVersion,
    PackageType,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn builtin_catalog_is_valid() {
    let catalog = Catalog::builtin().unwrap();
    assert!(catalog.len() > 50);
    for (key, image) in catalog.iter() {
        assert_eq!(key, image.catalog_key());
        assert!(!image.build_tags().is_empty(), "{key} has no tags");
    }
}

#[test]
fn builtin_catalog_contains_every_family() {
    let catalog = Catalog::builtin().unwrap();
    for key in [
        "python-3.11-sp6",
        "python-3.11-tumbleweed",
        "golang-1.22-sp5",
        "nodejs-20-tumbleweed",
        "openjdk-devel-21-tumbleweed",
        "php-fpm-8-sp6",
        "rust-1.75-sp6",
        "init-sp5",
        "busybox-tumbleweed",
        "base-basalt",
        "postgres-16-sp6",
        "389-ds-sp5",
        "registry-tumbleweed",
    ] {
        assert!(catalog.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn only_one_latest_per_name_and_os() {
    let catalog = Catalog::builtin().unwrap();
    let mut seen = std::collections::HashSet::new();
    for (key, image) in catalog.iter().filter(|(_, image)| image.is_latest()) {
        assert!(
            seen.insert((image.name().to_owned(), image.os_version())),
            "{key} is a second latest image"
        );
    }
}

#[test]
fn resolve_exact_key() {
    let catalog = Catalog::builtin().unwrap();
    let image = catalog.resolve("golang-1.21-tumbleweed").unwrap();
    assert_eq!(image.name(), "golang");
    assert_eq!(image.version(), Some("1.21"));
}

#[test]
fn resolve_unique_prefix() {
    let catalog = Catalog::builtin().unwrap();
    let image = catalog.resolve("python-3.12").unwrap();
    assert_eq!(image.catalog_key(), "python-3.12-sp6");
}

#[test]
fn resolve_ambiguous_prefix() {
    let catalog = Catalog::builtin().unwrap();
    let err = catalog.resolve("python-3.11").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
    match err {
        Error::AmbiguousImage { candidates, .. } => {
            assert_eq!(
                candidates,
                vec![
                    "python-3.11-sp5",
                    "python-3.11-sp6",
                    "python-3.11-tumbleweed",
                ]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn resolve_unknown_selector() {
    let catalog = Catalog::builtin().unwrap();
    let err = catalog.resolve("cobol-85-sp6").unwrap_err();
    assert!(matches!(err, Error::UnknownImage { .. }));
    assert_eq!(err.kind(), ErrorKind::Lookup);
    assert!(err.to_string().contains("bcigen list"));
}

#[test]
fn duplicate_key_is_rejected() {
    let spec = ImageSpec {
        version: Some("1.0".into()),
        package_list: vec!["demo".into()],
        ..ImageSpec::language_stack("demo", "Demo", "demo-image", OsVersion::Sp6)
    };
    let mut catalog = Catalog::new();
    catalog.add_spec(spec.clone()).unwrap();
    let err = catalog.add_spec(spec).unwrap_err();
    match err {
        Error::DuplicateImage { key } => assert_eq!(key, "demo-1.0-sp6"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn sorted_keys_group_by_os_version() {
    let catalog = Catalog::builtin().unwrap();
    let keys = catalog.sorted_keys();
    assert_eq!(keys.len(), catalog.len());

    let os_versions: Vec<String> = keys
        .iter()
        .map(|key| catalog.get(key).unwrap().os_version().to_string())
        .collect();
    assert!(os_versions.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(os_versions.first().map(String::as_str), Some("5"));
    assert_eq!(os_versions.last().map(String::as_str), Some("Tumbleweed"));

    let basalt = keys.iter().position(|k| *k == "base-basalt").unwrap();
    let first_tumbleweed = os_versions.iter().position(|os| os == "Tumbleweed").unwrap();
    assert!(basalt < first_tumbleweed);
}

// ── Catalog files ──

const ZIG: &str = r#"
[[image]]
kind = "language-stack"
name = "zig"
pretty_name = "Zig 0.13"
package_name = "zig-0.13-image"
os_version = "Tumbleweed"
version = "0.13"
is_latest = true
package_list = ["zig", { name = "lifecycle-data", type = "image" }]
supported_until = "2025-06-30"

[image.env]
ZIG_VERSION = "%%zig_version%%"
PATH = "/usr/local/bin:/usr/bin"
LEVEL = 3

[[image.replacements_via_service]]
regex_in_build_description = "%%zig_version%%"
package_name = "zig"
parse_version = "minor"

[[image]]
kind = "os"
name = "tiny"
pretty_name = "Tiny"
package_name = "tiny-image"
os_version = "6"
no_base_image = true
build_recipe_type = "kiwi"
package_list = [{ name = "bash", type = "bootstrap" }]
config_sh_script = "rm -rf /var/log/*"
"#;

#[test]
fn catalog_file_parses() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("extra.toml");
    std::fs::write(&path, ZIG).unwrap();

    let file = CatalogFile::load(&path).unwrap();
    assert_eq!(file.image.len(), 2);

    let zig = &file.image[0];
    assert_eq!(zig.kind, ImageVariant::LanguageStack);
    assert_eq!(zig.os_version, OsVersion::Tumbleweed);
    let env_keys: Vec<&str> = zig.env.keys().collect();
    assert_eq!(env_keys, vec!["ZIG_VERSION", "PATH", "LEVEL"]);
    assert_eq!(zig.env.get("LEVEL").map(ToString::to_string).as_deref(), Some("3"));
    assert_eq!(zig.replacements_via_service.len(), 1);

    let tiny = &file.image[1];
    assert_eq!(tiny.os_version, OsVersion::Sp6);
    assert_eq!(tiny.build_recipe_type, Some(BuildType::Kiwi));
    assert_eq!(tiny.package_list[0].pkg_type, PackageType::Bootstrap);
}

#[test]
fn catalog_file_extends_builtin() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("extra.toml");
    std::fs::write(&path, ZIG).unwrap();

    let mut catalog = Catalog::builtin().unwrap();
    let before = catalog.len();
    catalog.load_file(&path).unwrap();
    assert_eq!(catalog.len(), before + 2);

    let zig = catalog.resolve("zig").unwrap();
    assert_eq!(zig.catalog_key(), "zig-0.13-tumbleweed");
    assert_eq!(
        zig.reference(),
        "registry.opensuse.org/opensuse/bci/zig:0.13-%RELEASE%"
    );
    assert!(catalog.get("tiny-sp6").is_some());
}

#[test]
fn catalog_file_rejects_unknown_fields() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.toml");
    std::fs::write(
        &path,
        r#"
[[image]]
kind = "os"
name = "x"
pretty_name = "X"
package_name = "x-image"
os_version = "6"
package_list = ["x"]
colour = "blue"
"#,
    )
    .unwrap();

    let err = CatalogFile::load(&path).unwrap_err();
    assert!(matches!(err, Error::CatalogParse { .. }));
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn catalog_file_missing() {
    let tmp = TempDir::new().unwrap();
    let err = CatalogFile::load(&tmp.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::CatalogLoad { .. }));
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn catalog_file_validation_errors_surface() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("empty.toml");
    std::fs::write(
        &path,
        r#"
[[image]]
kind = "language-stack"
name = "empty"
pretty_name = "Empty"
package_name = "empty-image"
os_version = "6"
version = "1"
"#,
    )
    .unwrap();

    let mut catalog = Catalog::new();
    let err = catalog.load_file(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
