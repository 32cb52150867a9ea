use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Which step of an invocation an [`Error`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An image definition violates a descriptor invariant.
    Validation,
    /// A selector could not be resolved to exactly one catalog entry.
    Lookup,
    /// A catalog file could not be read or parsed.
    Config,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── Descriptor validation ──
    #[error("no packages were added to {image}")]
    EmptyPackageList { image: String },

    #[error("{image}: cannot specify both a custom_end and a config.sh script, use just config_sh_script")]
    CustomEndWithConfigScript { image: String },

    #[error("{image}: a language stack container requires a version")]
    MissingVersion { image: String },

    #[error("{image}: unknown stability tag {tag:?}, expected one of: stable, oldstable")]
    UnknownStabilityTag { image: String, tag: String },

    #[error("{image}: the `local` architecture must not appear in exclusive_arch")]
    LocalArchitecture { image: String },

    #[error("{image}: cannot add package {package} of type {pkg_type} into a Dockerfile based build")]
    PackageTypeInDockerfile {
        image: String,
        package: String,
        pkg_type: String,
    },

    #[error("{image}: cannot be built as a kiwi image, it has a custom_end set")]
    CustomEndInKiwiBuild { image: String },

    #[error("{image}: from_image {from_image:?} conflicts with no_base_image = true")]
    ConflictingBaseImage { image: String, from_image: String },

    #[error("{image}: extra file {file:?} must be a plain file name inside the destination")]
    ExtraFileOutsideDestination { image: String, file: String },

    #[error("{image}: extra file {file:?} would replace a generated file")]
    ExtraFileNameCollision { image: String, file: String },

    #[error("invalid OS version {value:?}, expected 3, 4, 5, 6, Tumbleweed or Basalt")]
    InvalidOsVersion { value: String },

    // ── Catalog lookup ──
    #[error("unknown image {selector:?}; run `bcigen list` to see all images")]
    UnknownImage { selector: String },

    #[error("image selector {selector:?} is ambiguous, candidates: {}", candidates.join(", "))]
    AmbiguousImage {
        selector: String,
        candidates: Vec<String>,
    },

    #[error("image key {key:?} is defined more than once")]
    DuplicateImage { key: String },

    // ── Catalog files ──
    #[error("failed to read catalog file {path}")]
    CatalogLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse catalog file at {path}")]
    CatalogParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyPackageList { .. }
            | Error::CustomEndWithConfigScript { .. }
            | Error::MissingVersion { .. }
            | Error::UnknownStabilityTag { .. }
            | Error::LocalArchitecture { .. }
            | Error::PackageTypeInDockerfile { .. }
            | Error::CustomEndInKiwiBuild { .. }
            | Error::ConflictingBaseImage { .. }
            | Error::ExtraFileOutsideDestination { .. }
            | Error::ExtraFileNameCollision { .. }
            | Error::InvalidOsVersion { .. } => ErrorKind::Validation,
            Error::UnknownImage { .. }
            | Error::AmbiguousImage { .. }
            | Error::DuplicateImage { .. } => ErrorKind::Lookup,
            Error::CatalogLoad { .. } | Error::CatalogParse { .. } => ErrorKind::Config,
        }
    }
}
