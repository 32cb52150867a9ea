//! Core types for bcigen.
//!
//! This crate defines the raw image definitions ([`ImageSpec`]), their
//! validated form ([`ImageDescriptor`]) with tag and label derivation, the
//! per-distribution property bundles ([`ImageProperties`]), the catalog of
//! built-in images ([`Catalog`]), and shared error types.

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod images;
pub mod ordered;
pub mod os;
pub mod package;
pub mod properties;
pub mod spec;
pub mod tags;

pub use catalog::{Catalog, CatalogFile};
pub use descriptor::{BaseImage, DOCKERFILE_RUN, ImageDescriptor, TrailingInstructions};
pub use error::{Error, ErrorKind, Result};
pub use ordered::{OrderedMap, Scalar};
pub use os::{
    ALL_BASE_OS_VERSIONS, ALL_NONBASE_OS_VERSIONS, Arch, CAN_BE_LATEST_OS_VERSION, OsVersion,
    RELEASED_OS_VERSIONS, ReleaseStage,
};
pub use package::{Package, PackageType, ParseVersion, Replacement};
pub use properties::ImageProperties;
pub use spec::{BuildType, ImageSpec, ImageType, ImageVariant, SupportLevel};
pub use tags::{OS_VERSION_PLACEHOLDER, RELEASE_PLACEHOLDER, StabilityTag};
