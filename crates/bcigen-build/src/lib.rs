//! Build recipe generation for bcigen.
//!
//! # Write pipeline
//!
//! ```text
//! bcigen write <IMAGE> <DESTINATION>
//!   1. Resolve      ── Catalog::resolve() → ImageDescriptor
//!   2. Render       ── DockerfileGenerator / KiwiGenerator, _service, config.sh
//!   3. Changelog    ── {package_name}.changes, only if absent in DESTINATION
//!   4. Write        ── one tokio task per file, fail fast on the first error
//! ```
//!
//! # Build description
//!
//! Exactly one build description is emitted, selected by the image's
//! `build_recipe_type`:
//! - **docker**: `Dockerfile`, with a trailing `RUN` for the config script
//! - **kiwi**: `{package_name}.kiwi`, plus `config.sh` when a config script is set
//!
//! Every renderer takes a [`RenderContext`] so that identical inputs produce
//! identical bytes.

pub mod changelog;
pub mod context;
pub mod dockerfile;
pub mod kiwi;
pub mod service;
pub mod writer;

pub use context::RenderContext;
pub use dockerfile::DockerfileGenerator;
pub use kiwi::KiwiGenerator;
pub use writer::{WriteError, write_files_to_folder};
