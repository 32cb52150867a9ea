use std::path::{Path, PathBuf};

use bcigen_core::{BuildType, ImageDescriptor};
use futures::future;

use crate::changelog::render_changelog;
use crate::context::RenderContext;
use crate::dockerfile::DockerfileGenerator;
use crate::kiwi::{KiwiGenerator, render_config_sh};
use crate::service::render_service;

/// Render every file of `image` in memory, without the changelog.
///
/// Returns `(file name, contents)` pairs: the build description, `config.sh`
/// for kiwi builds with a config script, `_service` and the extra files.
pub fn render_files(image: &ImageDescriptor, ctx: &RenderContext) -> Vec<(String, String)> {
    let mut files = Vec::new();

    match image.build_recipe_type() {
        BuildType::Docker => {
            files.push((
                image.build_description_file(),
                DockerfileGenerator::new(image, ctx).render(),
            ));
        }
        BuildType::Kiwi => {
            files.push((
                image.build_description_file(),
                KiwiGenerator::new(image, ctx).render(),
            ));
            if let Some(config_sh) = render_config_sh(image, ctx) {
                files.push(("config.sh".to_owned(), config_sh));
            }
        }
    }

    files.push(("_service".to_owned(), render_service(image)));
    files.extend(
        image
            .extra_files()
            .iter()
            .map(|(name, contents)| (name.to_owned(), contents.clone())),
    );
    files
}

/// Write all files required to build `image` into `dest`.
///
/// The changelog is only written if `dest` does not contain one yet. All
/// files are written concurrently and the first failure is returned without
/// waiting for the remaining writes. Files already on disk are left in place.
///
/// Returns the sorted names (not paths) of the written files.
pub async fn write_files_to_folder(
    image: &ImageDescriptor,
    dest: &Path,
    ctx: &RenderContext,
) -> Result<Vec<String>, WriteError> {
    let mut files = render_files(image, ctx);

    let changes = image.changes_file_name();
    let changes_path = dest.join(&changes);
    let changes_exists = tokio::fs::try_exists(&changes_path)
        .await
        .map_err(|e| WriteError::Probe {
            path: changes_path.clone(),
            source: e,
        })?;
    if changes_exists {
        tracing::warn!(path = %changes_path.display(), "changelog exists, not overwriting");
    } else {
        files.push((changes, render_changelog(image, ctx)));
    }

    let mut names = Vec::with_capacity(files.len());
    let mut handles = Vec::with_capacity(files.len());
    for (name, contents) in files {
        let path = dest.join(&name);
        names.push(name);
        handles.push(tokio::spawn(async move {
            tokio::fs::write(&path, contents)
                .await
                .map_err(|e| WriteError::Write { path, source: e })
        }));
    }

    // Resolves with the first failed write; writes still in flight are not awaited.
    future::try_join_all(handles.into_iter().map(|handle| async move { handle.await? })).await?;

    names.sort();
    tracing::info!(
        image = %image.catalog_key(),
        dest = %dest.display(),
        files = names.len(),
        "build recipe written"
    );
    Ok(names)
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to check for an existing file at {path}")]
    Probe {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("file write task failed")]
    Join(#[from] tokio::task::JoinError),
}
