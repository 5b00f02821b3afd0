//! Recursive file counting through the contents API

use tracing::trace;

use super::repository::RepositoryId;
use crate::error::ProviderError;
use crate::providers::gateway::{ContentKind, Gateway};

/// Number of files under `path` (the repository root when `None`).
///
/// Directories are walked depth-first; symlinks and submodules are not
/// counted.
pub async fn count_files(
    gateway: &dyn Gateway,
    repo: &RepositoryId,
    path: Option<&str>,
) -> Result<u64, ProviderError> {
    let mut pending = vec![path.map(str::to_string)];
    let mut count = 0;

    while let Some(dir) = pending.pop() {
        let entries = gateway.contents(repo, dir.as_deref()).await?;
        trace!(path = dir.as_deref().unwrap_or("/"), entries = entries.len(), "Listed");

        for entry in entries {
            match entry.kind {
                ContentKind::File => count += 1,
                ContentKind::Dir => pending.push(Some(entry.path)),
                ContentKind::Symlink | ContentKind::Submodule | ContentKind::Other => {}
            }
        }
    }

    Ok(count)
}
