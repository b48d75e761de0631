use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::error::{RenderError, Result};
use crate::icons::IconSet;

/// Lazily loaded canvas icons shared by all requests.
///
/// The first caller triggers the load on the blocking pool; callers arriving
/// while it runs wait for it. When a load fails, that caller gets the error
/// and the next queued caller runs the load itself, so waiters retry one at a
/// time.
#[derive(Debug)]
pub struct IconCache {
    dir: Option<PathBuf>,
    cell: OnceCell<Arc<IconSet>>,
}

impl IconCache {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            cell: OnceCell::new(),
        }
    }

    pub fn preloaded(icons: IconSet) -> Self {
        Self {
            dir: None,
            cell: OnceCell::new_with(Some(Arc::new(icons))),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    pub async fn get(&self) -> Result<Arc<IconSet>> {
        let icons = self
            .cell
            .get_or_try_init(|| async {
                let Some(dir) = self.dir.clone() else {
                    return Ok(Arc::new(IconSet::empty()));
                };
                if !dir.is_dir() {
                    tracing::info!(dir = %dir.display(), "no icon directory, drawing vector icons");
                    return Ok(Arc::new(IconSet::empty()));
                }
                let icons = tokio::task::spawn_blocking(move || IconSet::load_dir(&dir))
                    .await
                    .map_err(|err| RenderError::Join(err.to_string()))??;
                Ok::<_, RenderError>(Arc::new(icons))
            })
            .await?;
        Ok(Arc::clone(icons))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_icon(dir: &std::path::Path, name: &str) {
        let pixmap = resvg::tiny_skia::Pixmap::new(2, 2).unwrap();
        std::fs::write(dir.join(name), pixmap.encode_png().unwrap()).unwrap();
    }

    #[tokio::test]
    async fn missing_directory_yields_empty_set() {
        let cache = IconCache::new(Some(PathBuf::from("/nonexistent/icons")));
        let icons = cache.get().await.unwrap();
        assert!(icons.is_empty());
        assert!(cache.is_loaded());
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_load() {
        let dir = tempfile::tempdir().unwrap();
        write_icon(dir.path(), "partners.png");
        let cache = Arc::new(IconCache::new(Some(dir.path().to_path_buf())));

        let a = tokio::spawn({
            let cache = Arc::clone(&cache);
            async move { cache.get().await.unwrap() }
        });
        let b = tokio::spawn({
            let cache = Arc::clone(&cache);
            async move { cache.get().await.unwrap() }
        });
        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 1);
    }

    #[tokio::test]
    async fn preloaded_cache_skips_the_directory() {
        let cache = IconCache::preloaded(IconSet::empty());
        assert!(cache.is_loaded());
        assert!(cache.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_load_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("costs.png"), b"garbage").unwrap();
        let cache = IconCache::new(Some(dir.path().to_path_buf()));
        assert!(cache.get().await.is_err());
        assert!(!cache.is_loaded());

        write_icon(dir.path(), "costs.png");
        let icons = cache.get().await.unwrap();
        assert_eq!(icons.len(), 1);
    }
}
