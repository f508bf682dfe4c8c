use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::TrackedProduct;
use crate::Result;

/// Durable collection of tracked products, persisted as one human-readable
/// JSON document. Callers read the full set, mutate in memory, and save the
/// full set back; there is no partial update.
pub struct JsonPriceStore {
    path: PathBuf,
}

impl JsonPriceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every tracked product. A missing or corrupt backing file reads as
    /// an empty collection; corruption is logged, never propagated.
    pub async fn load_all(&self) -> Vec<TrackedProduct> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %self.path.display(), "store not readable, treating as empty: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(products) => products,
            Err(e) => {
                warn!(path = %self.path.display(), "store corrupt, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Full replace of the persisted collection. The document is written to a
    /// sibling temp file and renamed into place, so a concurrent reader never
    /// observes a partially-written document.
    pub async fn save_all(&self, products: &[TrackedProduct]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(products)?;
        let tmp = self
            .path
            .with_extension(format!("tmp.{}", Uuid::new_v4().simple()));

        fs::write(&tmp, &json).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), count = products.len(), "store saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn store_in(dir: &tempfile::TempDir) -> JsonPriceStore {
        JsonPriceStore::new(dir.path().join("products.json"))
    }

    fn sample_product(url: &str) -> TrackedProduct {
        let mut product = TrackedProduct::new(url);
        product.record_observation("19.99".parse().unwrap(), Some("Widget"), Utc::now());
        product
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{ not json ]").unwrap();

        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let products = vec![
            sample_product("https://example.com/a"),
            sample_product("https://example.com/b"),
        ];

        store.save_all(&products).await.unwrap();
        let loaded = store.load_all().await;

        assert_eq!(loaded, products);
    }

    #[tokio::test]
    async fn test_save_is_full_replace() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .save_all(&[sample_product("https://example.com/a")])
            .await
            .unwrap();
        let replacement = vec![sample_product("https://example.com/b")];
        store.save_all(&replacement).await.unwrap();

        assert_eq!(store.load_all().await, replacement);
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .save_all(&[sample_product("https://example.com/a")])
            .await
            .unwrap();
        store.save_all(&[]).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPriceStore::new(dir.path().join("nested/data/products.json"));

        store
            .save_all(&[sample_product("https://example.com/a")])
            .await
            .unwrap();

        assert_eq!(store.load_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_save_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save_all(&[]).await.unwrap();

        assert!(store.path().exists());
        assert!(store.load_all().await.is_empty());
    }
}
