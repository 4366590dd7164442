use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::model::LoadedDataset;

/// Identifies one load: the file content and the signed-URL lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    digest: [u8; 32],
    expiry_hours: u32,
}

impl CacheKey {
    pub fn new(bytes: &[u8], expiry_hours: u32) -> Self {
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&Sha256::digest(bytes));
        CacheKey {
            digest,
            expiry_hours,
        }
    }
}

/// Content-addressed memo of loaded datasets. Entries live as long as the
/// cache does.
#[derive(Debug, Default)]
pub struct LoadCache {
    entries: HashMap<CacheKey, Arc<LoadedDataset>>,
}

impl LoadCache {
    pub fn get(&self, key: &CacheKey) -> Option<Arc<LoadedDataset>> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: CacheKey, dataset: LoadedDataset) -> Arc<LoadedDataset> {
        let dataset = Arc::new(dataset);
        self.entries.insert(key, Arc::clone(&dataset));
        dataset
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_depends_on_content_and_expiry() {
        let a = CacheKey::new(b"image_path\na.jpg\n", 12);
        assert_eq!(a, CacheKey::new(b"image_path\na.jpg\n", 12));
        assert_ne!(a, CacheKey::new(b"image_path\nb.jpg\n", 12));
        assert_ne!(a, CacheKey::new(b"image_path\na.jpg\n", 24));
    }

    #[test]
    fn insert_then_get_shares_the_dataset() {
        let mut cache = LoadCache::default();
        let key = CacheKey::new(b"x", 1);
        assert!(cache.get(&key).is_none());

        let stored = cache.insert(key, LoadedDataset::default());
        let hit = cache.get(&key).unwrap();
        assert!(Arc::ptr_eq(&stored, &hit));
        assert_eq!(cache.len(), 1);
    }
}
