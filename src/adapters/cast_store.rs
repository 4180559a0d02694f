use crate::core::{CastStore, CreditedRole, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Cast payloads kept for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryCastStore {
    casts: Mutex<HashMap<String, Vec<CreditedRole>>>,
}

impl MemoryCastStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CastStore for MemoryCastStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<CreditedRole>>> {
        Ok(self.casts.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, cast: &[CreditedRole]) -> Result<()> {
        self.casts.lock().await.insert(key.to_string(), cast.to_vec());
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedCast {
    key: String,
    cast: Vec<CreditedRole>,
}

/// Cast payloads persisted as one JSON file per film under `casts/`.
#[derive(Debug, Clone)]
pub struct FileCastStore<S: Storage> {
    storage: S,
}

impl<S: Storage> FileCastStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn path_for(key: &str) -> String {
        format!("casts/{}.json", slug(key))
    }
}

#[async_trait]
impl<S: Storage> CastStore for FileCastStore<S> {
    async fn load(&self, key: &str) -> Result<Option<Vec<CreditedRole>>> {
        let path = Self::path_for(key);
        if !self.storage.exists(&path).await {
            return Ok(None);
        }

        let data = self.storage.read_file(&path).await?;
        let cached: CachedCast = serde_json::from_slice(&data)?;
        // two titles can share a slug
        if cached.key != key {
            tracing::debug!("Cache file {} belongs to '{}', ignoring", path, cached.key);
            return Ok(None);
        }
        Ok(Some(cached.cast))
    }

    async fn save(&self, key: &str, cast: &[CreditedRole]) -> Result<()> {
        let payload = CachedCast {
            key: key.to_string(),
            cast: cast.to_vec(),
        };
        let data = serde_json::to_vec_pretty(&payload)?;
        self.storage.write_file(&Self::path_for(key), &data).await
    }
}

fn slug(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}
