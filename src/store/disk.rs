use crate::core::cache::Cache;
use anyhow::Result;
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<SystemTime>,
}

/// Persistent cache backed by a fjall partition.
///
/// Every backend error is logged at debug level and degraded to a cache
/// miss; callers re-resolve the value.
pub struct FjallCache<K, V>
where
    K: Eq + Hash + Send + Sync + Serialize + 'static + Debug,
    V: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    partition: PartitionHandle,
    _keyspace: Arc<Keyspace>,
    _marker: PhantomData<(K, V)>,
}

impl<K, V> FjallCache<K, V>
where
    K: Eq + Hash + Send + Sync + Serialize + Debug,
    V: Clone + Send + Sync + Serialize + DeserializeOwned,
{
    pub fn new(db_path: &Path, partition: &str) -> Result<Self> {
        std::fs::create_dir_all(db_path)?;

        let keyspace = Arc::new(fjall::Config::new(db_path.join("fjall_db")).open()?);
        let partition = keyspace.open_partition(partition, PartitionCreateOptions::default())?;
        Ok(Self {
            partition,
            _keyspace: keyspace,
            _marker: PhantomData,
        })
    }
}

#[async_trait]
impl<K, V> Cache<K, V> for FjallCache<K, V>
where
    K: Eq + Hash + Send + Sync + Serialize + 'static + Debug,
    V: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    async fn get(&self, key: &K) -> Option<V> {
        let res: Result<Option<V>> = (|| {
            if let Some(value) = self.partition.get(serde_json::to_vec(key)?)? {
                let entry: CacheEntry<V> = serde_json::from_slice(&value)?;
                if let Some(expires_at) = entry.expires_at {
                    if SystemTime::now() > expires_at {
                        debug!("Cache entry expired for key: {:?}", key);
                        self.partition.remove(serde_json::to_vec(key)?)?;
                        return Ok(None);
                    }
                }
                debug!("Cache HIT for key: {:?}", key);
                return Ok(Some(entry.value));
            }
            debug!("Cache MISS for key: {:?}", key);
            Ok(None)
        })();

        match res {
            Ok(val) => val,
            Err(e) => {
                debug!("FjallCache get error: {}", e);
                None
            }
        }
    }

    async fn put(&self, key: K, value: V, ttl: Option<Duration>) {
        let res: Result<()> = (|| {
            let expires_at = ttl.map(|d| SystemTime::now() + d);
            let entry = CacheEntry { value, expires_at };
            self.partition
                .insert(serde_json::to_vec(&key)?, serde_json::to_vec(&entry)?)?;
            debug!("Cache PUT for key: {:?}", key);
            Ok(())
        })();
        if let Err(e) = res {
            debug!("FjallCache put error: {}", e);
        }
    }

    async fn remove(&self, key: &K) {
        let res: Result<()> = (|| Ok(self.partition.remove(serde_json::to_vec(key)?)?))();
        if let Err(e) = res {
            debug!("FjallCache remove error: {}", e);
        }
    }
}
