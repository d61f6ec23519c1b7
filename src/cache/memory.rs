//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了基于内存的缓存实现，底层使用Moka。

use super::{Cache, Predicate};
use crate::error::{Result, SyncError};
use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, instrument};

/// 内存缓存实现
///
/// 键不存在时 `get` 返回 `Ok(None)`；关闭后所有操作返回 [`SyncError::Closed`]，
/// 重复关闭不做任何事。`find` 的遍历顺序不确定。
///
/// [`MemoryCache::new`] 创建的缓存不限容量，写入后立即可读。
/// [`MemoryCache::with_capacity`] 创建的缓存在写满后可能淘汰旧条目，
/// 也可能拒绝新条目，此时 `set` 仍返回 `Ok(())`，随后的 `get` 返回 `Ok(None)`。
pub struct MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    cache: MokaCache<String, V>,
    closed: AtomicBool,
}

impl<V> MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// 创建不限容量的内存缓存
    pub fn new() -> Self {
        Self::from_moka(MokaCache::builder().build())
    }

    /// 创建有容量上限的内存缓存
    ///
    /// # 参数
    ///
    /// * `capacity` - 最大条目数，超出后由Moka的准入策略决定淘汰或拒绝
    pub fn with_capacity(capacity: u64) -> Self {
        Self::from_moka(MokaCache::builder().max_capacity(capacity).build())
    }

    fn from_moka(cache: MokaCache<String, V>) -> Self {
        Self {
            cache,
            closed: AtomicBool::new(false),
        }
    }

    /// 当前可读的条目数，已失效的条目不计入
    pub async fn len(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.iter().count() as u64
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(SyncError::Closed);
        }
        Ok(())
    }
}

impl<V> Default for MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> Cache<V> for MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, id: &str) -> Result<Option<V>> {
        self.ensure_open()?;
        let value = self.cache.get(id).await;
        debug!("MemoryCache get: key={}, found={}", id, value.is_some());
        Ok(value)
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set(&self, id: &str, value: V) -> Result<()> {
        self.ensure_open()?;
        self.cache.insert(id.to_string(), value).await;
        // 写入期间缓存被关闭时，撤销这次写入
        if self.is_closed() {
            self.cache.invalidate(id).await;
            return Err(SyncError::Closed);
        }
        debug!("MemoryCache set: key={}", id);
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete(&self, id: &str) -> Result<()> {
        self.ensure_open()?;
        self.cache.remove(id).await;
        debug!("MemoryCache delete: key={}", id);
        Ok(())
    }

    async fn find(&self, predicate: &Predicate<V>) -> Result<Option<V>> {
        self.ensure_open()?;
        Ok(self
            .cache
            .iter()
            .find(|(key, value)| predicate(value, key.as_str()))
            .map(|(_, value)| value))
    }

    #[instrument(skip(self), level = "debug")]
    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            debug!("MemoryCache close: already closed");
            return Ok(());
        }
        self.cache.invalidate_all();
        debug!("MemoryCache close: 缓存已清空并关闭");
        Ok(())
    }
}
