//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了同步器写入的缓存契约。

pub mod memory;

use crate::error::Result;
use async_trait::async_trait;

pub use memory::MemoryCache;

/// `find` 使用的谓词，参数为值和键
pub type Predicate<V> = dyn for<'a> Fn(&'a V, &'a str) -> bool + Send + Sync;

/// 缓存契约
///
/// 键固定为字符串，值类型由实现方决定。同步器只会调用
/// `set`、`delete` 和 `close`；`get` 与 `find` 提供给外部调用方。
#[async_trait]
pub trait Cache<V>: Send + Sync
where
    V: Send + Sync + 'static,
{
    /// 获取缓存值
    ///
    /// # 参数
    ///
    /// * `id` - 缓存键
    ///
    /// # 返回值
    ///
    /// 键不存在时返回 `Ok(None)`
    async fn get(&self, id: &str) -> Result<Option<V>>;

    /// 写入缓存值，覆盖同键的旧值
    async fn set(&self, id: &str, value: V) -> Result<()>;

    /// 删除缓存项，键不存在时不做任何事
    async fn delete(&self, id: &str) -> Result<()>;

    /// 返回第一个满足 `predicate(value, id)` 的值
    ///
    /// 遍历顺序由实现决定
    async fn find(&self, predicate: &Predicate<V>) -> Result<Option<V>>;

    /// 释放缓存持有的资源
    async fn close(&self) -> Result<()>;
}
