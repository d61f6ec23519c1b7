//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了同步器的公共功能：监听器注册表、缓存写入和关闭。

use crate::cache::Cache;
use crate::client::{EventEmitter, EventKind, GatewayEvent, Listener};
use crate::error::Result;
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// 同步器持有的监听器注册表
///
/// 记录每一个 `(事件, 监听器)`，退订时使用同一个监听器，
/// 因此不会误删共享同一客户端的其他同步器的监听器。
/// 注册表被丢弃时会退订仍然挂着的监听器。
pub struct Registrations<E>
where
    E: EventEmitter + ?Sized,
{
    client: Arc<E>,
    entries: Vec<(EventKind, Listener)>,
}

impl<E> Registrations<E>
where
    E: EventEmitter + ?Sized,
{
    pub fn new(client: Arc<E>) -> Self {
        Self {
            client,
            entries: Vec::new(),
        }
    }

    pub fn client(&self) -> &Arc<E> {
        &self.client
    }

    /// 向客户端订阅事件并记录
    pub fn attach(&mut self, kind: EventKind, listener: Listener) {
        self.client.on(kind, listener.clone());
        self.entries.push((kind, listener));
    }

    /// 退订所有已记录的监听器
    pub fn detach_all(&mut self) {
        for (kind, listener) in self.entries.drain(..) {
            self.client.off(kind, &listener);
        }
    }

    /// 已订阅的事件
    pub fn kinds(&self) -> Vec<EventKind> {
        self.entries.iter().map(|(kind, _)| *kind).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Drop for Registrations<E>
where
    E: EventEmitter + ?Sized,
{
    fn drop(&mut self) {
        if !self.entries.is_empty() {
            debug!("Registrations: 丢弃时退订{}个监听器", self.entries.len());
            self.detach_all();
        }
    }
}

/// 构造一个持有缓存引用的监听器
pub(crate) fn cache_listener<C, F, Fut>(cache: &Arc<C>, handler: F) -> Listener
where
    C: ?Sized + Send + Sync + 'static,
    F: Fn(Arc<C>, GatewayEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let cache = cache.clone();
    Listener::new(move |event| handler(cache.clone(), event).boxed())
}

/// 按键写入实体，覆盖旧值
pub(crate) async fn store<V, C>(cache: &C, kind: EventKind, key: &str, value: V) -> Result<()>
where
    V: Send + Sync + 'static,
    C: Cache<V> + ?Sized,
{
    debug!("{}: store key={}", kind, key);
    cache.set(key, value).await
}

/// 按键删除实体
pub(crate) async fn remove<V, C>(cache: &C, kind: EventKind, key: &str) -> Result<()>
where
    V: Send + Sync + 'static,
    C: Cache<V> + ?Sized,
{
    debug!("{}: remove key={}", kind, key);
    cache.delete(key).await
}

/// 关闭同步器写入的缓存
///
/// 各同步器的 `close` 在退订完监听器之后最后调用它
pub async fn close_cache<V, C>(cache: &C) -> Result<()>
where
    V: Send + Sync + 'static,
    C: Cache<V> + ?Sized,
{
    debug!("close_cache: 关闭缓存");
    cache.close().await
}

/// 记录收到了不属于该处理函数的事件
pub(crate) fn ignore_unexpected(event: &GatewayEvent) -> Result<()> {
    debug!("忽略意外的事件: {}", event.kind());
    Ok(())
}
