//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了频道同步器及其频道类型过滤器。

use super::common::{
    cache_listener, close_cache, ignore_unexpected, remove, store, Registrations,
};
use super::Synchronizer;
use crate::cache::Cache;
use crate::client::{EventEmitter, EventKind, GatewayEvent};
use crate::entity::Channel;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// 频道类型过滤器
///
/// 构造后不可变。未设置允许的类型时所有频道事件都会生效；
/// 设置后只有 `type` 在集合中的频道事件才会写入或删除缓存。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelFilter {
    allowed_types: Option<BTreeSet<u32>>,
}

impl ChannelFilter {
    /// 不过滤任何频道
    pub fn any() -> Self {
        Self::default()
    }

    /// 只接受给定的频道类型
    pub fn only(types: impl IntoIterator<Item = u32>) -> Self {
        Self {
            allowed_types: Some(types.into_iter().collect()),
        }
    }

    pub fn allowed_types(&self) -> Option<&BTreeSet<u32>> {
        self.allowed_types.as_ref()
    }

    pub fn matches(&self, channel_type: u32) -> bool {
        match &self.allowed_types {
            Some(types) => types.contains(&channel_type),
            None => true,
        }
    }
}

impl From<Option<BTreeSet<u32>>> for ChannelFilter {
    fn from(allowed_types: Option<BTreeSet<u32>>) -> Self {
        Self { allowed_types }
    }
}

/// 频道同步器
///
/// `channelCreate`/`channelUpdate` 写入，`channelDelete` 删除，键为频道ID。
/// 过滤器对三个事件分别生效，不匹配的事件既不写入也不删除。
pub struct ChannelSynchronizer<C, E>
where
    C: Cache<Channel> + ?Sized + 'static,
    E: EventEmitter + ?Sized + 'static,
{
    cache: Arc<C>,
    filter: Arc<ChannelFilter>,
    registrations: Registrations<E>,
}

impl<C, E> ChannelSynchronizer<C, E>
where
    C: Cache<Channel> + ?Sized + 'static,
    E: EventEmitter + ?Sized + 'static,
{
    /// 创建不带过滤器的频道同步器
    pub fn new(cache: Arc<C>, client: Arc<E>) -> Self {
        Self::with_filter(cache, client, ChannelFilter::any())
    }

    /// 创建频道同步器
    ///
    /// # 参数
    ///
    /// * `cache` - 频道缓存
    /// * `client` - 实时客户端
    /// * `filter` - 频道类型过滤器，生命周期内不再改变
    pub fn with_filter(cache: Arc<C>, client: Arc<E>, filter: ChannelFilter) -> Self {
        let filter = Arc::new(filter);
        let mut registrations = Registrations::new(client);

        for kind in [
            EventKind::ChannelCreate,
            EventKind::ChannelUpdate,
            EventKind::ChannelDelete,
        ] {
            let filter = filter.clone();
            registrations.attach(
                kind,
                cache_listener(&cache, move |cache, event| {
                    on_channel_event(cache, filter.clone(), event)
                }),
            );
        }
        info!(
            "ChannelSynchronizer: 已订阅{}个事件, filter={:?}",
            registrations.len(),
            filter.allowed_types()
        );

        Self {
            cache,
            filter,
            registrations,
        }
    }

    pub fn filter(&self) -> &ChannelFilter {
        &self.filter
    }

    pub fn events(&self) -> Vec<EventKind> {
        self.registrations.kinds()
    }
}

async fn on_channel_event<C>(
    cache: Arc<C>,
    filter: Arc<ChannelFilter>,
    event: GatewayEvent,
) -> Result<()>
where
    C: Cache<Channel> + ?Sized,
{
    let kind = event.kind();
    match event {
        GatewayEvent::ChannelCreate(channel) | GatewayEvent::ChannelUpdate(channel) => {
            if !filter.matches(channel.kind) {
                debug!("{}: 忽略类型为{}的频道 {}", kind, channel.kind, channel.id);
                return Ok(());
            }
            let key = channel.id.clone();
            store(&*cache, kind, &key, channel).await
        }
        GatewayEvent::ChannelDelete(channel) => {
            if !filter.matches(channel.kind) {
                debug!("{}: 忽略类型为{}的频道 {}", kind, channel.kind, channel.id);
                return Ok(());
            }
            remove::<Channel, C>(&*cache, kind, &channel.id).await
        }
        other => ignore_unexpected(&other),
    }
}

#[async_trait]
impl<C, E> Synchronizer for ChannelSynchronizer<C, E>
where
    C: Cache<Channel> + ?Sized + 'static,
    E: EventEmitter + ?Sized + 'static,
{
    type Entity = Channel;
    type Store = C;
    type Emitter = E;

    fn cache(&self) -> &Arc<C> {
        &self.cache
    }

    fn client(&self) -> &Arc<E> {
        self.registrations.client()
    }

    async fn close(mut self) -> Result<()> {
        self.registrations.detach_all();
        info!("ChannelSynchronizer: 已退订所有事件");
        close_cache::<Channel, C>(&*self.cache).await
    }
}
