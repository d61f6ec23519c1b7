//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了服务器同步器。

use super::common::{
    cache_listener, close_cache, ignore_unexpected, remove, store, Registrations,
};
use super::Synchronizer;
use crate::cache::Cache;
use crate::client::{EventEmitter, EventKind, GatewayEvent};
use crate::entity::Guild;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// 服务器同步器
///
/// `guildCreate`/`guildUpdate` 写入，`guildDelete` 删除，键为服务器ID
pub struct GuildSynchronizer<C, E>
where
    C: Cache<Guild> + ?Sized + 'static,
    E: EventEmitter + ?Sized + 'static,
{
    cache: Arc<C>,
    registrations: Registrations<E>,
}

impl<C, E> GuildSynchronizer<C, E>
where
    C: Cache<Guild> + ?Sized + 'static,
    E: EventEmitter + ?Sized + 'static,
{
    pub fn new(cache: Arc<C>, client: Arc<E>) -> Self {
        let mut registrations = Registrations::new(client);
        for kind in [
            EventKind::GuildCreate,
            EventKind::GuildUpdate,
            EventKind::GuildDelete,
        ] {
            registrations.attach(kind, cache_listener(&cache, on_guild_event::<C>));
        }
        info!("GuildSynchronizer: 已订阅{}个事件", registrations.len());
        Self {
            cache,
            registrations,
        }
    }

    pub fn events(&self) -> Vec<EventKind> {
        self.registrations.kinds()
    }
}

async fn on_guild_event<C>(cache: Arc<C>, event: GatewayEvent) -> Result<()>
where
    C: Cache<Guild> + ?Sized,
{
    let kind = event.kind();
    match event {
        GatewayEvent::GuildCreate(guild) | GatewayEvent::GuildUpdate(guild) => {
            let key = guild.id.clone();
            store(&*cache, kind, &key, guild).await
        }
        GatewayEvent::GuildDelete(guild) => remove::<Guild, C>(&*cache, kind, &guild.id).await,
        other => ignore_unexpected(&other),
    }
}

#[async_trait]
impl<C, E> Synchronizer for GuildSynchronizer<C, E>
where
    C: Cache<Guild> + ?Sized + 'static,
    E: EventEmitter + ?Sized + 'static,
{
    type Entity = Guild;
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
        info!("GuildSynchronizer: 已退订所有事件");
        close_cache::<Guild, C>(&*self.cache).await
    }
}
