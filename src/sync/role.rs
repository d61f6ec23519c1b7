//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了角色同步器。

use super::common::{
    cache_listener, close_cache, ignore_unexpected, remove, store, Registrations,
};
use super::Synchronizer;
use crate::cache::Cache;
use crate::client::{EventEmitter, EventKind, GatewayEvent};
use crate::entity::Role;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// 角色同步器
///
/// 角色事件携带所属服务器，但缓存键只使用角色ID
pub struct RoleSynchronizer<C, E>
where
    C: Cache<Role> + ?Sized + 'static,
    E: EventEmitter + ?Sized + 'static,
{
    cache: Arc<C>,
    registrations: Registrations<E>,
}

impl<C, E> RoleSynchronizer<C, E>
where
    C: Cache<Role> + ?Sized + 'static,
    E: EventEmitter + ?Sized + 'static,
{
    pub fn new(cache: Arc<C>, client: Arc<E>) -> Self {
        let mut registrations = Registrations::new(client);
        for kind in [
            EventKind::GuildRoleCreate,
            EventKind::GuildRoleUpdate,
            EventKind::GuildRoleDelete,
        ] {
            registrations.attach(kind, cache_listener(&cache, on_role_event::<C>));
        }
        info!("RoleSynchronizer: 已订阅{}个事件", registrations.len());
        Self {
            cache,
            registrations,
        }
    }

    pub fn events(&self) -> Vec<EventKind> {
        self.registrations.kinds()
    }
}

async fn on_role_event<C>(cache: Arc<C>, event: GatewayEvent) -> Result<()>
where
    C: Cache<Role> + ?Sized,
{
    let kind = event.kind();
    match event {
        GatewayEvent::GuildRoleCreate { role, .. } | GatewayEvent::GuildRoleUpdate { role, .. } => {
            let key = role.id.clone();
            store(&*cache, kind, &key, role).await
        }
        GatewayEvent::GuildRoleDelete { role, .. } => {
            remove::<Role, C>(&*cache, kind, &role.id).await
        }
        other => ignore_unexpected(&other),
    }
}

#[async_trait]
impl<C, E> Synchronizer for RoleSynchronizer<C, E>
where
    C: Cache<Role> + ?Sized + 'static,
    E: EventEmitter + ?Sized + 'static,
{
    type Entity = Role;
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
        info!("RoleSynchronizer: 已退订所有事件");
        close_cache::<Role, C>(&*self.cache).await
    }
}
