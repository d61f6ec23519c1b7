//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了用户同步器。

use super::common::{cache_listener, close_cache, ignore_unexpected, store, Registrations};
use super::Synchronizer;
use crate::cache::Cache;
use crate::client::{EventEmitter, EventKind, GatewayEvent};
use crate::entity::User;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// 用户同步器
///
/// `userUpdate` 事件以用户ID为键写入缓存
pub struct UserSynchronizer<C, E>
where
    C: Cache<User> + ?Sized + 'static,
    E: EventEmitter + ?Sized + 'static,
{
    cache: Arc<C>,
    registrations: Registrations<E>,
}

impl<C, E> UserSynchronizer<C, E>
where
    C: Cache<User> + ?Sized + 'static,
    E: EventEmitter + ?Sized + 'static,
{
    pub fn new(cache: Arc<C>, client: Arc<E>) -> Self {
        let mut registrations = Registrations::new(client);
        registrations.attach(
            EventKind::UserUpdate,
            cache_listener(&cache, on_user_update::<C>),
        );
        info!("UserSynchronizer: 已订阅{}个事件", registrations.len());
        Self {
            cache,
            registrations,
        }
    }

    /// 已订阅的事件
    pub fn events(&self) -> Vec<EventKind> {
        self.registrations.kinds()
    }
}

async fn on_user_update<C>(cache: Arc<C>, event: GatewayEvent) -> Result<()>
where
    C: Cache<User> + ?Sized,
{
    match event {
        GatewayEvent::UserUpdate(user) => {
            let key = user.id.clone();
            store(&*cache, EventKind::UserUpdate, &key, user).await
        }
        other => ignore_unexpected(&other),
    }
}

#[async_trait]
impl<C, E> Synchronizer for UserSynchronizer<C, E>
where
    C: Cache<User> + ?Sized + 'static,
    E: EventEmitter + ?Sized + 'static,
{
    type Entity = User;
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
        info!("UserSynchronizer: 已退订所有事件");
        close_cache::<User, C>(&*self.cache).await
    }
}
