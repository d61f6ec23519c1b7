//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了服务器成员同步器。成员只在所属服务器内唯一，
//! 缓存键为 `"<guildId>:<memberId>"`。

use super::common::{
    cache_listener, close_cache, ignore_unexpected, remove, store, Registrations,
};
use super::Synchronizer;
use crate::cache::Cache;
use crate::client::{EventEmitter, EventKind, GatewayEvent};
use crate::entity::Member;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

pub struct MemberSynchronizer<C, E>
where
    C: Cache<Member> + ?Sized + 'static,
    E: EventEmitter + ?Sized + 'static,
{
    cache: Arc<C>,
    registrations: Registrations<E>,
}

impl<C, E> MemberSynchronizer<C, E>
where
    C: Cache<Member> + ?Sized + 'static,
    E: EventEmitter + ?Sized + 'static,
{
    pub fn new(cache: Arc<C>, client: Arc<E>) -> Self {
        let mut registrations = Registrations::new(client);
        for kind in [
            EventKind::GuildMemberAdd,
            EventKind::GuildMemberUpdate,
            EventKind::GuildMemberChunk,
            EventKind::GuildMemberRemove,
        ] {
            registrations.attach(kind, cache_listener(&cache, on_member_event::<C>));
        }
        info!("MemberSynchronizer: 已订阅{}个事件", registrations.len());
        Self {
            cache,
            registrations,
        }
    }

    pub fn events(&self) -> Vec<EventKind> {
        self.registrations.kinds()
    }
}

async fn on_member_event<C>(cache: Arc<C>, event: GatewayEvent) -> Result<()>
where
    C: Cache<Member> + ?Sized,
{
    let kind = event.kind();
    match event {
        GatewayEvent::GuildMemberAdd { guild, member }
        | GatewayEvent::GuildMemberUpdate { guild, member } => {
            let key = Member::cache_key(&guild.id, &member);
            store(&*cache, kind, &key, member).await
        }
        GatewayEvent::GuildMemberChunk { guild, members } => {
            debug!("{}: guild={}, 成员数={}", kind, guild.id, members.len());
            // 按事件给出的顺序逐个写入
            for member in members {
                let key = Member::cache_key(&guild.id, &member);
                store(&*cache, kind, &key, member).await?;
            }
            Ok(())
        }
        GatewayEvent::GuildMemberRemove { guild, member } => {
            let key = Member::cache_key(&guild.id, &member);
            remove::<Member, C>(&*cache, kind, &key).await
        }
        other => ignore_unexpected(&other),
    }
}

#[async_trait]
impl<C, E> Synchronizer for MemberSynchronizer<C, E>
where
    C: Cache<Member> + ?Sized + 'static,
    E: EventEmitter + ?Sized + 'static,
{
    type Entity = Member;
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
        info!("MemberSynchronizer: 已退订所有事件");
        close_cache::<Member, C>(&*self.cache).await
    }
}
