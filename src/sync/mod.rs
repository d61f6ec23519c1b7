//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存同步器：把网关实体事件镜像到缓存中。

pub mod channel;
pub mod common;
pub mod guild;
pub mod member;
pub mod role;
pub mod user;

use crate::cache::Cache;
use crate::client::EventEmitter;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub use channel::{ChannelFilter, ChannelSynchronizer};
pub use common::{close_cache, Registrations};
pub use guild::GuildSynchronizer;
pub use member::MemberSynchronizer;
pub use role::RoleSynchronizer;
pub use user::UserSynchronizer;

/// 同步器的公共能力
///
/// 同步器在构造时订阅全部事件，没有单独的启动步骤。`close` 先退订
/// 自己注册的监听器，最后再关闭缓存；它消耗 `self`，关闭后无法再使用。
#[async_trait]
pub trait Synchronizer: Send + Sync {
    /// 缓存的实体类型
    type Entity: Send + Sync + 'static;
    /// 写入的缓存
    type Store: Cache<Self::Entity> + ?Sized;
    /// 监听的客户端
    type Emitter: EventEmitter + ?Sized;

    fn cache(&self) -> &Arc<Self::Store>;

    fn client(&self) -> &Arc<Self::Emitter>;

    /// 退订所有监听器并关闭缓存
    async fn close(self) -> Result<()>
    where
        Self: Sized;
}
