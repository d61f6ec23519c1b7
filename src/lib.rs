//! cachesync - 事件驱动的缓存同步层
//!
//! 把实时客户端（例如聊天平台网关）发出的实体生命周期事件
//! 镜像到可插拔的键值缓存中，包括用户、频道、成员、服务器和角色。

#![doc(html_root_url = "https://docs.rs/cachesync/0.1.0")]

pub use serde;
pub use serde_json;
pub use tokio;

pub mod cache;
pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod manager;
pub mod sync;
pub mod utils;

// Re-export commonly used items
pub use cache::{Cache, MemoryCache, Predicate};
pub use client::{EventBus, EventEmitter, EventKind, GatewayEvent, Listener};
pub use config::SyncConfig;
pub use entity::{Channel, Guild, Member, Role, Snowflake, User};
pub use error::{Result, SyncError};
pub use manager::{SyncCaches, SyncManager};
pub use sync::{
    ChannelFilter, ChannelSynchronizer, GuildSynchronizer, MemberSynchronizer, RoleSynchronizer,
    Synchronizer, UserSynchronizer,
};

/// cachesync 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
