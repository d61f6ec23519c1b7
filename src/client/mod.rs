//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了实时客户端边界：事件名、事件载荷以及订阅/退订接口。

pub mod bus;

use crate::entity::{Channel, Guild, Member, Role, User};
use crate::error::{Result, SyncError};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub use bus::EventBus;

/// 网关事件名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    UserUpdate,
    ChannelCreate,
    ChannelUpdate,
    ChannelDelete,
    GuildMemberAdd,
    GuildMemberUpdate,
    GuildMemberChunk,
    GuildMemberRemove,
    GuildCreate,
    GuildUpdate,
    GuildDelete,
    GuildRoleCreate,
    GuildRoleUpdate,
    GuildRoleDelete,
}

impl EventKind {
    pub const ALL: [EventKind; 14] = [
        EventKind::UserUpdate,
        EventKind::ChannelCreate,
        EventKind::ChannelUpdate,
        EventKind::ChannelDelete,
        EventKind::GuildMemberAdd,
        EventKind::GuildMemberUpdate,
        EventKind::GuildMemberChunk,
        EventKind::GuildMemberRemove,
        EventKind::GuildCreate,
        EventKind::GuildUpdate,
        EventKind::GuildDelete,
        EventKind::GuildRoleCreate,
        EventKind::GuildRoleUpdate,
        EventKind::GuildRoleDelete,
    ];

    /// 客户端使用的事件名
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::UserUpdate => "userUpdate",
            EventKind::ChannelCreate => "channelCreate",
            EventKind::ChannelUpdate => "channelUpdate",
            EventKind::ChannelDelete => "channelDelete",
            EventKind::GuildMemberAdd => "guildMemberAdd",
            EventKind::GuildMemberUpdate => "guildMemberUpdate",
            EventKind::GuildMemberChunk => "guildMemberChunk",
            EventKind::GuildMemberRemove => "guildMemberRemove",
            EventKind::GuildCreate => "guildCreate",
            EventKind::GuildUpdate => "guildUpdate",
            EventKind::GuildDelete => "guildDelete",
            EventKind::GuildRoleCreate => "guildRoleCreate",
            EventKind::GuildRoleUpdate => "guildRoleUpdate",
            EventKind::GuildRoleDelete => "guildRoleDelete",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SyncError::Serialization(format!("未知事件名: {}", s)))
    }
}

/// 网关事件及其载荷
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    UserUpdate(User),
    ChannelCreate(Channel),
    ChannelUpdate(Channel),
    ChannelDelete(Channel),
    GuildMemberAdd { guild: Guild, member: Member },
    GuildMemberUpdate { guild: Guild, member: Member },
    GuildMemberChunk { guild: Guild, members: Vec<Member> },
    GuildMemberRemove { guild: Guild, member: Member },
    GuildCreate(Guild),
    GuildUpdate(Guild),
    GuildDelete(Guild),
    GuildRoleCreate { guild: Guild, role: Role },
    GuildRoleUpdate { guild: Guild, role: Role },
    GuildRoleDelete { guild: Guild, role: Role },
}

#[derive(Deserialize)]
struct MemberPayload {
    guild: Guild,
    member: Member,
}

#[derive(Deserialize)]
struct ChunkPayload {
    guild: Guild,
    members: Vec<Member>,
}

#[derive(Deserialize)]
struct RolePayload {
    guild: Guild,
    role: Role,
}

impl GatewayEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GatewayEvent::UserUpdate(_) => EventKind::UserUpdate,
            GatewayEvent::ChannelCreate(_) => EventKind::ChannelCreate,
            GatewayEvent::ChannelUpdate(_) => EventKind::ChannelUpdate,
            GatewayEvent::ChannelDelete(_) => EventKind::ChannelDelete,
            GatewayEvent::GuildMemberAdd { .. } => EventKind::GuildMemberAdd,
            GatewayEvent::GuildMemberUpdate { .. } => EventKind::GuildMemberUpdate,
            GatewayEvent::GuildMemberChunk { .. } => EventKind::GuildMemberChunk,
            GatewayEvent::GuildMemberRemove { .. } => EventKind::GuildMemberRemove,
            GatewayEvent::GuildCreate(_) => EventKind::GuildCreate,
            GatewayEvent::GuildUpdate(_) => EventKind::GuildUpdate,
            GatewayEvent::GuildDelete(_) => EventKind::GuildDelete,
            GatewayEvent::GuildRoleCreate { .. } => EventKind::GuildRoleCreate,
            GatewayEvent::GuildRoleUpdate { .. } => EventKind::GuildRoleUpdate,
            GatewayEvent::GuildRoleDelete { .. } => EventKind::GuildRoleDelete,
        }
    }

    /// 从事件名和JSON数据解码事件
    ///
    /// 单实体事件的数据即实体本身；成员与角色事件的数据形如
    /// `{"guild": {...}, "member": {...}}`、`{"guild": {...}, "members": [...]}`、
    /// `{"guild": {...}, "role": {...}}`。
    ///
    /// # 参数
    ///
    /// * `name` - 事件名，例如 `guildMemberAdd`
    /// * `data` - 事件数据
    pub fn decode(name: &str, data: Value) -> Result<Self> {
        let kind: EventKind = name.parse()?;
        let event = match kind {
            EventKind::UserUpdate => GatewayEvent::UserUpdate(serde_json::from_value(data)?),
            EventKind::ChannelCreate => GatewayEvent::ChannelCreate(serde_json::from_value(data)?),
            EventKind::ChannelUpdate => GatewayEvent::ChannelUpdate(serde_json::from_value(data)?),
            EventKind::ChannelDelete => GatewayEvent::ChannelDelete(serde_json::from_value(data)?),
            EventKind::GuildMemberAdd => {
                let MemberPayload { guild, member } = serde_json::from_value(data)?;
                GatewayEvent::GuildMemberAdd { guild, member }
            }
            EventKind::GuildMemberUpdate => {
                let MemberPayload { guild, member } = serde_json::from_value(data)?;
                GatewayEvent::GuildMemberUpdate { guild, member }
            }
            EventKind::GuildMemberChunk => {
                let ChunkPayload { guild, members } = serde_json::from_value(data)?;
                GatewayEvent::GuildMemberChunk { guild, members }
            }
            EventKind::GuildMemberRemove => {
                let MemberPayload { guild, member } = serde_json::from_value(data)?;
                GatewayEvent::GuildMemberRemove { guild, member }
            }
            EventKind::GuildCreate => GatewayEvent::GuildCreate(serde_json::from_value(data)?),
            EventKind::GuildUpdate => GatewayEvent::GuildUpdate(serde_json::from_value(data)?),
            EventKind::GuildDelete => GatewayEvent::GuildDelete(serde_json::from_value(data)?),
            EventKind::GuildRoleCreate => {
                let RolePayload { guild, role } = serde_json::from_value(data)?;
                GatewayEvent::GuildRoleCreate { guild, role }
            }
            EventKind::GuildRoleUpdate => {
                let RolePayload { guild, role } = serde_json::from_value(data)?;
                GatewayEvent::GuildRoleUpdate { guild, role }
            }
            EventKind::GuildRoleDelete => {
                let RolePayload { guild, role } = serde_json::from_value(data)?;
                GatewayEvent::GuildRoleDelete { guild, role }
            }
        };
        Ok(event)
    }
}

/// 事件处理函数
pub type EventHandler =
    Arc<dyn Fn(GatewayEvent) -> BoxFuture<'static, Result<()>> + Send + Sync>;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// 监听器唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// 已注册到客户端的事件监听器
///
/// 克隆得到的监听器与原值相等；独立创建的两个监听器即使包装同一个闭包也不相等。
/// 退订时客户端按此相等性移除监听器。
#[derive(Clone)]
pub struct Listener {
    id: ListenerId,
    handler: EventHandler,
}

impl Listener {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(GatewayEvent) -> BoxFuture<'static, Result<()>> + Send + Sync + 'static,
    {
        Self {
            id: ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed)),
            handler: Arc::new(handler),
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// 调用处理函数
    pub fn call(&self, event: GatewayEvent) -> BoxFuture<'static, Result<()>> {
        (self.handler)(event)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("id", &self.id).finish()
    }
}

/// 实时客户端的订阅接口
///
/// 退订一个未注册的监听器不是错误，应当静默忽略。
pub trait EventEmitter: Send + Sync {
    /// 订阅事件
    fn on(&self, kind: EventKind, listener: Listener);

    /// 退订事件，按 [`Listener`] 相等性移除
    fn off(&self, kind: EventKind, listener: &Listener);
}
