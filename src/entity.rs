//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了网关事件携带的实体模型。
//!
//! 同步层只读取计算缓存键所需的字段（以及频道的 `type`），
//! 其余字段全部保存在 `extra` 中，原样写入缓存。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 平台分配的唯一标识符
pub type Snowflake = String;

/// 用户实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Snowflake,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 频道实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Snowflake,
    /// 频道类型码
    #[serde(rename = "type")]
    pub kind: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 服务器成员实体
///
/// 成员的身份由其用户ID决定，只在所属服务器内唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub user: User,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 服务器（guild）实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guild {
    pub id: Snowflake,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 角色实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: Snowflake,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(id: impl Into<Snowflake>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
    }

    /// 附加一个透传字段
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(field.to_string(), value.into());
        self
    }
}

impl Channel {
    pub fn new(id: impl Into<Snowflake>, kind: u32) -> Self {
        Self {
            id: id.into(),
            kind,
            extra: Map::new(),
        }
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(field.to_string(), value.into());
        self
    }
}

impl Member {
    pub fn new(user: User) -> Self {
        Self {
            user,
            extra: Map::new(),
        }
    }

    /// 成员ID，即其用户ID
    pub fn id(&self) -> &str {
        &self.user.id
    }

    /// 计算成员的复合缓存键 `"<guildId>:<memberId>"`
    pub fn cache_key(guild_id: &str, member: &Member) -> String {
        format!("{}:{}", guild_id, member.id())
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(field.to_string(), value.into());
        self
    }
}

impl Guild {
    pub fn new(id: impl Into<Snowflake>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(field.to_string(), value.into());
        self
    }
}

impl Role {
    pub fn new(id: impl Into<Snowflake>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(field.to_string(), value.into());
        self
    }
}
