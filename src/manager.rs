//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了同步管理器，负责按配置创建并统一关闭同步器。

use crate::cache::Cache;
use crate::client::EventEmitter;
use crate::config::SyncConfig;
use crate::entity::{Channel, Guild, Member, Role, User};
use crate::error::{Result, SyncError};
use crate::sync::{
    ChannelSynchronizer, GuildSynchronizer, MemberSynchronizer, RoleSynchronizer, Synchronizer,
    UserSynchronizer,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 各实体类型对应的缓存
///
/// 配置中启用的同步器必须提供对应的缓存
#[derive(Default, Clone)]
pub struct SyncCaches {
    pub users: Option<Arc<dyn Cache<User>>>,
    pub channels: Option<Arc<dyn Cache<Channel>>>,
    pub members: Option<Arc<dyn Cache<Member>>>,
    pub guilds: Option<Arc<dyn Cache<Guild>>>,
    pub roles: Option<Arc<dyn Cache<Role>>>,
}

/// 同步管理器
pub struct SyncManager<E>
where
    E: EventEmitter + ?Sized + 'static,
{
    user: Option<UserSynchronizer<dyn Cache<User>, E>>,
    channel: Option<ChannelSynchronizer<dyn Cache<Channel>, E>>,
    member: Option<MemberSynchronizer<dyn Cache<Member>, E>>,
    guild: Option<GuildSynchronizer<dyn Cache<Guild>, E>>,
    role: Option<RoleSynchronizer<dyn Cache<Role>, E>>,
}

impl<E> SyncManager<E>
where
    E: EventEmitter + ?Sized + 'static,
{
    /// 按配置创建所有启用的同步器
    ///
    /// 先校验配置和缓存是否齐全，全部通过后才开始订阅，
    /// 因此出错时不会在客户端上留下任何监听器。
    ///
    /// # 参数
    ///
    /// * `config` - 同步层配置
    /// * `caches` - 各实体类型的缓存
    /// * `client` - 实时客户端
    #[instrument(skip_all, level = "info")]
    pub fn start(config: &SyncConfig, caches: SyncCaches, client: Arc<E>) -> Result<Self> {
        config.validate()?;
        let enabled = &config.synchronizers;

        let users = required(enabled.user, caches.users, "user")?;
        let channels = required(enabled.channel, caches.channels, "channel")?;
        let members = required(enabled.member, caches.members, "member")?;
        let guilds = required(enabled.guild, caches.guilds, "guild")?;
        let roles = required(enabled.role, caches.roles, "role")?;

        let manager = Self {
            user: users.map(|cache| UserSynchronizer::new(cache, client.clone())),
            channel: channels.map(|cache| {
                ChannelSynchronizer::with_filter(cache, client.clone(), config.channel.filter())
            }),
            member: members.map(|cache| MemberSynchronizer::new(cache, client.clone())),
            guild: guilds.map(|cache| GuildSynchronizer::new(cache, client.clone())),
            role: roles.map(|cache| RoleSynchronizer::new(cache, client.clone())),
        };
        info!("SyncManager: 已启动同步器 {:?}", manager.running());
        Ok(manager)
    }

    /// 正在运行的同步器名称
    pub fn running(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.user.is_some() {
            names.push("user");
        }
        if self.channel.is_some() {
            names.push("channel");
        }
        if self.member.is_some() {
            names.push("member");
        }
        if self.guild.is_some() {
            names.push("guild");
        }
        if self.role.is_some() {
            names.push("role");
        }
        names
    }

    pub fn user(&self) -> Option<&UserSynchronizer<dyn Cache<User>, E>> {
        self.user.as_ref()
    }

    pub fn channel(&self) -> Option<&ChannelSynchronizer<dyn Cache<Channel>, E>> {
        self.channel.as_ref()
    }

    pub fn member(&self) -> Option<&MemberSynchronizer<dyn Cache<Member>, E>> {
        self.member.as_ref()
    }

    pub fn guild(&self) -> Option<&GuildSynchronizer<dyn Cache<Guild>, E>> {
        self.guild.as_ref()
    }

    pub fn role(&self) -> Option<&RoleSynchronizer<dyn Cache<Role>, E>> {
        self.role.as_ref()
    }

    /// 关闭所有同步器
    ///
    /// 每个同步器都会被关闭，失败会被收集后一并返回
    #[instrument(skip_all, level = "info")]
    pub async fn shutdown(self) -> Result<()> {
        info!("开始关闭所有同步器...");
        let mut errors = Vec::new();

        if let Some(sync) = self.user {
            collect("user", sync.close().await, &mut errors);
        }
        if let Some(sync) = self.channel {
            collect("channel", sync.close().await, &mut errors);
        }
        if let Some(sync) = self.member {
            collect("member", sync.close().await, &mut errors);
        }
        if let Some(sync) = self.guild {
            collect("guild", sync.close().await, &mut errors);
        }
        if let Some(sync) = self.role {
            collect("role", sync.close().await, &mut errors);
        }

        if errors.is_empty() {
            info!("所有同步器已成功关闭");
            Ok(())
        } else {
            Err(SyncError::ShutdownError(format!(
                "部分同步器关闭失败: {}",
                errors.join(", ")
            )))
        }
    }
}

fn required<V>(
    enabled: bool,
    cache: Option<Arc<dyn Cache<V>>>,
    name: &str,
) -> Result<Option<Arc<dyn Cache<V>>>>
where
    V: Send + Sync + 'static,
{
    match (enabled, cache) {
        (true, Some(cache)) => Ok(Some(cache)),
        (true, None) => Err(SyncError::ConfigError(format!("缺少{}同步器的缓存", name))),
        (false, _) => Ok(None),
    }
}

fn collect(name: &str, result: Result<()>, errors: &mut Vec<String>) {
    match result {
        Ok(()) => info!("同步器 {} 已成功关闭", name),
        Err(e) => {
            warn!("关闭同步器 {} 时出错: {}", name, e);
            errors.push(format!("{}: {}", name, e));
        }
    }
}
