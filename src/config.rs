//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了同步层的配置结构和解析逻辑。

use crate::error::{Result, SyncError};
use crate::sync::ChannelFilter;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

pub const CONFIG_VERSION: u32 = 1;

/// 同步层配置
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SyncConfig {
    #[serde(default)]
    pub config_version: Option<u32>,
    /// 启用的同步器
    #[serde(default)]
    pub synchronizers: EnabledSynchronizers,
    /// 频道同步器配置
    #[serde(default)]
    pub channel: ChannelSyncConfig,
}

/// 启用的同步器开关，默认全部启用
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EnabledSynchronizers {
    pub user: bool,
    pub channel: bool,
    pub member: bool,
    pub guild: bool,
    pub role: bool,
}

impl Default for EnabledSynchronizers {
    fn default() -> Self {
        Self {
            user: true,
            channel: true,
            member: true,
            guild: true,
            role: true,
        }
    }
}

impl EnabledSynchronizers {
    pub fn any(&self) -> bool {
        self.user || self.channel || self.member || self.guild || self.role
    }
}

/// 频道同步器配置
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ChannelSyncConfig {
    /// 允许同步的频道类型码，缺省表示不过滤
    pub allowed_types: Option<BTreeSet<u32>>,
}

impl ChannelSyncConfig {
    /// 构造不可变的频道过滤器
    pub fn filter(&self) -> ChannelFilter {
        ChannelFilter::from(self.allowed_types.clone())
    }
}

impl SyncConfig {
    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SyncConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// 从TOML文件加载配置
    ///
    /// # 参数
    ///
    /// * `path` - 配置文件路径
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 验证配置
    ///
    /// 检查配置版本、至少启用一个同步器，以及频道类型列表不为空
    pub fn validate(&self) -> Result<()> {
        if let Some(version) = self.config_version {
            if version > CONFIG_VERSION {
                return Err(SyncError::ConfigError(format!(
                    "Configuration version {} is not supported. Current version is {}.",
                    version, CONFIG_VERSION
                )));
            }
        }

        if !self.synchronizers.any() {
            return Err(SyncError::ConfigError(
                "At least one synchronizer must be enabled".to_string(),
            ));
        }

        if let Some(types) = &self.channel.allowed_types {
            if types.is_empty() {
                return Err(SyncError::ConfigError(
                    "channel.allowed_types cannot be empty; omit it to disable filtering"
                        .to_string(),
                ));
            }
        }

        Ok(())
    }
}
