//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了同步层的错误类型和处理机制。

use thiserror::Error;

/// 同步层错误类型枚举
///
/// 缓存操作失败会原样穿过同步器的事件处理函数，交给事件分发方处理
#[derive(Error, Debug)]
pub enum SyncError {
    /// 缓存后端操作失败
    #[error("Cache operation failed: {0}")]
    Cache(String),

    /// 缓存已关闭
    #[error("Cache is closed")]
    Closed,

    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// TOML解析错误
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO错误
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// 关闭错误
    #[error("Shutdown error: {0}")]
    ShutdownError(String),
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Serialization(e.to_string())
    }
}

/// 同步层操作结果类型别名
pub type Result<T> = std::result::Result<T, SyncError>;
