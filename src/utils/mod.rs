//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 工具模块，提供测试和应用共用的日志初始化。

use std::sync::Once;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// 初始化全局日志订阅者
///
/// 优先使用 `RUST_LOG` 环境变量，未设置时使用 `debug` 级别。多次调用只生效一次。
pub fn setup_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt()
            .with_span_events(FmtSpan::CLOSE)
            .with_env_filter(filter)
            .try_init()
            .ok();
    });
}
