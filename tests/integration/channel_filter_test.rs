//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 频道同步器过滤测试

use cachesync::{Cache, ChannelFilter, ChannelSynchronizer, EventBus, GatewayEvent, MemoryCache};
use std::sync::Arc;

#[path = "../common/mod.rs"]
mod common;

/// 测试只允许类型0时，类型1的频道不会写入
#[tokio::test]
async fn test_filter_blocks_unlisted_type() {
    common::setup_logging();

    let bus = Arc::new(EventBus::new());
    let cache = Arc::new(MemoryCache::default());
    let _sync =
        ChannelSynchronizer::with_filter(cache.clone(), bus.clone(), ChannelFilter::only([0]));

    let voice = common::channel("1", 1);
    let text = common::channel("2", 0);
    bus.emit(GatewayEvent::ChannelCreate(voice)).await.unwrap();
    bus.emit(GatewayEvent::ChannelCreate(text.clone()))
        .await
        .unwrap();

    assert_eq!(cache.get("1").await.unwrap(), None);
    assert_eq!(cache.get("2").await.unwrap(), Some(text));
}

/// 测试过滤器对更新事件同样生效
#[tokio::test]
async fn test_filter_applies_to_update() {
    common::setup_logging();

    let bus = Arc::new(EventBus::new());
    let cache = Arc::new(MemoryCache::default());
    let _sync =
        ChannelSynchronizer::with_filter(cache.clone(), bus.clone(), ChannelFilter::only([0, 5]));

    bus.emit(GatewayEvent::ChannelUpdate(common::channel("1", 2)))
        .await
        .unwrap();
    bus.emit(GatewayEvent::ChannelUpdate(common::channel("2", 5)))
        .await
        .unwrap();

    assert_eq!(cache.get("1").await.unwrap(), None);
    assert_eq!(cache.get("2").await.unwrap(), Some(common::channel("2", 5)));
}

/// 测试不匹配的删除事件不会清理已缓存的频道
#[tokio::test]
async fn test_unmatched_delete_is_ignored() {
    common::setup_logging();

    let bus = Arc::new(EventBus::new());
    let cache = Arc::new(MemoryCache::default());
    let _sync =
        ChannelSynchronizer::with_filter(cache.clone(), bus.clone(), ChannelFilter::only([0]));

    let cached = common::channel("1", 0);
    cache.set("1", cached.clone()).await.unwrap();

    // 同一ID但类型不在过滤器中
    bus.emit(GatewayEvent::ChannelDelete(common::channel("1", 4)))
        .await
        .unwrap();
    assert_eq!(cache.get("1").await.unwrap(), Some(cached.clone()));

    bus.emit(GatewayEvent::ChannelDelete(cached)).await.unwrap();
    assert_eq!(cache.get("1").await.unwrap(), None);
}

/// 测试没有过滤器时所有频道都会同步
#[tokio::test]
async fn test_no_filter_applies_unconditionally() {
    common::setup_logging();

    let bus = Arc::new(EventBus::new());
    let cache = Arc::new(MemoryCache::default());
    let sync = ChannelSynchronizer::new(cache.clone(), bus.clone());
    assert!(sync.filter().allowed_types().is_none());

    for (id, kind) in [("1", 0), ("2", 2), ("3", 13)] {
        bus.emit(GatewayEvent::ChannelCreate(common::channel(id, kind)))
            .await
            .unwrap();
    }
    assert_eq!(cache.len().await, 3);

    bus.emit(GatewayEvent::ChannelDelete(common::channel("3", 13)))
        .await
        .unwrap();
    assert_eq!(cache.get("3").await.unwrap(), None);
    assert_eq!(cache.len().await, 2);
}
