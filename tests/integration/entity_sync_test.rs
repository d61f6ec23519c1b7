//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 实体同步集成测试：事件写入、删除与键的推导

use cachesync::{
    Cache, EventBus, GatewayEvent, GuildSynchronizer, Member, MemberSynchronizer, MemoryCache,
    RoleSynchronizer, UserSynchronizer,
};
use std::sync::Arc;

#[path = "../common/mod.rs"]
mod common;

/// 测试用户更新事件写入缓存
#[tokio::test]
async fn test_user_update_stores_payload() {
    common::setup_logging();

    let bus = Arc::new(EventBus::new());
    let cache = Arc::new(MemoryCache::default());
    let _sync = UserSynchronizer::new(cache.clone(), bus.clone());

    let ferris = common::user("100", "ferris");
    bus.emit(GatewayEvent::UserUpdate(ferris.clone()))
        .await
        .unwrap();
    assert_eq!(cache.get("100").await.unwrap(), Some(ferris));

    // 同一ID的新载荷覆盖旧值
    let renamed = common::user("100", "corro");
    bus.emit(GatewayEvent::UserUpdate(renamed.clone()))
        .await
        .unwrap();
    assert_eq!(cache.get("100").await.unwrap(), Some(renamed));
    assert_eq!(cache.len().await, 1);
}

/// 测试服务器的创建、更新和删除
#[tokio::test]
async fn test_guild_lifecycle_events() {
    common::setup_logging();

    let bus = Arc::new(EventBus::new());
    let cache = Arc::new(MemoryCache::default());
    let _sync = GuildSynchronizer::new(cache.clone(), bus.clone());

    let created = common::guild("g1");
    bus.emit(GatewayEvent::GuildCreate(created.clone()))
        .await
        .unwrap();
    assert_eq!(cache.get("g1").await.unwrap(), Some(created));

    let updated = common::guild("g1").with("region", "eu");
    bus.emit(GatewayEvent::GuildUpdate(updated.clone()))
        .await
        .unwrap();
    assert_eq!(cache.get("g1").await.unwrap(), Some(updated.clone()));

    bus.emit(GatewayEvent::GuildDelete(updated)).await.unwrap();
    assert_eq!(cache.get("g1").await.unwrap(), None);

    // 删除不存在的服务器不报错
    bus.emit(GatewayEvent::GuildDelete(common::guild("missing")))
        .await
        .unwrap();
}

/// 测试角色以角色ID为键，忽略所属服务器
#[tokio::test]
async fn test_role_key_ignores_guild() {
    common::setup_logging();

    let bus = Arc::new(EventBus::new());
    let cache = Arc::new(MemoryCache::default());
    let _sync = RoleSynchronizer::new(cache.clone(), bus.clone());

    let admin = common::role("r1", "admin");
    bus.emit(GatewayEvent::GuildRoleCreate {
        guild: common::guild("g1"),
        role: admin.clone(),
    })
    .await
    .unwrap();
    assert_eq!(cache.get("r1").await.unwrap(), Some(admin));
    assert_eq!(cache.get("g1:r1").await.unwrap(), None);

    // 来自另一个服务器的同ID角色更新覆盖同一个键
    let moderator = common::role("r1", "moderator");
    bus.emit(GatewayEvent::GuildRoleUpdate {
        guild: common::guild("g2"),
        role: moderator.clone(),
    })
    .await
    .unwrap();
    assert_eq!(cache.get("r1").await.unwrap(), Some(moderator.clone()));

    bus.emit(GatewayEvent::GuildRoleDelete {
        guild: common::guild("g1"),
        role: moderator,
    })
    .await
    .unwrap();
    assert_eq!(cache.get("r1").await.unwrap(), None);
}

/// 测试成员使用复合键
#[tokio::test]
async fn test_member_add_uses_composite_key() {
    common::setup_logging();

    let bus = Arc::new(EventBus::new());
    let cache = Arc::new(MemoryCache::default());
    let _sync = MemberSynchronizer::new(cache.clone(), bus.clone());

    let member = common::member("member456", "crab");
    bus.emit(GatewayEvent::GuildMemberAdd {
        guild: common::guild("guild123"),
        member: member.clone(),
    })
    .await
    .unwrap();

    assert_eq!(cache.get("guild123:member456").await.unwrap(), Some(member));
    assert_eq!(cache.get("member456").await.unwrap(), None);
}

/// 测试同一用户在不同服务器中是不同的成员
#[tokio::test]
async fn test_member_is_scoped_by_guild() {
    common::setup_logging();

    let bus = Arc::new(EventBus::new());
    let cache = Arc::new(MemoryCache::default());
    let _sync = MemberSynchronizer::new(cache.clone(), bus.clone());

    for (guild_id, nick) in [("g1", "one"), ("g2", "two")] {
        bus.emit(GatewayEvent::GuildMemberAdd {
            guild: common::guild(guild_id),
            member: common::member("u1", nick),
        })
        .await
        .unwrap();
    }

    bus.emit(GatewayEvent::GuildMemberRemove {
        guild: common::guild("g1"),
        member: common::member("u1", "one"),
    })
    .await
    .unwrap();

    assert_eq!(cache.get("g1:u1").await.unwrap(), None);
    assert_eq!(
        cache.get("g2:u1").await.unwrap(),
        Some(common::member("u1", "two"))
    );
}

/// 测试成员分块事件逐个写入
#[tokio::test]
async fn test_member_chunk_stores_every_member() {
    common::setup_logging();

    let bus = Arc::new(EventBus::new());
    let cache = Arc::new(MemoryCache::default());
    let _sync = MemberSynchronizer::new(cache.clone(), bus.clone());

    let members: Vec<Member> = (0..25)
        .map(|i| common::member(&format!("u{}", i), &format!("nick{}", i)))
        .collect();
    bus.emit(GatewayEvent::GuildMemberChunk {
        guild: common::guild("g1"),
        members: members.clone(),
    })
    .await
    .unwrap();

    assert_eq!(cache.len().await, 25);
    for member in &members {
        let key = Member::cache_key("g1", member);
        assert_eq!(cache.get(&key).await.unwrap().as_ref(), Some(member));
    }
}

/// 测试默认缓存下大分块的成员全部可读
#[tokio::test]
async fn test_large_member_chunk_round_trips() {
    common::setup_logging();

    let bus = Arc::new(EventBus::new());
    let cache = Arc::new(MemoryCache::default());
    let _sync = MemberSynchronizer::new(cache.clone(), bus.clone());

    let members: Vec<Member> = (0..2_000)
        .map(|i| common::member(&format!("u{}", i), "crab"))
        .collect();
    bus.emit(GatewayEvent::GuildMemberChunk {
        guild: common::guild("g1"),
        members: members.clone(),
    })
    .await
    .unwrap();

    for member in &members {
        let key = Member::cache_key("g1", member);
        assert_eq!(cache.get(&key).await.unwrap().as_ref(), Some(member));
    }
    assert_eq!(cache.len().await, 2_000);
}

/// 测试分块中的重复成员以后出现的为准
#[tokio::test]
async fn test_member_chunk_later_duplicate_wins() {
    common::setup_logging();

    let bus = Arc::new(EventBus::new());
    let cache = Arc::new(MemoryCache::default());
    let _sync = MemberSynchronizer::new(cache.clone(), bus.clone());

    bus.emit(GatewayEvent::GuildMemberChunk {
        guild: common::guild("g1"),
        members: vec![common::member("u1", "first"), common::member("u1", "second")],
    })
    .await
    .unwrap();

    assert_eq!(cache.len().await, 1);
    assert_eq!(
        cache.get("g1:u1").await.unwrap(),
        Some(common::member("u1", "second"))
    );
}

/// 测试成员更新与删除
#[tokio::test]
async fn test_member_update_and_remove() {
    common::setup_logging();

    let bus = Arc::new(EventBus::new());
    let cache = Arc::new(MemoryCache::default());
    let _sync = MemberSynchronizer::new(cache.clone(), bus.clone());

    let updated = common::member("u1", "renamed");
    bus.emit(GatewayEvent::GuildMemberUpdate {
        guild: common::guild("g1"),
        member: updated.clone(),
    })
    .await
    .unwrap();
    assert_eq!(cache.get("g1:u1").await.unwrap(), Some(updated.clone()));

    bus.emit(GatewayEvent::GuildMemberRemove {
        guild: common::guild("g1"),
        member: updated.clone(),
    })
    .await
    .unwrap();
    assert_eq!(cache.get("g1:u1").await.unwrap(), None);

    // 再次删除是空操作
    bus.emit(GatewayEvent::GuildMemberRemove {
        guild: common::guild("g1"),
        member: updated,
    })
    .await
    .unwrap();
}

/// 测试从网关JSON解码后写入的载荷保持原样
#[tokio::test]
async fn test_decoded_payload_is_stored_verbatim() {
    common::setup_logging();

    let bus = Arc::new(EventBus::new());
    let cache = Arc::new(MemoryCache::default());
    let _sync = UserSynchronizer::new(cache.clone(), bus.clone());

    let data = serde_json::json!({
        "id": "7",
        "username": "ferris",
        "flags": 64,
        "avatar": null
    });
    let event = GatewayEvent::decode("userUpdate", data.clone()).unwrap();
    bus.emit(event).await.unwrap();

    let stored = cache.get("7").await.unwrap().unwrap();
    assert_eq!(serde_json::to_value(&stored).unwrap(), data);
}
