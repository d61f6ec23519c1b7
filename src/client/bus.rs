//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了进程内事件总线，实现 [`EventEmitter`] 并按顺序分发网关事件。

use super::{EventEmitter, EventKind, GatewayEvent, Listener};
use crate::error::Result;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// 进程内事件总线
///
/// 同一事件的监听器按注册顺序依次执行，前一个完成后才执行下一个；
/// 任一监听器返回错误即停止分发该事件，并把错误交给调用方。
#[derive(Default)]
pub struct EventBus {
    listeners: DashMap<EventKind, Vec<Listener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 某个事件上的监听器数量
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map(|l| l.len()).unwrap_or(0)
    }

    /// 所有事件上的监听器总数
    pub fn total_listeners(&self) -> usize {
        self.listeners.iter().map(|entry| entry.value().len()).sum()
    }

    /// 分发一个事件
    ///
    /// # 参数
    ///
    /// * `event` - 网关事件
    ///
    /// # 返回值
    ///
    /// 返回被调用的监听器数量，或第一个失败监听器的错误
    #[instrument(skip(self, event), level = "debug", fields(event = %event.kind()))]
    pub async fn emit(&self, event: GatewayEvent) -> Result<usize> {
        // 先取出快照，避免在 await 期间持有分片锁
        let listeners: Vec<Listener> = self
            .listeners
            .get(&event.kind())
            .map(|l| l.value().clone())
            .unwrap_or_default();

        for listener in &listeners {
            listener.call(event.clone()).await?;
        }
        debug!("EventBus emit: 已调用{}个监听器", listeners.len());
        Ok(listeners.len())
    }

    /// 事件循环：逐个接收并分发事件
    ///
    /// 监听器失败只记录日志，不中断循环。通道关闭或 `shutdown` 被取消时返回。
    ///
    /// # 返回值
    ///
    /// 返回已处理的事件数量
    #[instrument(skip_all, level = "info")]
    pub async fn drive(
        &self,
        mut events: mpsc::Receiver<GatewayEvent>,
        shutdown: CancellationToken,
    ) -> usize {
        let mut processed = 0;
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("EventBus: 收到关闭信号，停止分发");
                    break;
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        info!("EventBus: 事件通道已关闭");
                        break;
                    };
                    let kind = event.kind();
                    if let Err(e) = self.emit(event).await {
                        warn!("EventBus: 处理事件 {} 失败: {}", kind, e);
                    }
                    processed += 1;
                }
            }
        }
        processed
    }
}

impl EventEmitter for EventBus {
    fn on(&self, kind: EventKind, listener: Listener) {
        debug!("EventBus on: event={}, listener={:?}", kind, listener.id());
        self.listeners.entry(kind).or_default().push(listener);
    }

    fn off(&self, kind: EventKind, listener: &Listener) {
        if let Some(mut list) = self.listeners.get_mut(&kind) {
            if let Some(pos) = list.iter().rposition(|l| l == listener) {
                list.remove(pos);
                debug!("EventBus off: event={}, listener={:?}", kind, listener.id());
            }
        }
    }
}
