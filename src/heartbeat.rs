//! 心跳发布器
//!
//! 把拉模型的发现客户端桥接为推模型的变更通知：按固定间隔拉取当前
//! 服务名列表并无条件推送给监听者。发布器不做差分，「列表是否变化」
//! 由监听者自行判断。未注册监听者时整个 tick 跳过，不产生网关调用。

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use crate::client::DiscoveryClient;
use crate::config::{DEFAULT_HEARTBEAT_FREQUENCY, DiscoveryConfig};

/// 心跳监听者
///
/// 事件边界刻意收窄为一个回调，不假设宿主框架提供事件总线。
pub trait HeartbeatListener: Send + Sync {
    /// 推送当前服务名列表
    fn notify(&self, services: Vec<String>);
}

struct ChannelListener {
    tx: mpsc::Sender<Vec<String>>,
}

impl HeartbeatListener for ChannelListener {
    fn notify(&self, services: Vec<String>) {
        if let Err(e) = self.tx.try_send(services) {
            warn!(error = %e, "Heartbeat channel full or closed, dropping event");
        }
    }
}

/// 创建基于 tokio mpsc 的监听者，接收端以 Stream 形式暴露
pub fn channel_listener(buffer: usize) -> (Arc<dyn HeartbeatListener>, ReceiverStream<Vec<String>>) {
    let (tx, rx) = mpsc::channel(buffer);
    (Arc::new(ChannelListener { tx }), ReceiverStream::new(rx))
}

/// 监听者槽位：发布器与已启动的定时任务共享，注册随时可见
type ListenerSlot = Mutex<Option<Arc<dyn HeartbeatListener>>>;

fn lock_slot(slot: &ListenerSlot) -> MutexGuard<'_, Option<Arc<dyn HeartbeatListener>>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 心跳发布器
pub struct HeartbeatPublisher {
    client: Arc<dyn DiscoveryClient>,
    frequency: Duration,
    listener: Arc<ListenerSlot>,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

/// 单个 tick：有监听者时恰好一次 get_services 调用加一次通知
///
/// get_services 自身 fail-soft，tick 内不存在可向定时任务逃逸的错误。
async fn tick(client: &Arc<dyn DiscoveryClient>, slot: &ListenerSlot) {
    let Some(listener) = lock_slot(slot).clone() else {
        return;
    };
    let services = client.get_services().await;
    debug!(count = services.len(), "Publishing heartbeat");
    listener.notify(services);
}

impl HeartbeatPublisher {
    /// 创建心跳发布器，间隔取配置的 heartbeat_frequency（毫秒）
    pub fn new(client: Arc<dyn DiscoveryClient>, config: &DiscoveryConfig) -> Self {
        // 间隔为 0 会使 tokio interval panic，回退默认值而不是杀死定时任务
        let frequency = if config.heartbeat_frequency == 0 {
            warn!(
                fallback = DEFAULT_HEARTBEAT_FREQUENCY,
                "heartbeat_frequency is 0, using default interval"
            );
            DEFAULT_HEARTBEAT_FREQUENCY
        } else {
            config.heartbeat_frequency
        };
        Self {
            client,
            frequency: Duration::from_millis(frequency),
            listener: Arc::new(Mutex::new(None)),
            shutdown_tx: None,
        }
    }

    /// 注册监听者
    ///
    /// 槽位与定时任务共享，start 之后注册同样生效（下一个 tick 可见）。
    pub fn register_listener(&mut self, listener: Arc<dyn HeartbeatListener>) {
        *lock_slot(&self.listener) = Some(listener);
    }

    /// 手动执行一个 tick（定时驱动之外的显式触发，测试亦经此入口）
    pub async fn poll(&self) {
        tick(&self.client, &self.listener).await;
    }

    /// 启动固定间隔的心跳任务
    ///
    /// 重复调用是 no-op。任务由 shutdown 通道终止。
    pub fn start(&mut self) {
        if self.shutdown_tx.is_some() {
            return;
        }
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        let client = self.client.clone();
        let slot = self.listener.clone();
        let frequency = self.frequency;

        tokio::spawn(async move {
            let mut interval_timer = interval(frequency);
            // 固定延迟语义：错过的 tick 顺延，不补发
            interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        tick(&client, &slot).await;
                    }
                    _ = shutdown_rx.recv() => {
                        info!("Heartbeat task stopped");
                        break;
                    }
                }
            }
        });

        self.shutdown_tx = Some(shutdown_tx);
    }

    /// 停止心跳任务
    ///
    /// 应在宿主关闭前显式调用；未启动或已停止时是 no-op。
    pub async fn shutdown(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(()).await;
        }
    }
}

impl Drop for HeartbeatPublisher {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.try_send(());
        }
    }
}
