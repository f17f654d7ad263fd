//! 心跳发布器集成测试
//!
//! 验证监听者门控（未注册时零网关调用）、每 tick 恰好一次拉取、
//! 无条件推送与定时任务的启动/停止。

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{MockInventory, billing_app};
use flare_cloud_discovery::{
    DiscoveryConfig, DiscoveryFactory, HeartbeatListener, HeartbeatPublisher,
    NativeDiscoveryClient, channel_listener,
};
use futures::StreamExt;

/// 记录全部推送事件的监听者
struct RecordingListener {
    events: Mutex<Vec<Vec<String>>>,
}

impl RecordingListener {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    fn events(&self) -> Vec<Vec<String>> {
        self.events.lock().expect("lock poisoned").clone()
    }
}

impl HeartbeatListener for RecordingListener {
    fn notify(&self, services: Vec<String>) {
        self.events.lock().expect("lock poisoned").push(services);
    }
}

fn publisher_over(inventory: Arc<MockInventory>) -> HeartbeatPublisher {
    let config = DiscoveryConfig::default();
    let client = Arc::new(NativeDiscoveryClient::new(inventory, config.clone()));
    HeartbeatPublisher::new(client, &config)
}

/// 测试：未注册监听者时 tick 完全跳过，不产生任何网关调用
#[tokio::test]
async fn test_no_listener_means_no_gateway_calls() {
    let inventory = MockInventory::new(vec![billing_app()]);
    let publisher = publisher_over(inventory.clone());

    for _ in 0..5 {
        publisher.poll().await;
    }

    assert_eq!(inventory.total_calls(), 0);
}

/// 测试：注册监听者后每 tick 恰好一次 get_services 调用、一次推送
#[tokio::test]
async fn test_one_fetch_and_event_per_tick() {
    let inventory = MockInventory::new(vec![billing_app()]);
    let mut publisher = publisher_over(inventory.clone());
    let listener = RecordingListener::new();
    publisher.register_listener(listener.clone());

    for _ in 0..3 {
        publisher.poll().await;
    }

    assert_eq!(inventory.total_calls(), 3);
    let events = listener.events();
    assert_eq!(events.len(), 3);
    // 不做差分：目录未变化时依旧逐 tick 推送
    for event in &events {
        assert_eq!(event, &vec!["billing".to_string()]);
    }
}

/// 测试：网关持续失败时推送空目录，tick 不中断
#[tokio::test]
async fn test_failing_gateway_publishes_empty_catalog() {
    let inventory = MockInventory::failing();
    let mut publisher = publisher_over(inventory);
    let listener = RecordingListener::new();
    publisher.register_listener(listener.clone());

    publisher.poll().await;
    publisher.poll().await;

    let events = listener.events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.is_empty()));
}

/// 测试：channel 监听者把事件暴露为 Stream
#[tokio::test]
async fn test_channel_listener_delivers_events() {
    let inventory = MockInventory::new(vec![billing_app()]);
    let mut publisher = publisher_over(inventory);
    let (listener, mut events) = channel_listener(8);
    publisher.register_listener(listener);

    publisher.poll().await;

    let event = events.next().await.expect("expected a heartbeat event");
    assert_eq!(event, vec!["billing".to_string()]);
}

/// 测试：定时任务按间隔持续推送，shutdown 后停止
#[tokio::test]
async fn test_start_and_shutdown() {
    let inventory = MockInventory::new(vec![billing_app()]);
    let config = DiscoveryConfig {
        heartbeat_frequency: 20,
        ..DiscoveryConfig::default()
    };
    let mut publisher =
        DiscoveryFactory::create_publisher(&config, inventory.clone()).expect("publisher");
    let listener = RecordingListener::new();
    publisher.register_listener(listener.clone());

    publisher.start();
    tokio::time::sleep(Duration::from_millis(110)).await;
    publisher.shutdown().await;
    // 留出在途 tick 收尾的时间再取基准
    tokio::time::sleep(Duration::from_millis(30)).await;

    let published = listener.events().len();
    assert!(published >= 2, "expected periodic heartbeats, got {}", published);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(listener.events().len(), published, "no events after shutdown");
}

/// 测试：heartbeat_frequency 为 0 时回退默认间隔，定时任务不崩溃
#[tokio::test]
async fn test_zero_frequency_falls_back_to_default() {
    let inventory = MockInventory::new(vec![billing_app()]);
    let config = DiscoveryConfig {
        heartbeat_frequency: 0,
        ..DiscoveryConfig::default()
    };
    let mut publisher =
        DiscoveryFactory::create_publisher(&config, inventory.clone()).expect("publisher");
    let listener = RecordingListener::new();
    publisher.register_listener(listener.clone());

    publisher.start();
    // 首个 tick 立即触发，任务存活即可观察到至少一次推送
    tokio::time::sleep(Duration::from_millis(50)).await;
    publisher.shutdown().await;

    assert!(
        !listener.events().is_empty(),
        "heartbeat task should survive a zero frequency"
    );
}

/// 测试：start 之后注册的监听者从下一个 tick 起生效
#[tokio::test]
async fn test_register_listener_after_start() {
    let inventory = MockInventory::new(vec![billing_app()]);
    let config = DiscoveryConfig {
        heartbeat_frequency: 20,
        ..DiscoveryConfig::default()
    };
    let mut publisher =
        DiscoveryFactory::create_publisher(&config, inventory.clone()).expect("publisher");

    publisher.start();
    tokio::time::sleep(Duration::from_millis(50)).await;
    // 未注册期间 tick 全部跳过
    assert_eq!(inventory.total_calls(), 0);

    let listener = RecordingListener::new();
    publisher.register_listener(listener.clone());
    tokio::time::sleep(Duration::from_millis(90)).await;
    publisher.shutdown().await;

    let events = listener.events();
    assert!(!events.is_empty(), "late-registered listener should receive heartbeats");
    assert!(events.iter().all(|e| e == &vec!["billing".to_string()]));
}
