//! 集成测试共享夹具
//!
//! 内存版库存网关（带调用计数，用于心跳门控断言）与标准应用快照。

// 每个集成测试 crate 各自编译本模块，只用到其中一部分夹具
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use flare_cloud_discovery::{
    AppInventory, ApplicationSummary, DiscoveryError, InstanceDetail, Result,
};

/// 内存版库存网关
pub struct MockInventory {
    apps: Vec<ApplicationSummary>,
    fail: bool,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl MockInventory {
    pub fn new(apps: Vec<ApplicationSummary>) -> Arc<Self> {
        Arc::new(Self {
            apps,
            fail: false,
            list_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
        })
    }

    /// 所有调用都失败的网关（模拟平台 API 超时）
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            apps: Vec::new(),
            fail: true,
            list_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
        })
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst) + self.get_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AppInventory for MockInventory {
    async fn list_applications(&self) -> Result<Vec<ApplicationSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DiscoveryError::gateway("inventory API timeout"));
        }
        Ok(self.apps.clone())
    }

    async fn get_application(&self, name: &str) -> Result<ApplicationSummary> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DiscoveryError::gateway("inventory API timeout"));
        }
        self.apps
            .iter()
            .find(|app| app.name == name)
            .cloned()
            .ok_or_else(|| DiscoveryError::application_not_found(name))
    }
}

/// billing 应用：3 个 RUNNING 实例，公网路由 + 内部路由
pub fn billing_app() -> ApplicationSummary {
    ApplicationSummary::new("billing-id", "billing")
        .with_url("billing.apps.example.com")
        .with_url("billing.apps.internal")
        .with_instance(InstanceDetail::new("0", "RUNNING"))
        .with_instance(InstanceDetail::new("1", "RUNNING"))
        .with_instance(InstanceDetail::new("2", "RUNNING"))
}

/// billing 应用：只有公网路由
pub fn public_only_billing_app() -> ApplicationSummary {
    ApplicationSummary::new("billing-id", "billing")
        .with_url("billing.apps.example.com")
        .with_instance(InstanceDetail::new("0", "RUNNING"))
        .with_instance(InstanceDetail::new("1", "RUNNING"))
        .with_instance(InstanceDetail::new("2", "RUNNING"))
}
