//! 内部域名策略发现客户端
//!
//! 只发现携带内部域名路由的应用，地址按实例子域名（`<index>.<route>`）
//! 拼装，端口固定 8080。没有匹配路由的应用视为不可达，不回退公网路由。

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::client::{
    DiscoveryClient, ReactiveDiscoveryClient, instances_via_inventory, lazy_stream,
    services_via_inventory,
};
use crate::classify::RoutePolicy;
use crate::config::DiscoveryConfig;
use crate::instance::ServiceInstance;
use crate::inventory::AppInventory;

const DESCRIPTION: &str = "App service discovery client (internal routes)";

/// 内部域名发现客户端
pub struct AppServiceDiscoveryClient {
    inventory: Arc<dyn AppInventory>,
    config: DiscoveryConfig,
}

impl AppServiceDiscoveryClient {
    /// 创建内部域名发现客户端
    pub fn new(inventory: Arc<dyn AppInventory>, config: DiscoveryConfig) -> Self {
        Self { inventory, config }
    }

    fn policy(&self) -> RoutePolicy {
        RoutePolicy::InternalDomain {
            domain: self.config.internal_domain.clone(),
        }
    }
}

#[async_trait]
impl DiscoveryClient for AppServiceDiscoveryClient {
    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    async fn get_services(&self) -> Vec<String> {
        services_via_inventory(self.inventory.clone()).await
    }

    async fn get_instances(&self, service_id: &str) -> Vec<ServiceInstance> {
        instances_via_inventory(self.inventory.clone(), self.policy(), service_id.to_string())
            .await
    }

    fn order(&self) -> i32 {
        self.config.order
    }
}

impl ReactiveDiscoveryClient for AppServiceDiscoveryClient {
    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn service_stream(&self) -> BoxStream<'static, String> {
        let inventory = self.inventory.clone();
        lazy_stream(move || services_via_inventory(inventory))
    }

    fn instance_stream(&self, service_id: &str) -> BoxStream<'static, ServiceInstance> {
        let inventory = self.inventory.clone();
        let policy = self.policy();
        let service_id = service_id.to_string();
        lazy_stream(move || instances_via_inventory(inventory, policy, service_id))
    }

    fn order(&self) -> i32 {
        self.config.order
    }
}
