//! 公网路由策略发现客户端
//!
//! 以应用的第一条路由作为实例地址，不区分域名归属。

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

const DESCRIPTION: &str = "Cloud platform native discovery client";

/// 公网路由发现客户端
///
/// 无内部状态，每次调用都重新查询网关。
pub struct NativeDiscoveryClient {
    inventory: Arc<dyn AppInventory>,
    config: DiscoveryConfig,
    resolved_port: Option<u16>,
}

impl NativeDiscoveryClient {
    /// 创建公网路由发现客户端
    pub fn new(inventory: Arc<dyn AppInventory>, config: DiscoveryConfig) -> Self {
        Self {
            inventory,
            config,
            resolved_port: None,
        }
    }

    /// 指定由调用方负载均衡配置解析出的端口，覆盖 secure/默认端口推导
    pub fn with_resolved_port(mut self, port: u16) -> Self {
        self.resolved_port = Some(port);
        self
    }

    fn policy(&self) -> RoutePolicy {
        RoutePolicy::PublicRoute {
            resolved_port: self.resolved_port,
            default_port: self.config.default_server_port,
        }
    }
}

#[async_trait]
impl DiscoveryClient for NativeDiscoveryClient {
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

impl ReactiveDiscoveryClient for NativeDiscoveryClient {
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
