//! 发现客户端抽象与实现
//!
//! 公开的查询面有两种交付模式：物化结果（`Vec`，调用即阻塞到网关返回）
//! 与惰性流（`BoxStream`，冷流，订阅时才触发网关往返）。
//! 三种策略实现（公网路由 / 内部域名 / DNS）各自同时实现两个 trait，
//! 分类与映射逻辑共享 [`crate::classify`]。

pub mod app_service;
pub mod dns;
pub mod native;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use tracing::warn;

use crate::classify::{self, RoutePolicy};
use crate::instance::ServiceInstance;
use crate::inventory::AppInventory;

pub use app_service::AppServiceDiscoveryClient;
pub use dns::{DnsDiscoveryClient, DnsResolver, HostnameConverter, TokioDnsResolver, suffix_converter};
pub use native::NativeDiscoveryClient;

/// 发现客户端（物化交付）
///
/// 所有查询 fail-soft：网关失败、应用不存在等一律返回空结果并记录
/// warn 日志，绝不向调用方抛出，也绝不打断心跳定时任务。
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// 策略的静态诊断标签
    fn description(&self) -> &'static str;

    /// 已知服务名列表（顺序与网关返回一致，稳定性不作保证）
    async fn get_services(&self) -> Vec<String>;

    /// 指定服务的可达实例列表
    async fn get_instances(&self, service_id: &str) -> Vec<ServiceInstance>;

    /// 组合多个发现客户端时的排序权重
    fn order(&self) -> i32;
}

/// 发现客户端（惰性流交付）
///
/// 返回的流是冷流：每次订阅独立触发一次网关往返，订阅之间不共享结果。
pub trait ReactiveDiscoveryClient: Send + Sync {
    /// 策略的静态诊断标签
    fn description(&self) -> &'static str;

    /// 已知服务名流
    fn service_stream(&self) -> BoxStream<'static, String>;

    /// 指定服务的可达实例流
    fn instance_stream(&self, service_id: &str) -> BoxStream<'static, ServiceInstance>;

    /// 组合多个发现客户端时的排序权重
    fn order(&self) -> i32;
}

/// 把一次异步批量查询包装为冷流
///
/// 查询闭包在首次 poll 时才执行，因此流的创建本身不产生网关调用。
pub(crate) fn lazy_stream<T, F, Fut>(fetch: F) -> BoxStream<'static, T>
where
    T: Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Vec<T>> + Send + 'static,
{
    futures::stream::once(async move { futures::stream::iter(fetch().await) })
        .flatten()
        .boxed()
}

/// 库存 API 策略共用的实例查询：取应用快照，逐实例分类映射
///
/// 查询失败（含应用不存在）返回空列表。临时性失败是常态拓扑抖动，
/// 调用方无法区分「确实没有实例」与「查询暂时失败」。
pub(crate) async fn instances_via_inventory(
    inventory: Arc<dyn AppInventory>,
    policy: RoutePolicy,
    service_id: String,
) -> Vec<ServiceInstance> {
    match inventory.get_application(&service_id).await {
        Ok(app) => classify::service_instances(&app, &policy),
        Err(e) => {
            warn!(
                service_id = %service_id,
                error = %e,
                "Failed to look up application instances"
            );
            Vec::new()
        }
    }
}

/// 库存 API 策略共用的服务名查询
pub(crate) async fn services_via_inventory(inventory: Arc<dyn AppInventory>) -> Vec<String> {
    match inventory.list_applications().await {
        Ok(apps) => apps.into_iter().map(|app| app.name).collect(),
        Err(e) => {
            warn!(error = %e, "Failed to list applications");
            Vec::new()
        }
    }
}
