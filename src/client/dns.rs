//! 基于 DNS 的发现客户端
//!
//! 不依赖库存网关：把服务名转换为主机名（默认拼接内部域名后缀），
//! 解析出的每个地址对应一个服务实例。适用于平台以 DNS 暴露
//! 容器间网络服务注册表的环境。

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use tracing::warn;

use crate::classify::INTERNAL_ROUTE_PORT;
use crate::client::{DiscoveryClient, ReactiveDiscoveryClient, lazy_stream};
use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, Result};
use crate::instance::ServiceInstance;

const DESCRIPTION: &str = "DNS based discovery client";

/// 服务名到主机名的转换函数
///
/// 以显式函数值注入，默认为后缀拼接闭包（见 [`suffix_converter`]），
/// 非标准命名方案可以替换整个转换策略。
pub type HostnameConverter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// 默认转换：`<service_id>.<domain>`
pub fn suffix_converter(domain: impl Into<String>) -> HostnameConverter {
    let domain = domain.into();
    Arc::new(move |service_id: &str| format!("{}.{}", service_id, domain))
}

/// DNS 解析器 trait
///
/// 默认实现走 tokio 的系统解析；测试可注入固定应答或失败。
#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// 解析主机名的全部地址
    async fn resolve(&self, hostname: &str) -> Result<Vec<IpAddr>>;
}

/// 基于 `tokio::net::lookup_host` 的默认解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDnsResolver;

#[async_trait]
impl DnsResolver for TokioDnsResolver {
    async fn resolve(&self, hostname: &str) -> Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((hostname, 0u16))
            .await
            .map_err(|e| DiscoveryError::resolution(hostname, e.to_string()))?;
        Ok(addrs.map(|addr| addr.ip()).collect())
    }
}

/// DNS 发现客户端
pub struct DnsDiscoveryClient {
    config: DiscoveryConfig,
    converter: HostnameConverter,
    resolver: Arc<dyn DnsResolver>,
}

impl DnsDiscoveryClient {
    /// 创建 DNS 发现客户端（默认后缀拼接 + 系统解析器）
    pub fn new(config: DiscoveryConfig) -> Self {
        let converter = suffix_converter(config.internal_domain.clone());
        Self {
            config,
            converter,
            resolver: Arc::new(TokioDnsResolver),
        }
    }

    /// 替换服务名到主机名的转换策略
    pub fn with_converter(mut self, converter: HostnameConverter) -> Self {
        self.converter = converter;
        self
    }

    /// 替换 DNS 解析器
    pub fn with_resolver(mut self, resolver: Arc<dyn DnsResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// 解析地址使用的端口
    ///
    /// 显式配置了非 80 的默认端口时直接使用；否则内部域名下固定 8080，
    /// 其余情况回退默认端口。
    fn port_for(&self, hostname: &str) -> u16 {
        let default_port = self.config.default_server_port;
        if default_port != 80 {
            default_port
        } else if hostname.ends_with(&self.config.internal_domain) {
            INTERNAL_ROUTE_PORT
        } else {
            default_port
        }
    }
}

/// 解析并展开为服务实例，解析失败返回空列表
async fn resolve_instances(
    resolver: Arc<dyn DnsResolver>,
    hostname: String,
    service_id: String,
    port: u16,
) -> Vec<ServiceInstance> {
    match resolver.resolve(&hostname).await {
        Ok(addresses) => addresses
            .into_iter()
            .map(|address| {
                ServiceInstance::new(
                    service_id.clone(),
                    service_id.clone(),
                    address.to_string(),
                    port,
                    false,
                )
            })
            .collect(),
        Err(e) => {
            warn!(hostname = %hostname, error = %e, "DNS resolution failed");
            Vec::new()
        }
    }
}

#[async_trait]
impl DiscoveryClient for DnsDiscoveryClient {
    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    /// DNS 没有「列出全部服务」的反向操作，返回空列表以保持
    /// 各策略间的多态一致性
    async fn get_services(&self) -> Vec<String> {
        warn!("get_services is not supported by the DNS discovery client");
        Vec::new()
    }

    async fn get_instances(&self, service_id: &str) -> Vec<ServiceInstance> {
        let hostname = (self.converter)(service_id);
        let port = self.port_for(&hostname);
        resolve_instances(
            self.resolver.clone(),
            hostname,
            service_id.to_string(),
            port,
        )
        .await
    }

    fn order(&self) -> i32 {
        self.config.order
    }
}

impl ReactiveDiscoveryClient for DnsDiscoveryClient {
    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn service_stream(&self) -> BoxStream<'static, String> {
        warn!("service_stream is not supported by the DNS discovery client");
        futures::stream::empty().boxed()
    }

    fn instance_stream(&self, service_id: &str) -> BoxStream<'static, ServiceInstance> {
        let hostname = (self.converter)(service_id);
        let port = self.port_for(&hostname);
        let resolver = self.resolver.clone();
        let service_id = service_id.to_string();
        lazy_stream(move || resolve_instances(resolver, hostname, service_id, port))
    }

    fn order(&self) -> i32 {
        self.config.order
    }
}
