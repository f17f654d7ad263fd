//! 服务发现配置
//!
//! 所有开关集中在 [`DiscoveryConfig`]，策略在启动时由 [`DiscoveryConfig::strategy`]
//! 一次性选定，运行期不再切换。

use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};

/// 服务发现配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    /// 是否启用服务发现
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// 心跳发布间隔（毫秒）
    #[serde(default = "default_heartbeat_frequency")]
    pub heartbeat_frequency: u64,

    /// 路由未携带端口信息时的回退端口
    #[serde(default = "default_server_port")]
    pub default_server_port: u16,

    /// 组合多个发现客户端时的排序权重（值越大优先级越低）
    #[serde(default = "default_order")]
    pub order: i32,

    /// 使用基于 DNS 的发现策略，而非库存 API 策略
    #[serde(default)]
    pub use_dns: bool,

    /// DNS 策略下直接解析容器 IP（多地址），而非按实例子域名寻址
    #[serde(default)]
    pub use_container_ip: bool,

    /// 标识容器网络可达路由的域名后缀
    #[serde(default = "default_internal_domain")]
    pub internal_domain: String,
}

fn default_enabled() -> bool {
    true
}

/// 心跳间隔默认值（毫秒），同时作为非法配置（0）的回退值
pub const DEFAULT_HEARTBEAT_FREQUENCY: u64 = 5000;

fn default_heartbeat_frequency() -> u64 {
    DEFAULT_HEARTBEAT_FREQUENCY
}

fn default_server_port() -> u16 {
    80
}

fn default_order() -> i32 {
    i32::MAX
}

fn default_internal_domain() -> String {
    "apps.internal".to_string()
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            heartbeat_frequency: default_heartbeat_frequency(),
            default_server_port: default_server_port(),
            order: default_order(),
            use_dns: false,
            use_container_ip: false,
            internal_domain: default_internal_domain(),
        }
    }
}

/// 发现策略（封闭集合，启动时选定一次）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    /// 公网路由寻址，走库存 API
    Native,
    /// 内部域名按实例子域名寻址，走库存 API
    InternalRoute,
    /// 纯 DNS 多地址解析，不依赖库存 API
    Dns,
}

impl DiscoveryConfig {
    /// 由配置开关推导发现策略
    ///
    /// - `use_dns = false` -> 公网路由
    /// - `use_dns = true, use_container_ip = false` -> 内部域名子域名寻址
    /// - `use_dns = true, use_container_ip = true` -> 原始 DNS 多地址解析
    pub fn strategy(&self) -> DiscoveryStrategy {
        match (self.use_dns, self.use_container_ip) {
            (false, _) => DiscoveryStrategy::Native,
            (true, false) => DiscoveryStrategy::InternalRoute,
            (true, true) => DiscoveryStrategy::Dns,
        }
    }

    /// 从 TOML 文件加载配置
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DiscoveryError::config(format!("failed to read {}: {}", path, e)))?;
        toml::from_str(&content)
            .map_err(|e| DiscoveryError::config(format!("failed to parse {}: {}", path, e)))
    }
}
