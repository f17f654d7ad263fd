//! 服务发现统一错误类型
//!
//! 错误只在网关与解析器边界上传递；对外的发现查询一律 fail-soft，
//! 失败路径以空结果加 warn 日志收敛，不向调用方抛出。

use thiserror::Error;

/// 服务发现错误
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// 平台库存网关调用失败（超时、网络错误等）
    #[error("inventory gateway error: {0}")]
    Gateway(String),

    /// 应用在库存中不存在
    #[error("application not found: {0}")]
    ApplicationNotFound(String),

    /// DNS 解析失败（NXDOMAIN、超时等）
    #[error("dns resolution failed for {hostname}: {reason}")]
    Resolution { hostname: String, reason: String },

    /// 配置显式禁用了服务发现
    #[error("discovery is disabled by configuration")]
    Disabled,

    /// 配置文件读取或解析失败
    #[error("config error: {0}")]
    Config(String),
}

impl DiscoveryError {
    /// 创建网关调用失败错误
    pub fn gateway(msg: impl Into<String>) -> Self {
        DiscoveryError::Gateway(msg.into())
    }

    /// 创建应用不存在错误
    pub fn application_not_found(name: impl Into<String>) -> Self {
        DiscoveryError::ApplicationNotFound(name.into())
    }

    /// 创建 DNS 解析失败错误
    pub fn resolution(hostname: impl Into<String>, reason: impl Into<String>) -> Self {
        DiscoveryError::Resolution {
            hostname: hostname.into(),
            reason: reason.into(),
        }
    }

    /// 创建配置错误
    pub fn config(msg: impl Into<String>) -> Self {
        DiscoveryError::Config(msg.into())
    }
}

/// 本 crate 默认使用的结果类型
pub type Result<T> = std::result::Result<T, DiscoveryError>;
