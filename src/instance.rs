//! 服务实例记录

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// 元数据键：应用 ID
pub const METADATA_APPLICATION_ID: &str = "applicationId";

/// 元数据键：实例序号（原始序数，非复合标识）
pub const METADATA_INSTANCE_ID: &str = "instanceId";

/// 服务实例
///
/// 发现查询的标准化输出。`instance_id` 为 `applicationId + "." + index`，
/// 同一 (applicationId, index) 在实例存续期间跨轮询保持稳定。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceInstance {
    /// 稳定实例标识
    pub instance_id: String,

    /// 逻辑服务名（应用名）
    pub service_id: String,

    /// 网络地址（主机名或 IP）
    pub host: String,

    /// 端口
    pub port: u16,

    /// 源路由是否为 https
    pub secure: bool,

    /// 元数据（至少包含 applicationId 与 instanceId）
    pub metadata: HashMap<String, String>,
}

impl ServiceInstance {
    /// 创建服务实例
    pub fn new(
        instance_id: impl Into<String>,
        service_id: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        secure: bool,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            service_id: service_id.into(),
            host: host.into(),
            port,
            secure,
            metadata: HashMap::new(),
        }
    }

    /// 添加元数据
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// URI scheme（由 secure 标志推导）
    pub fn scheme(&self) -> &'static str {
        if self.secure { "https" } else { "http" }
    }

    /// 转换为 URI
    pub fn uri(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.port)
    }
}
