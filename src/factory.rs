//! 发现客户端工厂
//!
//! 启动时根据配置从封闭策略集中选择一次实现，运行期不再切换。

use std::sync::Arc;

use tracing::info;

use crate::client::{
    AppServiceDiscoveryClient, DiscoveryClient, DnsDiscoveryClient, NativeDiscoveryClient,
};
use crate::config::{DiscoveryConfig, DiscoveryStrategy};
use crate::error::{DiscoveryError, Result};
use crate::heartbeat::HeartbeatPublisher;
use crate::inventory::AppInventory;

/// 发现客户端工厂
pub struct DiscoveryFactory;

impl DiscoveryFactory {
    /// 按配置创建发现客户端
    ///
    /// 配置禁用发现时返回错误；这是唯一的构建期失败，运行期查询一律
    /// fail-soft。DNS 策略不持有库存网关。
    pub fn create_client(
        config: &DiscoveryConfig,
        inventory: Arc<dyn AppInventory>,
    ) -> Result<Arc<dyn DiscoveryClient>> {
        if !config.enabled {
            return Err(DiscoveryError::Disabled);
        }

        let client: Arc<dyn DiscoveryClient> = match config.strategy() {
            DiscoveryStrategy::Native => {
                Arc::new(NativeDiscoveryClient::new(inventory, config.clone()))
            }
            DiscoveryStrategy::InternalRoute => {
                Arc::new(AppServiceDiscoveryClient::new(inventory, config.clone()))
            }
            DiscoveryStrategy::Dns => Arc::new(DnsDiscoveryClient::new(config.clone())),
        };

        info!(
            strategy = ?config.strategy(),
            description = client.description(),
            "Discovery client created"
        );
        Ok(client)
    }

    /// 按配置创建发现客户端并接上心跳发布器
    pub fn create_publisher(
        config: &DiscoveryConfig,
        inventory: Arc<dyn AppInventory>,
    ) -> Result<HeartbeatPublisher> {
        let client = Self::create_client(config, inventory)?;
        Ok(HeartbeatPublisher::new(client, config))
    }
}
