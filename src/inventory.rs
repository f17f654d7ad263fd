//! 平台应用库存网关抽象
//!
//! 库存网关是外部协作方（平台 API 客户端），这里只定义查询边界与快照模型。
//! 快照在每次查询时重建，本 crate 不做任何缓存。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 应用快照
///
/// 一次网关查询返回的不可变视图：应用标识、路由列表与各实例明细。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationSummary {
    /// 应用 ID（平台分配的唯一标识）
    pub id: String,

    /// 应用名（即对外的服务名）
    pub name: String,

    /// 路由列表（域名形式，内部路由以配置的域名后缀区分）
    pub urls: Vec<String>,

    /// 期望实例数
    pub instances: u32,

    /// 运行中实例数
    pub running_instances: u32,

    /// 各实例明细
    pub instance_details: Vec<InstanceDetail>,
}

/// 实例明细
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceDetail {
    /// 实例序号（从 0 开始的文本序数）
    pub index: String,

    /// 实例状态（RUNNING / STARTING / CRASHED / DOWN ...）
    pub state: String,
}

impl InstanceDetail {
    /// 创建实例明细
    pub fn new(index: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            state: state.into(),
        }
    }
}

impl ApplicationSummary {
    /// 创建应用快照
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            urls: Vec::new(),
            instances: 0,
            running_instances: 0,
            instance_details: Vec::new(),
        }
    }

    /// 添加路由
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.urls.push(url.into());
        self
    }

    /// 添加实例明细（同步更新实例计数）
    pub fn with_instance(mut self, detail: InstanceDetail) -> Self {
        self.instances += 1;
        if detail.state.eq_ignore_ascii_case(crate::classify::RUNNING_STATE) {
            self.running_instances += 1;
        }
        self.instance_details.push(detail);
        self
    }
}

/// 平台库存网关 trait
///
/// 发现客户端通过它查询应用与实例。实现方负责认证、超时与重试；
/// 这里的调用方只关心快照结果。需要动态分发（dyn），使用 async-trait。
#[async_trait]
pub trait AppInventory: Send + Sync {
    /// 列出全部应用快照
    async fn list_applications(&self) -> Result<Vec<ApplicationSummary>>;

    /// 按名称查询单个应用快照，不存在时返回错误
    async fn get_application(&self, name: &str) -> Result<ApplicationSummary>;
}
