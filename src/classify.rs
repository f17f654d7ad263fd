//! 实例分类与映射
//!
//! 可达性判定（RUNNING 过滤、路由选择）与 [`ServiceInstance`] 映射的共享纯函数。
//! 物化客户端与流式客户端复用同一套逻辑，只在交付方式上分层。

use crate::instance::{METADATA_APPLICATION_ID, METADATA_INSTANCE_ID, ServiceInstance};
use crate::inventory::{ApplicationSummary, InstanceDetail};

/// 可被发现的实例状态字面量（比较时忽略大小写）
pub const RUNNING_STATE: &str = "RUNNING";

/// 内部域名子域名寻址的固定端口
pub const INTERNAL_ROUTE_PORT: u16 = 8080;

/// 路由选择策略
///
/// 封闭集合，启动时选定一次。两种策略互不回退：内部域名策略下
/// 没有匹配路由的应用整体不可达，而不是退回公网路由。
#[derive(Debug, Clone)]
pub enum RoutePolicy {
    /// 公网路由：取应用的第一条路由
    PublicRoute {
        /// 调用方（客户端负载均衡配置）解析出的端口，优先于默认推导
        resolved_port: Option<u16>,
        /// 无法推导时的回退端口
        default_port: u16,
    },
    /// 内部域名：取第一条后缀匹配的路由，按实例子域名寻址
    InternalDomain {
        /// 容器网络路由的域名后缀
        domain: String,
    },
}

/// 实例是否处于 RUNNING 状态
pub fn is_running(instance: &InstanceDetail) -> bool {
    instance.state.eq_ignore_ascii_case(RUNNING_STATE)
}

/// 路由是否属于内部域名
pub fn is_internal_url(url: &str, domain: &str) -> bool {
    url.ends_with(domain)
}

fn is_secure_url(url: &str) -> bool {
    url.get(..5)
        .map(|prefix| prefix.eq_ignore_ascii_case("https"))
        .unwrap_or(false)
}

/// 判定一个 (应用, 实例) 对的可达地址
///
/// 返回 (地址, 端口, secure) 三元组；非 RUNNING 实例、无路由应用、
/// 以及内部域名策略下无匹配路由的应用均返回 `None`（不可达不是错误）。
pub fn classify(
    app: &ApplicationSummary,
    instance: &InstanceDetail,
    policy: &RoutePolicy,
) -> Option<(String, u16, bool)> {
    if !is_running(instance) {
        return None;
    }

    match policy {
        RoutePolicy::PublicRoute {
            resolved_port,
            default_port,
        } => {
            let url = app.urls.first()?;
            let secure = is_secure_url(url);
            let port = resolved_port.unwrap_or(if secure { 443 } else { *default_port });
            Some((url.clone(), port, secure))
        }
        RoutePolicy::InternalDomain { domain } => {
            let url = app.urls.iter().find(|u| is_internal_url(u, domain))?;
            // 内部路由要求按实例子域名寻址：<index>.<route>
            let address = format!("{}.{}", instance.index, url);
            Some((address, INTERNAL_ROUTE_PORT, false))
        }
    }
}

/// 将分类结果映射为标准化服务实例记录
pub fn map_instance(
    app: &ApplicationSummary,
    instance: &InstanceDetail,
    host: String,
    port: u16,
    secure: bool,
) -> ServiceInstance {
    let instance_id = format!("{}.{}", app.id, instance.index);
    ServiceInstance::new(instance_id, app.name.clone(), host, port, secure)
        .with_metadata(METADATA_APPLICATION_ID, app.id.clone())
        .with_metadata(METADATA_INSTANCE_ID, instance.index.clone())
}

/// 对单个实例执行分类 + 映射
pub fn service_instance(
    app: &ApplicationSummary,
    instance: &InstanceDetail,
    policy: &RoutePolicy,
) -> Option<ServiceInstance> {
    classify(app, instance, policy)
        .map(|(host, port, secure)| map_instance(app, instance, host, port, secure))
}

/// 枚举应用的全部可达实例
pub fn service_instances(app: &ApplicationSummary, policy: &RoutePolicy) -> Vec<ServiceInstance> {
    app.instance_details
        .iter()
        .filter_map(|detail| service_instance(app, detail, policy))
        .collect()
}
