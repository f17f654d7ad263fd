//! Flare Cloud Discovery Library
//!
//! Polling-based service discovery adapter for Cloud Foundry style platforms.
//! Queries the platform application inventory, filters running instances,
//! classifies them by reachability (public route, internal container network,
//! or raw DNS), and republishes the catalog as heartbeat notifications.

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod factory;
pub mod heartbeat;
pub mod instance;
pub mod inventory;

// Re-exports
pub use classify::{INTERNAL_ROUTE_PORT, RUNNING_STATE, RoutePolicy};
pub use client::{
    AppServiceDiscoveryClient, DiscoveryClient, DnsDiscoveryClient, DnsResolver,
    HostnameConverter, NativeDiscoveryClient, ReactiveDiscoveryClient, TokioDnsResolver,
    suffix_converter,
};
pub use config::{DEFAULT_HEARTBEAT_FREQUENCY, DiscoveryConfig, DiscoveryStrategy};
pub use error::{DiscoveryError, Result};
pub use factory::DiscoveryFactory;
pub use heartbeat::{HeartbeatListener, HeartbeatPublisher, channel_listener};
pub use instance::{METADATA_APPLICATION_ID, METADATA_INSTANCE_ID, ServiceInstance};
pub use inventory::{AppInventory, ApplicationSummary, InstanceDetail};
