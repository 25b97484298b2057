pub mod client;
pub mod common;
pub mod error;
pub mod glb_service;
pub mod security;
pub mod statistics;
pub mod traffic_manager;

pub use client::{Client, ClientConfig, RetryConfig, DEFAULT_API_VERSION};
pub use common::{ConfigObject, StatisticsObject};
pub use error::{ApiError, NOT_FOUND_ERROR_ID};
pub use glb_service::GlbService;
pub use security::Security;
pub use statistics::{EventStatistics, ListenIpStatistics, UserCounters64Statistics};
pub use traffic_manager::TrafficManager;
