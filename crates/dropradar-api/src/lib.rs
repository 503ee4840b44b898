// dropradar-api: Async Rust client for the DropRadar backend REST API

pub mod client;
pub mod domains;
pub mod error;
pub mod models;
pub mod scan;
pub mod stats;
pub mod transport;

pub use client::DropRadarClient;
pub use error::Error;
pub use models::{
    DomainPage, DomainRecord, ListQuery, MessageResponse, NotificationResponse, ScanResponse,
    StatsResponse, Validate,
};
pub use transport::TransportConfig;
