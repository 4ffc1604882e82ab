//! SecureX VPN reseller admin console.
//!
//! JSON statistics API and server-rendered dashboard over a PostgreSQL
//! metrics store, with mock fallbacks whenever the store is absent or failing.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod pages;
pub mod series;
pub mod server;

pub use api::router::{create_router, AppState};
pub use auth::{AdminCredentials, SessionService};
pub use config::AppConfig;
pub use error::ApiError;
pub use metrics::{InMemorySource, MetricsService, MetricsSource};
pub use series::SeriesGenerator;
pub use server::AdminServer;
