//! Infrastructure layer: storage backends, repositories, configuration and
//! the application services that tie the domain crates together.

pub mod app;
pub mod config;
pub mod error;
pub mod repository;
pub mod seed;
pub mod services;
pub mod store;

mod integration_tests;

pub use app::InvoiceFlow;
pub use config::Config;
pub use error::{ServiceError, ServiceResult, StoreError};
pub use repository::{Repository, SnapshotRepository};
pub use services::{BillingSummary, DashboardStats, FinancialReport};
pub use store::{InMemoryStore, JsonDirStore, KeyValueStore};
