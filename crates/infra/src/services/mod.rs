//! Application services, one file per feature area.

pub mod catalog;
pub mod invoices;
pub mod purchasing;
pub mod reports;
pub mod session;
pub mod team;

pub use reports::{BillingSummary, DashboardStats, FinancialReport, dashboard_stats, financial_report};
