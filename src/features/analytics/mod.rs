pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;

pub use service::AnalyticsService;
