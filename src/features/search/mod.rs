pub mod dtos;
pub mod filters;
pub mod handlers;
pub mod routes;
pub mod service;

pub use service::SearchService;
