pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod jwt;
pub mod model;
pub mod routes;
pub mod service;

pub use service::AuthService;
