pub mod analytics;
pub mod auth;
pub mod categories;
pub mod downloads;
pub mod files;
pub mod invoices;
pub mod payments;
pub mod purchases;
pub mod search;
pub mod users;
