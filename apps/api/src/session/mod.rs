pub mod handlers;
pub mod models;
pub mod steps;
pub mod store;
