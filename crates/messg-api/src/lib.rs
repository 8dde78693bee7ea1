pub mod auth;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod service;
