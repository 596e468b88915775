pub mod domain;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;
