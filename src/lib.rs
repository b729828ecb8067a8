#![doc = "The `tasknest` library crate."]
#![doc = ""]
#![doc = "Task-management REST API: user registration and authentication, CRUD on"]
#![doc = "tasks, tags and subtasks, with per-user ownership scoping. This crate"]
#![doc = "holds the domain models, authentication machinery, routing and error"]
#![doc = "handling; the binary in `main.rs` wires it all together."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

pub use crate::auth::TokenManager;
pub use crate::config::Config;
pub use crate::error::AppError;
