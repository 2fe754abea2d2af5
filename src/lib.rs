pub mod app;
pub mod audit;
pub mod authz;
pub mod config;
pub mod docs;
pub mod errors;
pub mod jwt;
pub mod routes;
pub mod routing;

// Re-export commonly used items for tests
pub use app::{create_app, create_app_with_audit};
pub use authz::{AccessGate, Decision, GatePolicy, UserContext};
pub use config::AppConfig;
