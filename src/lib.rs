pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod notify;
pub mod pipeline;
pub mod schema;
pub mod types;
