pub mod bootstrap;
pub mod config;
pub mod observability;
pub mod output;

pub use bootstrap::{DemoSeed, Runtime, build_runtime};
pub use config::AppConfig;
