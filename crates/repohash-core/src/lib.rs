pub mod batch;
pub mod config;
pub mod digest;
pub mod fetch;
pub mod logging;
