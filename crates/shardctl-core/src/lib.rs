pub mod broker;
pub mod config;
pub mod error;
pub mod select;
pub mod types;
pub mod workflow;
