pub mod api;
pub mod http;

pub use http::{HttpBroker, Observer};
