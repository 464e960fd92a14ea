//! Adapters implementing the domain ports.

pub mod http_rate;
pub mod static_rate;
