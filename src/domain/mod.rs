//! Domain layer: the entities of an invoice and the value types used to price it.

pub mod currency;
pub mod money;
pub mod person;
pub mod ports;
pub mod product;
pub mod rate;
pub mod terms;
