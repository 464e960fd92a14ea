//! Application layer: the allocation engine and the state it is run against.
//!
//! `allocation` holds the pure computations that price an invoice and split it
//! among people. `roster` holds the referential-integrity updates over people and
//! products, and `Invoice` bundles both behind a single owner so that every user
//! action is applied atomically. `RatePoller` runs the advisory exchange-rate
//! fetch on its own task, fully decoupled from the arithmetic.

pub mod allocation;
pub mod invoice;
pub mod rate_poller;
pub mod roster;
