//! Outer adapters: how invoices get in and breakdowns get out.

pub mod csv;
