pub mod breakdown_writer;
pub mod invoice_reader;
