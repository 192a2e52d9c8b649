//! Export mapping and report writing
//!
//! - [`schema_mapper`] - PRN target schema mapping of the windowed records
//! - [`writer`] - CSV serialisation of any report table

pub mod schema_mapper;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use schema_mapper::ExportSchema;
pub use writer::{report_to_frame, to_csv_bytes, write_report};
