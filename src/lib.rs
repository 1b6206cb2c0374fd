//! Product-name extraction for regulatory product descriptions.
//!
//! [`extract`] holds the pure, per-value pipeline; [`table`] is the sheet
//! glue that adds a `Product Name` column in front of `Product Description`.

pub mod error;
pub mod extract;
pub mod settings;
pub mod table;

pub use error::{RulesError, TableError};
pub use extract::{Extraction, Extractor, NameSource, Rules};
pub use settings::Settings;
pub use table::{
    augment, output_extension, read_table, write_table, CellValue, ProcessCounts, Table,
};
