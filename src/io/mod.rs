//! I/O layer for loading sprite sheets and data tables.
//! Provides the `sheets` loader, the JSON `data` tables, and `writers`
//! for PNG outputs and metadata sidecars.
pub mod sheets;
pub use sheets::{SheetError, SheetSource};

pub mod data;
pub use data::DataError;

pub mod writers;
