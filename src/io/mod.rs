//! Vector file reading and writing
//!
//! This module maps file extensions to drivers and reads or writes
//! feature collections through them.

pub mod driver;
pub mod reader;
pub mod writer;

pub use driver::Driver;
pub use reader::read_collection;
pub use writer::write_collection;
