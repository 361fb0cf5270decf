//! Utility modules for the command line tool and the library facade

pub mod logger;
pub(crate) mod progress;
