//! CLI command implementations
//!
//! This module contains implementations of the commands supported by
//! the CLI application using the Command pattern.

pub mod command_traits;
pub mod inspect_command;
pub mod reproject_command;
pub mod transform_command;

pub use command_traits::{Command, CommandFactory};
pub use inspect_command::InspectCommand;
pub use reproject_command::ReprojectCommand;
pub use transform_command::TransformCommand;

use clap::ArgMatches;
use crate::api::VectorKit;
use crate::errors::VectorResult;

/// Factory for creating command instances based on CLI arguments
///
/// `--transform` and `--inspect` select their commands; anything else is
/// a file reprojection.
pub struct VectorkitCommandFactory;

impl VectorkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        VectorkitCommandFactory
    }
}

impl Default for VectorkitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for VectorkitCommandFactory {
    fn create_command(&self, args: &ArgMatches, kit: &'a VectorKit) -> VectorResult<Box<dyn Command + 'a>> {
        if args.contains_id("transform") {
            Ok(Box::new(TransformCommand::new(args, kit)?))
        } else if args.get_flag("inspect") {
            Ok(Box::new(InspectCommand::new(args, kit)?))
        } else {
            Ok(Box::new(ReprojectCommand::new(args, kit)?))
        }
    }
}
