//! Vector file summary command

use clap::ArgMatches;

use crate::api::VectorKit;
use crate::commands::command_traits::Command;
use crate::coordinate::CoordinateSystem;
use crate::errors::{VectorError, VectorResult};

/// Command for printing an overview of a vector file
pub struct InspectCommand<'a> {
    /// Path to the input file
    input_file: String,
    /// Also describe the declared CRS
    verbose: bool,
    kit: &'a VectorKit,
}

impl<'a> InspectCommand<'a> {
    pub fn new(args: &ArgMatches, kit: &'a VectorKit) -> VectorResult<Self> {
        let input_file = args.get_one::<String>("input")
            .ok_or_else(|| VectorError::GenericError("Missing input file".to_string()))?
            .clone();

        Ok(InspectCommand {
            input_file,
            verbose: args.get_flag("verbose"),
            kit,
        })
    }
}

impl<'a> Command for InspectCommand<'a> {
    fn execute(&self) -> VectorResult<()> {
        let summary = self.kit.inspect(&self.input_file)?;
        println!("{}", summary);

        if self.verbose {
            if let Some(crs) = &summary.crs {
                match CoordinateSystem::from_string(crs) {
                    Ok(system) => println!("  {}", system.description()),
                    Err(e) => println!("  {}", e),
                }
            }
        }
        Ok(())
    }
}
