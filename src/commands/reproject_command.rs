//! Vector file reprojection command

use std::fs;

use clap::ArgMatches;
use log::{debug, info};

use crate::api::VectorKit;
use crate::commands::command_traits::Command;
use crate::errors::{VectorError, VectorResult};
use crate::feature::Schema;

/// Command for reprojecting a vector file
pub struct ReprojectCommand<'a> {
    /// Path to the input file
    input_file: String,
    /// Path to the output file
    output_file: String,
    /// Target CRS identifier, configured default when absent
    target_crs: Option<String>,
    /// Schema the written properties are projected onto
    schema: Option<Schema>,
    kit: &'a VectorKit,
}

impl<'a> ReprojectCommand<'a> {
    /// Create a new reprojection command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `kit` - Configured library facade
    ///
    /// # Returns
    /// A new ReprojectCommand instance or an error
    pub fn new(args: &ArgMatches, kit: &'a VectorKit) -> VectorResult<Self> {
        let input_file = args.get_one::<String>("input")
            .ok_or_else(|| VectorError::GenericError("Missing input file".to_string()))?
            .clone();

        let output_file = args.get_one::<String>("output")
            .ok_or_else(|| VectorError::GenericError("Missing output file, use -o/--output".to_string()))?
            .clone();

        let schema = match args.get_one::<String>("schema") {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    VectorError::ConfigError(format!("cannot read schema {}: {}", path, e))
                })?;
                let schema = Schema::from_toml(&content)?;
                debug!("Using schema {}", schema.describe());
                Some(schema)
            }
            None => None,
        };

        Ok(ReprojectCommand {
            input_file,
            output_file,
            target_crs: args.get_one::<String>("crs").cloned(),
            schema,
            kit,
        })
    }
}

impl<'a> Command for ReprojectCommand<'a> {
    fn execute(&self) -> VectorResult<()> {
        info!("Reprojecting {} to {}", self.input_file, self.output_file);

        let report = self.kit.project_vector(
            &self.input_file,
            &self.output_file,
            self.target_crs.as_deref(),
            self.schema.as_ref(),
        )?;

        println!("{}", report);
        Ok(())
    }
}
