//! Single coordinate transformation command

use clap::ArgMatches;

use crate::api::VectorKit;
use crate::commands::command_traits::Command;
use crate::errors::{VectorError, VectorResult};

/// Command for transforming one coordinate pair
pub struct TransformCommand<'a> {
    x: f64,
    y: f64,
    source_crs: String,
    target_crs: String,
    kit: &'a VectorKit,
}

impl<'a> TransformCommand<'a> {
    /// Create a new transform command from `--transform x,y`
    pub fn new(args: &ArgMatches, kit: &'a VectorKit) -> VectorResult<Self> {
        let coordinate = args.get_one::<String>("transform")
            .ok_or_else(|| VectorError::GenericError("Missing coordinate".to_string()))?;
        let (x, y) = parse_coordinate(coordinate)?;

        let source_crs = args.get_one::<String>("source-crs")
            .cloned()
            .unwrap_or_else(|| kit.config().default_source_crs.clone());
        let target_crs = args.get_one::<String>("crs")
            .cloned()
            .unwrap_or_else(|| kit.config().default_target_crs.clone());

        Ok(TransformCommand {
            x,
            y,
            source_crs,
            target_crs,
            kit,
        })
    }
}

impl<'a> Command for TransformCommand<'a> {
    fn execute(&self) -> VectorResult<()> {
        let (x, y) = self.kit.transform_point(self.x, self.y, &self.source_crs, &self.target_crs)?;
        println!("{},{}", x, y);
        Ok(())
    }
}

/// Parse an `x,y` pair
fn parse_coordinate(text: &str) -> VectorResult<(f64, f64)> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(VectorError::GenericError(format!("Coordinate must be 'x,y', got '{}'", text)));
    }

    let parse = |part: &str| {
        part.parse::<f64>()
            .map_err(|_| VectorError::GenericError(format!("Invalid coordinate value: {}", part)))
    };
    Ok((parse(parts[0])?, parse(parts[1])?))
}
