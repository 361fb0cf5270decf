use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::{error, LevelFilter};

use vectorkit::api::VectorKit;
use vectorkit::commands::{CommandFactory, VectorkitCommandFactory};
use vectorkit::config::ReprojectionConfig;
use vectorkit::feature::GeometryPolicy;
use vectorkit::utils::logger::Logger;

fn main() {
    let matches = ClapCommand::new("VectorKit")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Maurice Schilpp")
        .about("Reproject GeoJSON vector files between coordinate reference systems")
        .arg(
            Arg::new("input")
                .help("Input vector file (.geojson, .json, .geojsonl, .ndjson)")
                .required_unless_present("transform")
                .index(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output vector file, format chosen by extension")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("crs")
                .long("crs")
                .help("Target CRS (e.g. EPSG:2056, 21781, urn:ogc:def:crs:EPSG::3857)")
                .value_name("CRS")
                .required(false),
        )
        .arg(
            Arg::new("source-crs")
                .long("source-crs")
                .help("Source CRS, overrides the crs member of the input")
                .value_name("CRS")
                .required(false),
        )
        .arg(
            Arg::new("schema")
                .long("schema")
                .help("TOML file with the target geometry type and properties")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("lenient")
                .long("lenient")
                .help("Skip features that cannot be reprojected instead of aborting")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Settings file overriding the built-in defaults")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("transform")
                .long("transform")
                .help("Transform a single coordinate given as 'x,y' and print it")
                .value_name("X,Y")
                .allow_hyphen_values(true)
                .required(false),
        )
        .arg(
            Arg::new("inspect")
                .long("inspect")
                .help("Print a summary of the input file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write log output to this file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Info };

    match matches.get_one::<String>("log-file") {
        Some(log_file) => {
            if let Err(e) = Logger::init_global_logger(log_file, level) {
                eprintln!("Error setting up logger: {}", e);
                process::exit(1);
            }
        }
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .init();
        }
    }

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => match ReprojectionConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load settings: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => ReprojectionConfig::default(),
    };
    if matches.get_flag("lenient") {
        config.geometry_policy = GeometryPolicy::Lenient;
    }

    let mut kit = VectorKit::new(config);
    if !matches.contains_id("transform") {
        if let Some(source_crs) = matches.get_one::<String>("source-crs") {
            kit = kit.with_source_crs(source_crs);
        }
    }

    let factory = VectorkitCommandFactory::new();

    let command_result = factory.create_command(&matches, &kit);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
