use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs;

use tiled2fx::{convert, write_fx, Config, MapDocument};

/// Arduboy FX tool that generates raycaster map data from a Tiled map (json export)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tiled input file (.json file)
    #[arg(default_value = "../resources/map.json")]
    filename: String,
    /// Generated FX data file
    #[arg(short, long, default_value = "../fx/fxdata.txt")]
    output: String,
    /// Conversion parameters (yaml file)
    #[arg(short, long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(yaml_file) => {
            let contents = fs::read_to_string(yaml_file)
                .with_context(|| format!("Unable to read config file {}", yaml_file))?;
            Config::from_yaml(&contents)
                .with_context(|| format!("Bad config file {}", yaml_file))?
        }
        None => Config::default(),
    };

    info!("Loading map file {}", args.filename);
    let json = fs::read_to_string(&args.filename)
        .with_context(|| format!("Unable to read input file {}", args.filename))?;
    let document = MapDocument::from_json(&json)
        .with_context(|| format!("Bad map file {}", args.filename))?;

    info!("Scanning for relevant data");
    let map = convert(&document, &config)?;

    // Everything is checked, the file is only written once fully generated
    info!("Dumping to {}", args.output);
    let mut out = Vec::new();
    write_fx(&mut out, &map, &config)?;
    fs::write(&args.output, out).with_context(|| format!("Unable to write {}", args.output))?;

    info!("Done!");
    Ok(())
}
