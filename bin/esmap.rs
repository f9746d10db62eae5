use std::{collections::BTreeMap, path::PathBuf};

use clap::Parser;
use colored::*;
use esmapper::{
    Config, LoadMode,
    es_model::GalacticMap,
    es_parser::{Diagnostics, Severity},
    load_game_data, load_maps,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "esmap")]
#[command(about = "Loads Endless Sky data and resolves the galaxy maps named in a config file")]
struct Cli {
    /// Path to the map configuration file
    config: PathBuf,

    /// Only build the map with this name
    #[arg(short, long)]
    map: Option<String>,

    /// Parse data files one at a time instead of in parallel
    #[arg(long)]
    serial: bool,

    /// Print the resolved maps as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if let Err(e) = esmap(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn esmap(cli: Cli) -> Result<(), anyhow::Error> {
    let mut diagnostics = Diagnostics::new();

    let config = Config::load(&cli.config, &mut diagnostics)?;
    let mode = if cli.serial {
        LoadMode::Serial
    } else {
        LoadMode::Parallel
    };
    let data = load_game_data(&config, mode, &mut diagnostics);
    let maps = load_maps(&config, &data, cli.map.as_deref(), &mut diagnostics);

    if let Some(name) = &cli.map {
        if maps.is_empty() {
            return Err(anyhow::anyhow!("No map named {} in {}", name, config.path.display()));
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&maps)?);
    } else {
        for map in &maps {
            print_summary(map, &mut diagnostics);
        }
    }

    print_diagnostics(&diagnostics);
    Ok(())
}

fn print_summary(map: &GalacticMap, diagnostics: &mut Diagnostics) {
    println!("{}", format!("Map {}", map.name()).bold());
    println!(
        "  {} systems ({} shown), {} planets, {} governments, {} galaxies",
        map.systems.len(),
        map.visible_systems().count(),
        map.planets.len(),
        map.governments.len(),
        map.galaxies.len(),
    );
    println!(
        "  {} hyperlinks, {} of {} wormholes drawn",
        map.visible_links(diagnostics).len(),
        map.drawn_wormholes().count(),
        map.wormholes.len(),
    );
    if !map.applied_events.is_empty() {
        println!("  Events: {}", map.applied_events.join(", "));
    }

    let mut painted: BTreeMap<String, usize> = BTreeMap::new();
    for system in map.visible_systems() {
        let government = map
            .paint_government(system, diagnostics)
            .map(|government| government.name.clone())
            .unwrap_or_default();
        *painted.entry(government).or_default() += 1;
    }
    for (government, count) in painted {
        let government = if government.is_empty() {
            "(none)".dimmed().to_string()
        } else {
            government
        };
        println!("    {:<30} {}", government, count);
    }
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    if diagnostics.is_empty() {
        return;
    }

    eprintln!();
    for diagnostic in diagnostics {
        let text = diagnostic.to_string();
        match diagnostic.severity() {
            Severity::Error => eprintln!("{}", text.red()),
            Severity::Warning => eprintln!("{}", text.yellow()),
        }
    }
    eprintln!(
        "{} errors, {} warnings",
        diagnostics.error_count().to_string().red().bold(),
        diagnostics.warning_count().to_string().yellow().bold()
    );
}
