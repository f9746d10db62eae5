use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use es_model::{GalacticMap, GameData, MapSettings};
use es_parser::{Diagnostics, Issue, Origin, ParsedSource, parse_file};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::{Config, DataRoot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    Serial,
    #[default]
    Parallel,
}

/// Every `.txt` file under `dir`, sorted by name within each directory.
pub fn data_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().unwrap_or_default() == "txt"
        })
        .map(|entry| entry.into_path())
        .collect()
}

type FileResult = (Result<ParsedSource, anyhow::Error>, Diagnostics);

fn parse_one(path: &Path, origin: Origin) -> FileResult {
    let mut diagnostics = Diagnostics::new();
    let source = parse_file(path, origin, &mut diagnostics);
    (source, diagnostics)
}

fn parse_serial(files: &[(PathBuf, Origin)]) -> Vec<FileResult> {
    files
        .iter()
        .map(|(path, origin)| parse_one(path, *origin))
        .collect()
}

fn parse_parallel(files: &[(PathBuf, Origin)]) -> Vec<FileResult> {
    files
        .par_iter()
        .map(|(path, origin)| parse_one(path, *origin))
        .collect()
}

/// Parses the data folder of every root. Nodes come out in root order, then file order, then line
/// order, whichever mode is used.
pub fn load_sources(roots: &[DataRoot], mode: LoadMode, diagnostics: &mut Diagnostics) -> ParsedSource {
    let mut files = Vec::new();
    for root in roots {
        let dir = root.data_dir();
        if !dir.is_dir() {
            diagnostics.report(
                Issue::MissingSource,
                Issue::MissingSource.describe("data directory", &dir.display().to_string()),
            );
            continue;
        }

        match root.origin {
            Origin::Base => tracing::info!("Parsing game data in {}", dir.display()),
            Origin::Plugin => tracing::info!("Parsing plugin data in {}", dir.display()),
        }
        files.extend(data_files(&dir).into_iter().map(|path| (path, root.origin)));
    }

    let results = match mode {
        LoadMode::Serial => parse_serial(&files),
        LoadMode::Parallel => parse_parallel(&files),
    };

    let mut parsed = ParsedSource::default();
    for ((source, file_diagnostics), (path, _)) in results.into_iter().zip(files.iter()) {
        diagnostics.extend(file_diagnostics);
        match source {
            Ok(source) => parsed.append(source),
            Err(e) => {
                tracing::debug!("{:#}", e);
                diagnostics.report(
                    Issue::MissingSource,
                    Issue::MissingSource.describe("data file", &path.display().to_string()),
                );
            }
        }
    }

    tracing::info!(
        files = files.len(),
        "Parsing complete: {} top-level nodes found, {} nodes in total",
        parsed.roots.len(),
        parsed.node_count
    );
    parsed
}

/// Parses all game and plugin data named by the config.
pub fn load_game_data(config: &Config, mode: LoadMode, diagnostics: &mut Diagnostics) -> GameData {
    let start = Instant::now();
    let source = load_sources(&config.data_roots(), mode, diagnostics);
    let data = GameData::new(source, diagnostics).with_event_lists(config.event_lists.clone());
    tracing::info!("Loaded game data in {:.3} seconds", start.elapsed().as_secs_f64());
    data
}

/// Builds every map the config defines, or only the one named `only`.
pub fn load_maps(
    config: &Config,
    data: &GameData,
    only: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> Vec<GalacticMap> {
    let mut maps = Vec::new();
    for node in &config.maps {
        let settings = MapSettings::from_node(node, data, diagnostics);
        if only.is_some_and(|name| settings.name != name) {
            continue;
        }
        maps.push(GalacticMap::load(settings, data, diagnostics));
    }
    maps
}
