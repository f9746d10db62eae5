use std::path::{Path, PathBuf};

use es_parser::{Diagnostics, Issue, Node, Origin, ParsedSource, parse_source};
use indexmap::IndexMap;

use crate::LoadError;

const CONFIG: &str = "config";

/// Everything read from a configuration file and the files it extends.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub path: PathBuf,
    /// Top-level config nodes in load order, with extended files spliced in after their `extends` node.
    pub nodes: Vec<Node>,

    pub game_directory: Option<PathBuf>,
    pub plugin_directories: Vec<PathBuf>,
    pub event_lists: IndexMap<String, Vec<String>>,
    /// `map` nodes, read once the game data is loaded.
    pub maps: Vec<Node>,
}

impl Config {
    /// Reads a configuration file. Only an unreadable file is fatal; everything else is reported and
    /// skipped.
    pub fn load(path: &Path, diagnostics: &mut Diagnostics) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::MissingConfig {
            path: path.to_path_buf(),
            source,
        })?;

        let mut nodes = Vec::new();
        let mut stack = vec![path.to_path_buf()];
        let source = parse_source(&content, path, Origin::Base, diagnostics);
        collect_nodes(source, path, &mut stack, &mut nodes, diagnostics)?;

        let mut config = Self {
            path: path.to_path_buf(),
            ..Self::default()
        };
        for node in &nodes {
            config.read_node(node, diagnostics);
        }
        config.nodes = nodes;

        tracing::info!(
            nodes = config.nodes.len(),
            maps = config.maps.len(),
            "Config loaded from {}",
            path.display()
        );
        Ok(config)
    }

    fn read_node(&mut self, node: &Node, diagnostics: &mut Diagnostics) {
        match node.name.as_str() {
            "extends" => {}
            "game directory" => {
                if let Some(dir) = self.directory(node, diagnostics) {
                    self.game_directory = Some(dir);
                }
            }
            "plugin directory" => {
                if let Some(dir) = self.directory(node, diagnostics) {
                    self.plugin_directories.push(dir);
                }
            }
            "event list" => {
                let Some(name) = node.first_arg() else {
                    diagnostics.node(Issue::IncompleteNode, CONFIG, node);
                    return;
                };
                let events = node.children.iter().map(|child| child.name.clone()).collect();
                self.event_lists.insert(name.to_string(), events);
            }
            "map" => self.maps.push(node.clone()),
            _ => tracing::debug!(node = %node, "Ignoring config node"),
        }
    }

    /// A directory argument, resolved against the file that names it.
    fn directory(&self, node: &Node, diagnostics: &mut Diagnostics) -> Option<PathBuf> {
        let Some(dir) = node.first_arg() else {
            diagnostics.node(Issue::IncompleteNode, CONFIG, node);
            return None;
        };
        Some(relative_to(&node.provenance.source, dir))
    }

    /// Data roots in load order: the game first, then each plugin.
    pub fn data_roots(&self) -> Vec<DataRoot> {
        self.game_directory
            .iter()
            .map(|dir| DataRoot::new(dir, Origin::Base))
            .chain(
                self.plugin_directories
                    .iter()
                    .map(|dir| DataRoot::new(dir, Origin::Plugin)),
            )
            .collect()
    }
}

/// A content directory whose `data` folder holds the text files to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRoot {
    pub path: PathBuf,
    pub origin: Origin,
}

impl DataRoot {
    pub fn new(path: impl Into<PathBuf>, origin: Origin) -> Self {
        Self {
            path: path.into(),
            origin,
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.path.join("data")
    }
}

fn relative_to(file: &Path, target: &str) -> PathBuf {
    let target = Path::new(target);
    match file.parent() {
        Some(parent) if target.is_relative() => parent.join(target),
        _ => target.to_path_buf(),
    }
}

fn collect_nodes(
    source: ParsedSource,
    path: &Path,
    stack: &mut Vec<PathBuf>,
    nodes: &mut Vec<Node>,
    diagnostics: &mut Diagnostics,
) -> Result<(), LoadError> {
    for node in source.roots {
        let extends: Vec<PathBuf> = if node.name == "extends" {
            node.args.iter().map(|file| relative_to(path, file)).collect()
        } else {
            Vec::new()
        };
        let provenance = node.provenance.clone();
        nodes.push(node);

        for file in extends {
            if stack.contains(&file) {
                diagnostics.at(
                    Issue::UnexpectedArgument,
                    provenance.clone(),
                    format!("Config file {} is already being read", file.display()),
                );
                continue;
            }

            tracing::info!("Parsing extended config file {}", file.display());
            let content =
                std::fs::read_to_string(&file).map_err(|source| LoadError::UnreadableRoot {
                    path: file.clone(),
                    parent: path.to_path_buf(),
                    source,
                })?;
            let extended = parse_source(&content, &file, Origin::Base, diagnostics);

            stack.push(file.clone());
            collect_nodes(extended, &file, stack, nodes, diagnostics)?;
            stack.pop();
        }
    }
    Ok(())
}
