use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{Diagnostics, Issue, Node, Origin, Provenance, parse_head};

/// The top-level nodes of one source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSource {
    pub roots: Vec<Node>,
    /// Every node produced from the file, at any depth.
    pub node_count: usize,
}

impl ParsedSource {
    /// Appends another file's nodes after this one's, keeping load order.
    pub fn append(&mut self, other: ParsedSource) {
        self.roots.extend(other.roots);
        self.node_count += other.node_count;
    }
}

/// Indentation depth of a raw line: the number of leading tab characters.
pub fn indentation(line: &str) -> usize {
    line.chars().take_while(|&c| c == '\t').count()
}

/// Assembles lines into a forest of nodes in one left-to-right pass.
///
/// Open ancestors live on a stack and are attached to their own parent (or to the roots) when they are
/// closed, so children always end up in file order.
pub struct TreeBuilder<'d> {
    source: Arc<Path>,
    origin: Origin,
    diagnostics: &'d mut Diagnostics,

    roots: Vec<Node>,
    ancestors: Vec<Node>,
    /// The node produced by the previous line, not yet attached to anything.
    current: Option<Node>,
    last_depth: usize,
    line_number: usize,
    node_count: usize,
}

impl<'d> TreeBuilder<'d> {
    pub fn new(source: Arc<Path>, origin: Origin, diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            source,
            origin,
            diagnostics,
            roots: Vec::new(),
            ancestors: Vec::new(),
            current: None,
            last_depth: 0,
            line_number: 0,
            node_count: 0,
        }
    }

    pub fn push_line(&mut self, line: &str) {
        self.line_number += 1;
        let depth = indentation(line);
        let provenance = Provenance::new(self.source.clone(), self.line_number, self.origin);

        let head = match parse_head(line) {
            Ok(head) => head,
            Err(e) => {
                self.diagnostics.at(Issue::UnnamedNode, provenance.clone(), e.to_string());
                None
            }
        };

        let Some(head) = head else {
            // Lines without a node never pop ancestors, but a deeper one still opens the previous node.
            if !self.open_current(depth) {
                self.close_current();
            }
            self.last_depth = depth;
            return;
        };

        if !self.open_current(depth) {
            self.close_current();
            while self.ancestors.len() > depth {
                self.close_ancestor();
            }
        }

        self.current = Some(Node {
            name: head.name,
            flag: head.flag,
            args: head.args,
            children: Vec::new(),
            provenance,
        });
        self.node_count += 1;
        self.last_depth = depth;
    }

    pub fn finish(mut self) -> ParsedSource {
        self.close_current();
        while !self.ancestors.is_empty() {
            self.close_ancestor();
        }
        ParsedSource {
            roots: self.roots,
            node_count: self.node_count,
        }
    }

    /// Pushes the previous node onto the ancestors when `depth` is deeper than its line.
    fn open_current(&mut self, depth: usize) -> bool {
        if depth <= self.last_depth {
            return false;
        }
        match self.current.take() {
            Some(parent) => {
                self.ancestors.push(parent);
                true
            }
            None => false,
        }
    }

    fn attach(&mut self, node: Node) {
        match self.ancestors.last_mut() {
            Some(parent) => parent.push_child(node),
            None => self.roots.push(node),
        }
    }

    fn close_current(&mut self) {
        if let Some(node) = self.current.take() {
            self.attach(node);
        }
    }

    fn close_ancestor(&mut self) {
        if let Some(node) = self.ancestors.pop() {
            self.attach(node);
        }
    }
}

/// Parses text that is already in memory.
pub fn parse_source(
    input: &str,
    source: impl Into<PathBuf>,
    origin: Origin,
    diagnostics: &mut Diagnostics,
) -> ParsedSource {
    let mut builder = TreeBuilder::new(Arc::from(source.into()), origin, diagnostics);
    for line in input.lines() {
        builder.push_line(line);
    }
    builder.finish()
}

/// Reads and parses one data file.
pub fn parse_file(
    path: &Path,
    origin: Origin,
    diagnostics: &mut Diagnostics,
) -> Result<ParsedSource, anyhow::Error> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file at {}", path.display()))?;
    Ok(parse_source(&content, path, origin, diagnostics))
}
