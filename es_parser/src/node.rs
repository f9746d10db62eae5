use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;

/// How a node is merged when it is used as a patch against an existing entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Flag {
    #[default]
    Normal,
    Add,
    Remove,
}

impl Flag {
    /// Recognises the leading `add` / `remove` keyword of a line.
    pub fn from_keyword(token: &str) -> Option<Self> {
        match token {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }

    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::Add => Some("add"),
            Self::Remove => Some("remove"),
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// Whether a node came from the base game data or from a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Origin {
    #[default]
    Base,
    Plugin,
}

/// Where a node was read from. Only used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub source: Arc<Path>,
    /// Line number (1-based)
    pub line: usize,
    pub origin: Origin,
}

impl Provenance {
    pub fn new(source: Arc<Path>, line: usize, origin: Origin) -> Self {
        Self {
            source,
            line,
            origin,
        }
    }

    /// The file name of the source without its directories, or the whole path if it has none.
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

impl Default for Provenance {
    fn default() -> Self {
        Self {
            source: Arc::from(PathBuf::from("<memory>")),
            line: 0,
            origin: Origin::Base,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} of {}", self.line, self.file_name())
    }
}

/// One parsed line plus everything nested under it.
///
/// Equality is structural: provenance does not take part in comparisons, so a tree parsed from a file
/// compares equal to the same tree built by hand.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub name: String,
    pub flag: Flag,
    pub args: Vec<String>,
    pub children: Vec<Node>,

    #[serde(skip)]
    pub provenance: Provenance,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.flag == other.flag
            && self.args == other.args
            && self.children == other.children
    }
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flag: Flag::Normal,
            args: Vec::new(),
            children: Vec::new(),
            provenance: Provenance::default(),
        }
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flag = flag;
        self
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn first_arg(&self) -> Option<&str> {
        self.arg(0)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_from_plugin(&self) -> bool {
        self.provenance.origin == Origin::Plugin
    }

    pub fn line(&self) -> usize {
        self.provenance.line
    }

    /// Direct children with the given name, in file order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(Node::subtree_len)
            .sum::<usize>()
    }

    /// Renders the subtree back into the line-per-node text format, indenting children with tabs.
    pub fn to_text(&self) -> String {
        let mut buf = String::new();
        self.write_text(0, &mut buf);
        buf
    }

    fn write_text(&self, depth: usize, buf: &mut String) {
        buf.push_str(&"\t".repeat(depth));
        buf.push_str(&self.to_string());
        buf.push('\n');
        for child in &self.children {
            child.write_text(depth + 1, buf);
        }
    }
}

/// Quotes a token so that it tokenizes back to itself.
fn quote_token(token: &str) -> String {
    let needs_quotes = token.is_empty()
        || token.contains(' ')
        || token.contains('#')
        || token.starts_with('"')
        || token.starts_with('`');
    if !needs_quotes {
        token.to_string()
    } else if token.contains('"') {
        format!("`{}`", token)
    } else {
        format!("\"{}\"", token)
    }
}

/// Renders the node's own line (flag, name, arguments) without indentation or children.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(keyword) = self.flag.keyword() {
            write!(f, "{} ", keyword)?;
        }
        write!(f, "{}", quote_token(&self.name))?;
        for arg in &self.args {
            write!(f, " {}", quote_token(arg))?;
        }
        Ok(())
    }
}
