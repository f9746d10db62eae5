use std::fmt;

use crate::{Node, Provenance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "Error"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// Every problem the parser, builders and override engine can report. None of them stop a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Issue {
    /// A required argument is missing.
    IncompleteNode,
    InvalidInteger,
    InvalidReal,
    ObjectCreation,
    UnnamedNode,
    UnexpectedArgument,
    MissingFilename,
    /// Removing a map entry whose key is not present.
    InvalidMapKey,
    /// A name that does not match any defined entity, with no fallback.
    UndefinedReference,
    /// A file or directory that should have been read could not be.
    MissingSource,

    ExtraArguments,
    UnlikelyArgument,
    UnlikelyArgumentCount,
    /// An `add` or `remove` flag on a field that has no such semantics.
    UnexpectedFlag,
    /// A name that was resolved by substituting a fallback entity.
    FallbackReference,
    /// An event listed more than once for the same map.
    RepeatedEvent,
}

impl Issue {
    pub fn severity(self) -> Severity {
        match self {
            Self::IncompleteNode
            | Self::InvalidInteger
            | Self::InvalidReal
            | Self::ObjectCreation
            | Self::UnnamedNode
            | Self::UnexpectedArgument
            | Self::MissingFilename
            | Self::InvalidMapKey
            | Self::UndefinedReference
            | Self::MissingSource => Severity::Error,
            Self::ExtraArguments
            | Self::UnlikelyArgument
            | Self::UnlikelyArgumentCount
            | Self::UnexpectedFlag
            | Self::FallbackReference
            | Self::RepeatedEvent => Severity::Warning,
        }
    }

    /// The catalogue message for a problem with `node` inside a `parent` definition.
    pub fn describe(self, parent: &str, node: &str) -> String {
        match self {
            Self::IncompleteNode => format!("Incomplete {} node in {} definition", node, parent),
            Self::InvalidInteger => format!("Invalid number (integer) in {} node", node),
            Self::InvalidReal => format!("Invalid number (real) in {} node", node),
            Self::ObjectCreation => format!("Could not create {} from {} node", parent, node),
            Self::UnnamedNode => format!("Unnamed {} node", node),
            Self::UnexpectedArgument => format!("Unexpected argument for {} node", node),
            Self::MissingFilename => format!("Missing filename in {} node", node),
            Self::InvalidMapKey => format!("Invalid map key while removing {} entry", node),
            Self::UndefinedReference => format!("No {} named {}", parent, node),
            Self::MissingSource => format!("Could not read {} {}", parent, node),
            Self::ExtraArguments => {
                format!("Extra arguments for {} node in {} definition", node, parent)
            }
            Self::UnlikelyArgument => {
                format!("Unlikely argument for {} node in {} definition", node, parent)
            }
            Self::UnlikelyArgumentCount => format!(
                "Unlikely number of arguments for {} node in {} definition",
                node, parent
            ),
            Self::UnexpectedFlag => format!("Unexpected flag for node {}", node),
            Self::FallbackReference => format!("No {} named {}, using fallback", parent, node),
            Self::RepeatedEvent => format!("Event {} is already applied to {}", node, parent),
        }
    }
}

/// A single reported problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub issue: Issue,
    pub message: String,
    pub provenance: Option<Provenance>,
    /// The offending node's own line rendered back to text, with its child count.
    pub node: Option<String>,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.issue.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.provenance, &self.node) {
            (Some(provenance), Some(node)) => write!(
                f,
                "Node {} on {}: {}\n\t(Node: {})",
                self.severity(),
                provenance,
                self.message,
                node
            ),
            (Some(provenance), None) => {
                write!(f, "{} on {}: {}", self.severity(), provenance, self.message)
            }
            _ => write!(f, "{}: {}", self.severity(), self.message),
        }
    }
}

/// Collects diagnostics for one run. Every entry is also emitted through `tracing` as it is recorded.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports a problem with `node` while building or modifying a `parent`.
    pub fn node(&mut self, issue: Issue, parent: &str, node: &Node) {
        self.push(Diagnostic {
            issue,
            message: issue.describe(parent, &node.name),
            provenance: Some(node.provenance.clone()),
            node: Some(format!("{} ({} children)", node, node.children.len())),
        });
    }

    /// Reports a problem that is tied to a place in a file but not to a built node.
    pub fn at(&mut self, issue: Issue, provenance: Provenance, message: impl Into<String>) {
        self.push(Diagnostic {
            issue,
            message: message.into(),
            provenance: Some(provenance),
            node: None,
        });
    }

    /// Reports a problem with no source location, such as a failed lookup.
    pub fn report(&mut self, issue: Issue, message: impl Into<String>) {
        self.push(Diagnostic {
            issue,
            message: message.into(),
            provenance: None,
            node: None,
        });
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Error => tracing::error!(
                file = diagnostic.provenance.as_ref().map(|p| p.file_name()),
                line = diagnostic.provenance.as_ref().map(|p| p.line),
                node = diagnostic.node.as_deref(),
                "{}",
                diagnostic.message
            ),
            Severity::Warning => tracing::warn!(
                file = diagnostic.provenance.as_ref().map(|p| p.file_name()),
                line = diagnostic.provenance.as_ref().map(|p| p.line),
                node = diagnostic.node.as_deref(),
                "{}",
                diagnostic.message
            ),
        }
        self.entries.push(diagnostic);
    }

    /// Appends diagnostics collected elsewhere without emitting them a second time.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// How many times a particular issue was reported.
    pub fn count(&self, issue: Issue) -> usize {
        self.entries.iter().filter(|d| d.issue == issue).count()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
