use std::fmt;

use serde::Serialize;

/// Multi-paragraph text such as a planet description. Each defining line is one paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Paragraphs(Vec<String>);

impl Paragraphs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paragraph(mut self, paragraph: impl Into<String>) -> Self {
        self.0.push(paragraph.into());
        self
    }

    /// Drops everything and starts over with a single paragraph.
    pub fn reset(&mut self, paragraph: String) {
        self.0.clear();
        self.0.push(paragraph);
    }

    pub fn push(&mut self, paragraph: String) {
        self.0.push(paragraph);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.0
    }
}

/// Renders the text the way the game lays it out: every paragraph tab-indented on its own line.
impl fmt::Display for Paragraphs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for paragraph in &self.0 {
            writeln!(f, "\t{}", paragraph)?;
        }
        Ok(())
    }
}
