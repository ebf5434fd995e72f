//! Figures, text blocks and the display surface that receives them

use anyhow::Result;

/// A finished chart: an SVG document plus the metadata a surface needs
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub svg: String,
}

impl Figure {
    /// File-name friendly form of the title
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.title.len());
        for ch in self.title.chars() {
            if ch.is_ascii_alphanumeric() {
                slug.push(ch.to_ascii_lowercase());
            } else if !slug.ends_with('_') {
                slug.push('_');
            }
        }
        let slug = slug.trim_matches('_').to_string();
        if slug.is_empty() {
            "figure".to_string()
        } else {
            slug
        }
    }
}

/// Presentation style of a text block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Plain,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub style: TextStyle,
    pub body: String,
}

impl TextBlock {
    pub fn plain(body: impl Into<String>) -> Self {
        Self {
            style: TextStyle::Plain,
            body: body.into(),
        }
    }

    pub fn info(body: impl Into<String>) -> Self {
        Self {
            style: TextStyle::Info,
            body: body.into(),
        }
    }

    pub fn success(body: impl Into<String>) -> Self {
        Self {
            style: TextStyle::Success,
            body: body.into(),
        }
    }
}

/// Anything handed to a surface
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Figure(Figure),
    Text(TextBlock),
}

/// Receiver of rendered output.
///
/// Render functions build a [`Figure`] explicitly and pass ownership here;
/// there is no shared plotting state between calls.
pub trait DisplaySurface {
    fn show_figure(&mut self, figure: Figure) -> Result<()>;

    fn show_text(&mut self, block: TextBlock) -> Result<()>;
}

/// Collects artifacts in memory, in the order they were shown
#[derive(Debug, Default)]
pub struct MemorySurface {
    artifacts: Vec<Artifact>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn figures(&self) -> impl Iterator<Item = &Figure> {
        self.artifacts.iter().filter_map(|a| match a {
            Artifact::Figure(f) => Some(f),
            Artifact::Text(_) => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextBlock> {
        self.artifacts.iter().filter_map(|a| match a {
            Artifact::Text(t) => Some(t),
            Artifact::Figure(_) => None,
        })
    }

    pub fn figure_count(&self) -> usize {
        self.figures().count()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl DisplaySurface for MemorySurface {
    fn show_figure(&mut self, figure: Figure) -> Result<()> {
        self.artifacts.push(Artifact::Figure(figure));
        Ok(())
    }

    fn show_text(&mut self, block: TextBlock) -> Result<()> {
        self.artifacts.push(Artifact::Text(block));
        Ok(())
    }
}
