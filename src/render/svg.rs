//! Minimal SVG document builder

/// Horizontal anchoring of a text element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Text appearance
#[derive(Debug, Clone)]
pub struct Font {
    pub size: f64,
    pub anchor: Anchor,
    pub color: String,
    pub bold: bool,
    /// Rotation in degrees around the text origin
    pub rotate: Option<f64>,
}

impl Font {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            anchor: Anchor::Start,
            color: "#262626".to_string(),
            bold: false,
            rotate: None,
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

/// Accumulates SVG elements on a white canvas
#[derive(Debug, Clone)]
pub struct SvgDocument {
    width: u32,
    height: u32,
    body: String,
}

impl SvgDocument {
    pub fn new(width: u32, height: u32) -> Self {
        let mut doc = Self {
            width,
            height,
            body: String::new(),
        };
        doc.rect(0.0, 0.0, width as f64, height as f64, "#ffffff", None);
        doc
    }

    pub fn width(&self) -> f64 {
        self.width as f64
    }

    pub fn height(&self) -> f64 {
        self.height as f64
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, stroke: Option<(&str, f64)>) {
        let stroke_attr = match stroke {
            Some((color, width)) if width > 0.0 => {
                format!(r#" stroke="{}" stroke-width="{:.2}""#, color, width)
            }
            _ => String::new(),
        };
        self.body.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"{}/>"#,
            x, y, w, h, fill, stroke_attr
        ));
        self.body.push('\n');
    }

    pub fn rect_with_opacity(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, opacity: f64) {
        self.body.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="{:.3}"/>"#,
            x, y, w, h, fill, opacity
        ));
        self.body.push('\n');
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
        self.body.push_str(&format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}"/>"#,
            x1, y1, x2, y2, color, width
        ));
        self.body.push('\n');
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str, opacity: f64) {
        self.body.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" fill-opacity="{:.2}"/>"#,
            cx, cy, r, fill, opacity
        ));
        self.body.push('\n');
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, font: &Font) {
        let weight = if font.bold { r#" font-weight="bold""# } else { "" };
        let transform = font
            .rotate
            .map(|deg| format!(r#" transform="rotate({:.1} {:.2} {:.2})""#, deg, x, y))
            .unwrap_or_default();
        self.body.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{:.1}" text-anchor="{}" dominant-baseline="middle" fill="{}"{}{}>{}</text>"#,
            x,
            y,
            font.size,
            font.anchor.as_str(),
            font.color,
            weight,
            transform,
            escape_xml(content)
        ));
        self.body.push('\n');
    }

    /// Complete SVG document text
    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

/// Rough rendered width of `text` at `size` px, for layout margins
pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * 0.6
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_escaped() {
        let mut doc = SvgDocument::new(10, 10);
        doc.text(1.0, 1.0, "a < b & c", &Font::new(10.0));
        let svg = doc.finish();
        assert!(svg.contains("a &lt; b &amp; c"));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_zero_width_stroke_is_omitted() {
        let mut doc = SvgDocument::new(10, 10);
        doc.rect(0.0, 0.0, 1.0, 1.0, "#000000", Some(("grey", 0.0)));
        assert!(!doc.finish().contains("stroke="));
    }
}
