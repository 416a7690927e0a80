//! Drawing primitives and the SVG sink.
//!
//! The timeline layout is computed as a flat list of [`Shape`]s; this module
//! only knows how to turn that list into a document.

pub mod svg;

pub use svg::{write_svg, write_svg_file};

use crate::error::{MoveitError, Result};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Fill color of the page and of label boxes.
pub const WHITE: Rgb = Rgb::new(255, 255, 255);

/// Stroke color of borders, grid and labels.
pub const BLACK: Rgb = Rgb::new(0, 0, 0);

/// A single drawing primitive, in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fill: Rgb,
        stroke: Option<Rgb>,
        radius: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb,
        dashed: bool,
    },
    Text {
        x: f32,
        y: f32,
        content: String,
        size: f32,
    },
}

/// A complete chart: document size plus shapes in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayout {
    pub width: f32,
    pub height: f32,
    pub shapes: Vec<Shape>,
}

impl TimelineLayout {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Text items, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }
}

/// Parse a `#RRGGBB` color.
pub fn parse_hex_color(hex: &str) -> Result<Rgb> {
    let digits = hex
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(|| MoveitError::Config(format!("invalid color '{}', expected #RRGGBB", hex)))?;

    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|e| MoveitError::Config(format!("invalid color '{}': {}", hex, e)))
    };

    Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Fixed set of node colors; indices past the end wrap around.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette(Vec<Rgb>);

impl Palette {
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self> {
        let parsed = colors
            .iter()
            .map(|c| parse_hex_color(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        if parsed.is_empty() {
            return Err(MoveitError::Config("palette is empty".to_string()));
        }
        Ok(Self(parsed))
    }

    pub fn color(&self, index: usize) -> Rgb {
        self.0[index % self.0.len()]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        let c = parse_hex_color("#51A351").unwrap();
        assert_eq!(c, Rgb::new(0x51, 0xA3, 0x51));
        assert_eq!(parse_hex_color("#ffffff").unwrap(), WHITE);
    }

    #[test]
    fn test_parse_hex_color_rejects_garbage() {
        assert!(parse_hex_color("51A351").is_err());
        assert!(parse_hex_color("#51A35").is_err());
        assert!(parse_hex_color("#GGGGGG").is_err());
        assert!(parse_hex_color("#é1A351").is_err());
    }

    #[test]
    fn test_palette_wraps() {
        let palette = Palette::from_hex(&["#000000", "#FFFFFF"]).unwrap();
        assert_eq!(palette.color(0), BLACK);
        assert_eq!(palette.color(2), BLACK);
        assert_eq!(palette.color(5), WHITE);
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn test_shapes_are_debug_printable() {
        let shape = Shape::Rect {
            x: 0.0,
            y: 0.0,
            w: 1.0,
            h: 1.0,
            fill: Rgb::new(1, 2, 3),
            stroke: Some(BLACK),
            radius: 0.0,
        };
        let printed = format!("{:?}", shape);
        assert!(printed.contains("Rgb { r: 1, g: 2, b: 3 }"));
    }

    #[test]
    fn test_empty_palette_rejected() {
        let empty: [&str; 0] = [];
        assert!(Palette::from_hex(&empty).is_err());
    }
}
