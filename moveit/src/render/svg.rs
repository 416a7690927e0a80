use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use svg_fmt::{line_segment, rectangle, rgb, text, BeginSvg, Color, EndSvg, Fill, Stroke};

use super::{Rgb, Shape, TimelineLayout, BLACK};
use crate::error::{MoveitError, Result};

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        rgb(c.r, c.g, c.b)
    }
}

/// Dashed straight line; `svg_fmt` has no dash support of its own.
struct DashedLine {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    color: Rgb,
}

impl fmt::Display for DashedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<path d="M {} {} L {} {}" style="fill:none;stroke:rgb({},{},{});stroke-width:1;stroke-dasharray:5,5" />"#,
            self.x1, self.y1, self.x2, self.y2, self.color.r, self.color.g, self.color.b
        )
    }
}

fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Write `layout` as an SVG document.
pub fn write_svg<W: Write>(layout: &TimelineLayout, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        BeginSvg {
            w: layout.width,
            h: layout.height
        }
    )?;

    for shape in &layout.shapes {
        match shape {
            Shape::Rect {
                x,
                y,
                w,
                h,
                fill,
                stroke,
                radius,
            } => {
                let stroke = match stroke {
                    Some(color) => Stroke::Color((*color).into(), 1.0),
                    None => Stroke::None,
                };
                writeln!(
                    out,
                    "    {}",
                    rectangle(*x, *y, *w, *h)
                        .fill(Fill::Color((*fill).into()))
                        .stroke(stroke)
                        .border_radius(*radius)
                )?;
            }
            Shape::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                dashed: true,
            } => {
                writeln!(
                    out,
                    "    {}",
                    DashedLine {
                        x1: *x1,
                        y1: *y1,
                        x2: *x2,
                        y2: *y2,
                        color: *color,
                    }
                )?;
            }
            Shape::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                dashed: false,
            } => {
                writeln!(
                    out,
                    "    {}",
                    line_segment(*x1, *y1, *x2, *y2)
                        .color((*color).into())
                        .width(1.0)
                )?;
            }
            Shape::Text {
                x,
                y,
                content,
                size,
            } => {
                writeln!(
                    out,
                    "    {}",
                    text(*x, *y, escape_xml(content)).size(*size).color(BLACK.into())
                )?;
            }
        }
    }

    writeln!(out, "{}", EndSvg)?;
    Ok(())
}

/// Write `layout` to `path`, replacing any existing file.
pub fn write_svg_file(layout: &TimelineLayout, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| MoveitError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_svg(layout, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| MoveitError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::WHITE;

    fn sample_layout() -> TimelineLayout {
        let mut layout = TimelineLayout::new(100.0, 50.0);
        layout.push(Shape::Rect {
            x: 0.0,
            y: 0.0,
            w: 100.0,
            h: 50.0,
            fill: WHITE,
            stroke: None,
            radius: 0.0,
        });
        layout.push(Shape::Line {
            x1: 10.0,
            y1: 0.0,
            x2: 10.0,
            y2: 50.0,
            color: BLACK,
            dashed: true,
        });
        layout.push(Shape::Text {
            x: 5.0,
            y: 20.0,
            content: "a&b <c>".to_string(),
            size: 14.0,
        });
        layout
    }

    #[test]
    fn test_write_svg_document() {
        let mut out = Vec::new();
        write_svg(&sample_layout(), &mut out).unwrap();
        let doc = String::from_utf8(out).unwrap();

        assert!(doc.contains("<svg"));
        assert!(doc.trim_end().ends_with("</svg>"));
        assert!(doc.contains("stroke-dasharray:5,5"));
        assert!(doc.contains("a&amp;b &lt;c&gt;"));
        assert!(!doc.contains("a&b"));
    }

    #[test]
    fn test_write_svg_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        write_svg_file(&sample_layout(), &path).unwrap();
        let doc = std::fs::read_to_string(&path).unwrap();
        assert!(doc.contains("<svg"));
    }

    #[test]
    fn test_write_svg_file_bad_directory() {
        let err = write_svg_file(&sample_layout(), Path::new("/no/such/dir/chart.svg")).unwrap_err();
        assert!(matches!(err, MoveitError::Io { .. }));
    }

    #[test]
    fn test_colors_reach_the_document() {
        let mut layout = TimelineLayout::new(10.0, 10.0);
        layout.push(Shape::Rect {
            x: 0.0,
            y: 0.0,
            w: 10.0,
            h: 10.0,
            fill: Rgb::new(0x51, 0xA3, 0x51),
            stroke: Some(BLACK),
            radius: 0.0,
        });
        layout.push(Shape::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 10.0,
            y2: 0.0,
            color: Rgb::new(1, 2, 3),
            dashed: true,
        });
        let mut out = Vec::new();
        write_svg(&layout, &mut out).unwrap();
        let doc = String::from_utf8(out).unwrap();
        assert!(doc.contains("fill:rgb(81,163,81)"));
        assert!(doc.contains("stroke:rgb(1,2,3)"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("plain"), "plain");
        assert_eq!(escape_xml("\"q\" & 'a'"), "&quot;q&quot; &amp; &apos;a&apos;");
    }
}
