//! 2D drawing surface for the visualization engine.
//!
//! `Canvas` is a fixed-size pixel-space surface that records drawing
//! primitives; `to_svg` serializes the recording for the SPA. `Viewport`
//! maps a logical coordinate window onto the padded pixel area (y flipped),
//! which is where all the graph renderers do their coordinate transforms.

/// Horizontal anchoring for text labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
  Start,
  Middle,
  End,
}

impl Anchor {
  fn as_svg(&self) -> &'static str {
    match self {
      Anchor::Start => "start",
      Anchor::Middle => "middle",
      Anchor::End => "end",
    }
  }
}

#[derive(Clone, Debug)]
enum Shape {
  Line { x1: f64, y1: f64, x2: f64, y2: f64, color: String, width: f64, dashed: bool },
  Polyline { points: Vec<(f64, f64)>, color: String, width: f64 },
  Circle { cx: f64, cy: f64, r: f64, color: String },
  /// Soft radial glow: solid at the center fading to transparent at `r`.
  Halo { cx: f64, cy: f64, r: f64, color: String },
  Polygon { points: Vec<(f64, f64)>, fill: String, opacity: f64 },
  Text { x: f64, y: f64, text: String, color: String, size: f64, bold: bool, anchor: Anchor },
}

/// Recording drawing surface of known pixel width/height.
#[derive(Clone, Debug)]
pub struct Canvas {
  width: f64,
  height: f64,
  shapes: Vec<Shape>,
}

impl Canvas {
  pub fn new(width: f64, height: f64) -> Self {
    Self { width, height, shapes: Vec::new() }
  }

  pub fn width(&self) -> f64 { self.width }
  pub fn height(&self) -> f64 { self.height }

  /// Number of recorded primitives. Lets callers (and tests) tell an empty
  /// render from a populated one.
  pub fn shape_count(&self) -> usize { self.shapes.len() }
  pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

  pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
    self.shapes.push(Shape::Line { x1, y1, x2, y2, color: color.into(), width, dashed: false });
  }

  pub fn dashed_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
    self.shapes.push(Shape::Line { x1, y1, x2, y2, color: color.into(), width, dashed: true });
  }

  pub fn polyline(&mut self, points: Vec<(f64, f64)>, color: &str, width: f64) {
    if points.len() >= 2 {
      self.shapes.push(Shape::Polyline { points, color: color.into(), width });
    }
  }

  pub fn circle(&mut self, cx: f64, cy: f64, r: f64, color: &str) {
    self.shapes.push(Shape::Circle { cx, cy, r, color: color.into() });
  }

  pub fn halo(&mut self, cx: f64, cy: f64, r: f64, color: &str) {
    self.shapes.push(Shape::Halo { cx, cy, r, color: color.into() });
  }

  pub fn fill_polygon(&mut self, points: Vec<(f64, f64)>, fill: &str, opacity: f64) {
    if points.len() >= 3 {
      self.shapes.push(Shape::Polygon { points, fill: fill.into(), opacity });
    }
  }

  pub fn text(&mut self, x: f64, y: f64, text: &str, color: &str, size: f64, anchor: Anchor) {
    self.shapes.push(Shape::Text {
      x, y, text: text.into(), color: color.into(), size, bold: false, anchor,
    });
  }

  pub fn bold_text(&mut self, x: f64, y: f64, text: &str, color: &str, size: f64, anchor: Anchor) {
    self.shapes.push(Shape::Text {
      x, y, text: text.into(), color: color.into(), size, bold: true, anchor,
    });
  }

  /// Serialize the recording as a standalone SVG document.
  pub fn to_svg(&self) -> String {
    let mut defs = String::new();
    let mut body = String::new();
    let mut halo_idx = 0usize;

    for shape in &self.shapes {
      match shape {
        Shape::Line { x1, y1, x2, y2, color, width, dashed } => {
          let dash = if *dashed { " stroke-dasharray=\"5,5\"" } else { "" };
          body.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"{}\"{}/>",
            x1, y1, x2, y2, color, width, dash
          ));
        }
        Shape::Polyline { points, color, width } => {
          let pts: Vec<String> = points.iter().map(|(x, y)| format!("{:.1},{:.1}", x, y)).collect();
          body.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            pts.join(" "),
            color,
            width
          ));
        }
        Shape::Circle { cx, cy, r, color } => {
          body.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{}\" fill=\"{}\"/>",
            cx, cy, r, color
          ));
        }
        Shape::Halo { cx, cy, r, color } => {
          let id = format!("halo{}", halo_idx);
          halo_idx += 1;
          defs.push_str(&format!(
            "<radialGradient id=\"{id}\"><stop offset=\"0%\" stop-color=\"{color}\" stop-opacity=\"0.5\"/><stop offset=\"100%\" stop-color=\"{color}\" stop-opacity=\"0\"/></radialGradient>"
          ));
          body.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{}\" fill=\"url(#{})\"/>",
            cx, cy, r, id
          ));
        }
        Shape::Polygon { points, fill, opacity } => {
          let pts: Vec<String> = points.iter().map(|(x, y)| format!("{:.1},{:.1}", x, y)).collect();
          body.push_str(&format!(
            "<polygon points=\"{}\" fill=\"{}\" fill-opacity=\"{}\"/>",
            pts.join(" "),
            fill,
            opacity
          ));
        }
        Shape::Text { x, y, text, color, size, bold, anchor } => {
          let weight = if *bold { " font-weight=\"bold\"" } else { "" };
          body.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"{}\" font-family=\"Inter, sans-serif\" text-anchor=\"{}\"{}>{}</text>",
            x, y, color, size, anchor.as_svg(), weight, escape_xml(text)
          ));
        }
      }
    }

    format!(
      "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.0} {h:.0}\"><defs>{defs}</defs>{body}</svg>",
      w = self.width,
      h = self.height,
    )
  }
}

fn escape_xml(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
}

/// Logical→pixel transform over a padded drawing area.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
  pub x_min: f64,
  pub x_max: f64,
  pub y_min: f64,
  pub y_max: f64,
  pub padding: f64,
  width: f64,
  height: f64,
}

impl Viewport {
  pub fn new(canvas: &Canvas, x_min: f64, x_max: f64, y_min: f64, y_max: f64, padding: f64) -> Self {
    Self { x_min, x_max, y_min, y_max, padding, width: canvas.width(), height: canvas.height() }
  }

  fn x_scale(&self) -> f64 {
    (self.width - 2.0 * self.padding) / (self.x_max - self.x_min)
  }

  fn y_scale(&self) -> f64 {
    (self.height - 2.0 * self.padding) / (self.y_max - self.y_min)
  }

  pub fn px_x(&self, x: f64) -> f64 {
    self.padding + (x - self.x_min) * self.x_scale()
  }

  /// Pixel y grows downward, logical y grows upward.
  pub fn px_y(&self, y: f64) -> f64 {
    self.height - self.padding - (y - self.y_min) * self.y_scale()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn viewport_maps_corners_to_padded_pixel_area() {
    let canvas = Canvas::new(700.0, 400.0);
    let vp = Viewport::new(&canvas, -1.0, 6.0, -2.0, 8.0, 50.0);
    assert!((vp.px_x(-1.0) - 50.0).abs() < 1e-9);
    assert!((vp.px_x(6.0) - 650.0).abs() < 1e-9);
    // Logical top maps to pixel top (y flipped).
    assert!((vp.px_y(8.0) - 50.0).abs() < 1e-9);
    assert!((vp.px_y(-2.0) - 350.0).abs() < 1e-9);
  }

  #[test]
  fn svg_output_contains_recorded_shapes() {
    let mut canvas = Canvas::new(100.0, 100.0);
    canvas.line(0.0, 0.0, 100.0, 100.0, "#667eea", 3.0);
    canvas.halo(50.0, 50.0, 20.0, "#667eea");
    canvas.bold_text(50.0, 40.0, "x = 4", "#667eea", 16.0, Anchor::Middle);
    let svg = canvas.to_svg();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("<line"));
    assert!(svg.contains("radialGradient"));
    assert!(svg.contains("x = 4"));
    assert!(svg.contains("font-weight=\"bold\""));
  }

  #[test]
  fn labels_are_xml_escaped() {
    let mut canvas = Canvas::new(10.0, 10.0);
    canvas.text(1.0, 1.0, "a < b & c", "#000", 12.0, Anchor::Start);
    assert!(canvas.to_svg().contains("a &lt; b &amp; c"));
  }

  #[test]
  fn degenerate_polylines_are_ignored() {
    let mut canvas = Canvas::new(10.0, 10.0);
    canvas.polyline(vec![(1.0, 1.0)], "#000", 1.0);
    assert!(canvas.is_empty());
  }
}
