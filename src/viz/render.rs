//! Per-type visualization algorithms.
//!
//! Each renderer draws into a `Canvas` using the fixed logical windows and
//! demo curves below. The `equation`/`original`/`derivative` string fields
//! in the specs are intentionally not plotted; only the numeric parameters
//! (solution, roots, vertex, point, limits) parameterize the drawing.
//! Unknown kinds, or known kinds with unusable parameters, log a warning and
//! draw nothing — a skipped visualization never blocks the explanations.

use serde_json::Value;
use tracing::warn;

use crate::domain::{LearningLevel, VisualizationSpec, VizKind};

use super::canvas::{Anchor, Canvas, Viewport};

// Palette shared by all renderers.
const PRIMARY: &str = "#667eea";
const TEXT: &str = "#374151";
const AXIS: &str = "#9ca3af";
const GRID: &str = "#e5e7eb";
const ACCENT_RED: &str = "#ef4444";
const ACCENT_GREEN: &str = "#10b981";
const ACCENT_AMBER: &str = "#f59e0b";

const PADDING: f64 = 50.0;

/// Widest `range` span a number line will draw. Ticks land on every integer,
/// so the span bounds the work done per request; anything wider is unusable
/// on a 700px surface anyway.
const NUMBER_LINE_MAX_SPAN: f64 = 200.0;

/// Natural pixel size for a visualization of the given kind.
pub fn default_canvas_size(kind: VizKind) -> (f64, f64) {
  match kind {
    VizKind::NumberLine => (700.0, 150.0),
    VizKind::BalanceScale => (700.0, 300.0),
    _ => (700.0, 400.0),
  }
}

/// Render one visualization spec into the canvas. Never fails; for
/// unsupported kinds it logs and leaves the canvas untouched.
pub fn render(spec: &VisualizationSpec, _level: LearningLevel, canvas: &mut Canvas) {
  match spec.kind {
    VizKind::NumberLine => number_line(&spec.data, canvas),
    VizKind::BalanceScale => balance_scale(&spec.data, canvas),
    VizKind::Parabola => parabola(&spec.data, canvas),
    VizKind::DerivativeGraph => derivative_graph(&spec.data, canvas),
    VizKind::IntegralArea => integral_area(&spec.data, canvas),
    other => {
      warn!(target: "solve", kind = ?other, "No renderer for visualization type; skipping");
    }
  }
}

/// Exact area under the demo curve x² + 2x over [a, b], via the closed-form
/// antiderivative F(x) = x³/3 + x².
pub fn integral_area_value(a: f64, b: f64) -> f64 {
  let f = |x: f64| x.powi(3) / 3.0 + x.powi(2);
  f(b) - f(a)
}

// --- Parameter extraction ---

fn get_f64(data: &Value, key: &str) -> Option<f64> {
  data.get(key).and_then(Value::as_f64)
}

fn get_pair(data: &Value, key: &str) -> Option<(f64, f64)> {
  let arr = data.get(key)?.as_array()?;
  match (arr.first().and_then(Value::as_f64), arr.get(1).and_then(Value::as_f64)) {
    (Some(a), Some(b)) => Some((a, b)),
    _ => None,
  }
}

fn get_f64_list(data: &Value, key: &str) -> Vec<f64> {
  data
    .get(key)
    .and_then(Value::as_array)
    .map(|a| a.iter().filter_map(Value::as_f64).collect())
    .unwrap_or_default()
}

/// Format a graph label number without a trailing ".0" for whole values.
fn fmt_num(v: f64) -> String {
  if (v - v.round()).abs() < 1e-9 {
    format!("{}", v.round() as i64)
  } else {
    format!("{}", v)
  }
}

// --- Number line ---

fn number_line(data: &Value, canvas: &mut Canvas) {
  let Some(solution) = get_f64(data, "solution") else {
    warn!(target: "solve", "number-line spec is missing 'solution'; skipping");
    return;
  };
  let (min, max) = get_pair(data, "range").unwrap_or((solution - 5.0, solution + 5.0));
  if max <= min {
    warn!(target: "solve", min, max, "number-line range is empty; skipping");
    return;
  }
  // Parameters come from the AI boundary or straight off the wire; an
  // oversized span must not translate into unbounded ticks.
  if max - min > NUMBER_LINE_MAX_SPAN {
    warn!(target: "solve", min, max, "number-line range is too wide to draw; skipping");
    return;
  }

  let width = canvas.width();
  let line_y = canvas.height() / 2.0;
  let scale = (width - 2.0 * PADDING) / (max - min);
  let to_px = |v: f64| PADDING + (v - min) * scale;

  canvas.line(PADDING, line_y, width - PADDING, line_y, PRIMARY, 3.0);

  // Ticks at every integer in range.
  let mut tick = min.ceil() as i64;
  while tick as f64 <= max {
    let x = to_px(tick as f64);
    canvas.line(x, line_y - 10.0, x, line_y + 10.0, PRIMARY, 3.0);
    canvas.text(x, line_y + 30.0, &tick.to_string(), TEXT, 14.0, Anchor::Middle);
    tick += 1;
  }

  // Highlighted solution point with a soft glow.
  let sx = to_px(solution);
  canvas.halo(sx, line_y, 20.0, PRIMARY);
  canvas.circle(sx, line_y, 8.0, PRIMARY);
  canvas.bold_text(sx, line_y - 25.0, &format!("x = {}", fmt_num(solution)), PRIMARY, 16.0, Anchor::Middle);
}

// --- Balance scale ---

fn balance_scale(data: &Value, canvas: &mut Canvas) {
  let labels: Vec<String> = data
    .get("steps")
    .and_then(Value::as_array)
    .map(|a| {
      a.iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .collect()
    })
    .unwrap_or_default();

  let cx = canvas.width() / 2.0;
  let cy = canvas.height() / 2.0;

  // Base: post and foot.
  canvas.fill_polygon(
    vec![(cx - 10.0, cy + 50.0), (cx + 10.0, cy + 50.0), (cx + 10.0, cy + 150.0), (cx - 10.0, cy + 150.0)],
    TEXT,
    1.0,
  );
  canvas.fill_polygon(
    vec![(cx - 50.0, cy + 150.0), (cx + 50.0, cy + 150.0), (cx + 50.0, cy + 170.0), (cx - 50.0, cy + 170.0)],
    TEXT,
    1.0,
  );

  // Beam and fulcrum.
  canvas.line(cx - 150.0, cy, cx + 150.0, cy, PRIMARY, 4.0);
  canvas.fill_polygon(
    vec![(cx - 20.0, cy + 50.0), (cx + 20.0, cy + 50.0), (cx, cy)],
    PRIMARY,
    1.0,
  );

  // Pans on each side.
  let pan_y = cy + 20.0;
  for pan_x in [cx - 120.0, cx + 120.0] {
    canvas.polyline(
      vec![
        (pan_x - 60.0, pan_y),
        (pan_x - 50.0, pan_y + 10.0),
        (pan_x + 50.0, pan_y + 10.0),
        (pan_x + 60.0, pan_y),
      ],
      PRIMARY,
      2.0,
    );
  }

  // First two meaningful labels land on the pans. Purely illustrative: the
  // scale is always drawn level regardless of the expressions.
  if let Some(left) = labels.first() {
    canvas.bold_text(cx - 120.0, pan_y + 40.0, left, PRIMARY, 18.0, Anchor::Middle);
  }
  if let Some(right) = labels.get(1) {
    canvas.bold_text(cx + 120.0, pan_y + 40.0, right, PRIMARY, 18.0, Anchor::Middle);
  }

  canvas.text(cx, cy - 30.0, "Balanced ⚖️", ACCENT_GREEN, 14.0, Anchor::Middle);
}

// --- Shared graph scaffolding ---

fn draw_axes(canvas: &mut Canvas, vp: &Viewport) {
  let (w, h) = (canvas.width(), canvas.height());
  canvas.line(PADDING, vp.px_y(0.0), w - PADDING, vp.px_y(0.0), AXIS, 2.0);
  canvas.line(vp.px_x(0.0), PADDING, vp.px_x(0.0), h - PADDING, AXIS, 2.0);
}

fn draw_grid(canvas: &mut Canvas, vp: &Viewport) {
  let (w, h) = (canvas.width(), canvas.height());
  let mut x = vp.x_min.ceil();
  while x <= vp.x_max {
    canvas.line(vp.px_x(x), PADDING, vp.px_x(x), h - PADDING, GRID, 1.0);
    x += 1.0;
  }
  let mut y = vp.y_min.ceil();
  while y <= vp.y_max {
    canvas.line(PADDING, vp.px_y(y), w - PADDING, vp.px_y(y), GRID, 1.0);
    y += 1.0;
  }
}

fn sample_curve(vp: &Viewport, step: f64, f: impl Fn(f64) -> f64) -> Vec<(f64, f64)> {
  let mut points = Vec::new();
  let mut x = vp.x_min;
  while x <= vp.x_max + 1e-9 {
    points.push((vp.px_x(x), vp.px_y(f(x))));
    x += step;
  }
  points
}

// --- Parabola ---

fn parabola(data: &Value, canvas: &mut Canvas) {
  let roots = get_f64_list(data, "roots");
  let vertex = get_pair(data, "vertex");

  let vp = Viewport::new(canvas, -1.0, 6.0, -2.0, 8.0, PADDING);
  draw_axes(canvas, &vp);
  draw_grid(canvas, &vp);

  // Demo quadratic; the `equation` string is not parsed.
  let curve = sample_curve(&vp, 0.1, |x| x * x - 5.0 * x + 6.0);
  canvas.polyline(curve, PRIMARY, 3.0);

  for root in roots {
    let (x, y) = (vp.px_x(root), vp.px_y(0.0));
    canvas.halo(x, y, 15.0, ACCENT_RED);
    canvas.circle(x, y, 6.0, ACCENT_RED);
    canvas.bold_text(x, y - 15.0, &format!("x = {}", fmt_num(root)), ACCENT_RED, 14.0, Anchor::Middle);
  }

  if let Some((vx, vy)) = vertex {
    let (x, y) = (vp.px_x(vx), vp.px_y(vy));
    canvas.circle(x, y, 6.0, ACCENT_GREEN);
    canvas.bold_text(
      x,
      y - 15.0,
      &format!("Vertex ({}, {})", fmt_num(vx), fmt_num(vy)),
      ACCENT_GREEN,
      14.0,
      Anchor::Middle,
    );
  }

  canvas.text(canvas.width() - PADDING + 20.0, vp.px_y(0.0) + 5.0, "x", TEXT, 14.0, Anchor::Middle);
  canvas.text(vp.px_x(0.0) - 20.0, PADDING - 10.0, "y", TEXT, 14.0, Anchor::Middle);
}

// --- Derivative graph ---

fn derivative_graph(data: &Value, canvas: &mut Canvas) {
  let Some(point) = get_f64(data, "point") else {
    warn!(target: "solve", "derivative-graph spec is missing 'point'; skipping");
    return;
  };

  let vp = Viewport::new(canvas, -2.0, 2.0, -5.0, 10.0, PADDING);
  draw_axes(canvas, &vp);

  // Demo cubic f(x) = x³ + 2x; the `original`/`derivative` strings are not parsed.
  let f = |x: f64| x.powi(3) + 2.0 * x;
  canvas.polyline(sample_curve(&vp, 0.05, f), PRIMARY, 3.0);

  // Tangent at the requested point: f'(x) = 3x² + 2.
  let fx = f(point);
  let slope = 3.0 * point * point + 2.0;
  let (x0, x1) = (point - 1.0, point + 1.0);
  canvas.dashed_line(
    vp.px_x(x0),
    vp.px_y(fx + slope * (x0 - point)),
    vp.px_x(x1),
    vp.px_y(fx + slope * (x1 - point)),
    ACCENT_AMBER,
    2.0,
  );

  canvas.circle(vp.px_x(point), vp.px_y(fx), 6.0, ACCENT_RED);

  canvas.bold_text(PADDING + 10.0, PADDING + 20.0, "f(x) = x³ + 2x", PRIMARY, 14.0, Anchor::Start);
  canvas.bold_text(
    PADDING + 10.0,
    PADDING + 40.0,
    &format!("Tangent at x={}", fmt_num(point)),
    ACCENT_AMBER,
    14.0,
    Anchor::Start,
  );
  canvas.bold_text(
    PADDING + 10.0,
    PADDING + 60.0,
    &format!("Slope = {}", fmt_num(slope)),
    ACCENT_AMBER,
    14.0,
    Anchor::Start,
  );
}

// --- Integral area ---

fn integral_area(data: &Value, canvas: &mut Canvas) {
  let Some((a, b)) = get_pair(data, "limits") else {
    warn!(target: "solve", "integral-area spec is missing 'limits'; skipping");
    return;
  };

  let vp = Viewport::new(canvas, -1.0, 3.0, -1.0, 10.0, PADDING);

  // Clamp untrusted limits to the fixed logical window so the shaded-region
  // sampling stays bounded no matter what the request carries.
  let (a, b) = (a.clamp(vp.x_min, vp.x_max), b.clamp(vp.x_min, vp.x_max));
  if b <= a {
    warn!(target: "solve", a, b, "integral-area limits are empty after clamping; skipping");
    return;
  }

  draw_axes(canvas, &vp);

  // Demo curve f(x) = x² + 2x.
  let f = |x: f64| x * x + 2.0 * x;

  // Shaded region between the curve and the x-axis over [a, b].
  let mut region = vec![(vp.px_x(a), vp.px_y(0.0))];
  let mut x = a;
  while x <= b + 1e-9 {
    region.push((vp.px_x(x), vp.px_y(f(x))));
    x += 0.05;
  }
  region.push((vp.px_x(b), vp.px_y(0.0)));
  canvas.fill_polygon(region, PRIMARY, 0.3);

  canvas.polyline(sample_curve(&vp, 0.05, f), PRIMARY, 3.0);

  // Dashed boundaries at the limits.
  canvas.dashed_line(vp.px_x(a), vp.px_y(0.0), vp.px_x(a), vp.px_y(f(a)), ACCENT_RED, 2.0);
  canvas.dashed_line(vp.px_x(b), vp.px_y(0.0), vp.px_x(b), vp.px_y(f(b)), ACCENT_RED, 2.0);

  canvas.bold_text(PADDING + 10.0, PADDING + 20.0, "f(x) = x² + 2x", PRIMARY, 14.0, Anchor::Start);
  canvas.bold_text(vp.px_x(a), canvas.height() - PADDING + 30.0, &format!("a = {}", fmt_num(a)), ACCENT_RED, 14.0, Anchor::Middle);
  canvas.bold_text(vp.px_x(b), canvas.height() - PADDING + 30.0, &format!("b = {}", fmt_num(b)), ACCENT_RED, 14.0, Anchor::Middle);

  let area = integral_area_value(a, b);
  canvas.bold_text(
    canvas.width() / 2.0,
    PADDING + 20.0,
    &format!("Area ≈ {:.2}", area),
    PRIMARY,
    16.0,
    Anchor::Middle,
  );
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn canvas_for(kind: VizKind) -> Canvas {
    let (w, h) = default_canvas_size(kind);
    Canvas::new(w, h)
  }

  fn spec(kind: VizKind, data: Value) -> VisualizationSpec {
    VisualizationSpec { kind, data }
  }

  #[test]
  fn integral_area_matches_the_closed_form() {
    // F(x) = x³/3 + x²; F(2) - F(0) = 8/3 + 4.
    let area = integral_area_value(0.0, 2.0);
    assert!((area - (8.0 / 3.0 + 4.0)).abs() < 1e-9);
    assert_eq!(format!("{:.2}", area), "6.67");
  }

  #[test]
  fn integral_render_labels_the_area_to_two_decimals() {
    let mut canvas = canvas_for(VizKind::IntegralArea);
    render(
      &spec(VizKind::IntegralArea, json!({ "limits": [0, 2] })),
      LearningLevel::School,
      &mut canvas,
    );
    assert!(canvas.to_svg().contains("Area ≈ 6.67"));
  }

  #[test]
  fn number_line_draws_a_tick_per_integer_in_range() {
    let mut canvas = canvas_for(VizKind::NumberLine);
    render(
      &spec(VizKind::NumberLine, json!({ "solution": 4, "range": [-2, 10] })),
      LearningLevel::School,
      &mut canvas,
    );
    let svg = canvas.to_svg();
    // Base line + 13 ticks + 13 tick labels + halo + point + solution label.
    for v in -2..=10 {
      assert!(svg.contains(&format!(">{}</text>", v)), "missing tick label {}", v);
    }
    assert!(svg.contains("x = 4"));
    assert!(svg.contains("radialGradient"));
  }

  #[test]
  fn parabola_marks_roots_and_vertex() {
    let mut canvas = canvas_for(VizKind::Parabola);
    render(
      &spec(
        VizKind::Parabola,
        json!({ "equation": "x^2 - 5x + 6", "roots": [2, 3], "vertex": [2.5, -0.25] }),
      ),
      LearningLevel::School,
      &mut canvas,
    );
    let svg = canvas.to_svg();
    assert!(svg.contains("x = 2"));
    assert!(svg.contains("x = 3"));
    assert!(svg.contains("Vertex (2.5, -0.25)"));
  }

  #[test]
  fn derivative_tangent_slope_is_three_p_squared_plus_two() {
    let mut canvas = canvas_for(VizKind::DerivativeGraph);
    render(
      &spec(VizKind::DerivativeGraph, json!({ "original": "x^3 + 2x", "point": 1 })),
      LearningLevel::School,
      &mut canvas,
    );
    assert!(canvas.to_svg().contains("Slope = 5"));

    let mut canvas = canvas_for(VizKind::DerivativeGraph);
    render(
      &spec(VizKind::DerivativeGraph, json!({ "point": 0 })),
      LearningLevel::School,
      &mut canvas,
    );
    assert!(canvas.to_svg().contains("Slope = 2"));
  }

  #[test]
  fn unsupported_kinds_draw_nothing() {
    for kind in [VizKind::Custom, VizKind::Graph3d, VizKind::VectorField] {
      let mut canvas = Canvas::new(700.0, 400.0);
      render(&spec(kind, json!({})), LearningLevel::School, &mut canvas);
      assert!(canvas.is_empty(), "{:?} should not draw", kind);
    }
  }

  #[test]
  fn known_kind_with_unusable_parameters_skips_quietly() {
    let mut canvas = canvas_for(VizKind::IntegralArea);
    render(&spec(VizKind::IntegralArea, json!({})), LearningLevel::School, &mut canvas);
    assert!(canvas.is_empty());

    let mut canvas = canvas_for(VizKind::NumberLine);
    render(&spec(VizKind::NumberLine, json!({ "range": [0, 5] })), LearningLevel::School, &mut canvas);
    assert!(canvas.is_empty());

    let mut canvas = canvas_for(VizKind::DerivativeGraph);
    render(&spec(VizKind::DerivativeGraph, json!({ "original": "x^3 + 2x" })), LearningLevel::School, &mut canvas);
    assert!(canvas.is_empty());
  }

  #[test]
  fn oversized_number_line_range_is_refused() {
    // Parameters arrive from the wire; the span must not dictate the work.
    let mut canvas = canvas_for(VizKind::NumberLine);
    render(
      &spec(VizKind::NumberLine, json!({ "solution": 0, "range": [0, 3_000_000] })),
      LearningLevel::School,
      &mut canvas,
    );
    assert!(canvas.is_empty());

    // The widest allowed span still draws.
    let mut canvas = canvas_for(VizKind::NumberLine);
    render(
      &spec(VizKind::NumberLine, json!({ "solution": 0, "range": [-100, 100] })),
      LearningLevel::School,
      &mut canvas,
    );
    assert!(!canvas.is_empty());
  }

  #[test]
  fn integral_limits_are_clamped_to_the_window() {
    let mut canvas = canvas_for(VizKind::IntegralArea);
    render(
      &spec(VizKind::IntegralArea, json!({ "limits": [0, 9_999_999] })),
      LearningLevel::School,
      &mut canvas,
    );
    // Sampling runs over the clamped [0, 3] window only.
    assert!(!canvas.is_empty());
    assert!(canvas.shape_count() < 300);
    // F(3) - F(0) = 9 + 9 = 18 on the clamped interval.
    assert!(canvas.to_svg().contains("Area ≈ 18.00"));

    // Limits that clamp to an empty interval draw nothing.
    let mut canvas = canvas_for(VizKind::IntegralArea);
    render(
      &spec(VizKind::IntegralArea, json!({ "limits": [100, 200] })),
      LearningLevel::School,
      &mut canvas,
    );
    assert!(canvas.is_empty());
  }

  #[test]
  fn balance_scale_places_first_two_labels_on_pans() {
    let mut canvas = canvas_for(VizKind::BalanceScale);
    render(
      &spec(VizKind::BalanceScale, json!({ "steps": ["2x+5", "13", "2x", "8"] })),
      LearningLevel::School,
      &mut canvas,
    );
    let svg = canvas.to_svg();
    assert!(svg.contains("2x+5"));
    assert!(svg.contains(">13</text>"));
    assert!(!svg.contains(">8</text>"));
  }
}
