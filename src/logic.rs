//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Submitting a problem through the solve orchestration
//!   - Rendering a visualization spec to SVG
//!   - History/progress snapshots and level changes

use tracing::{debug, instrument};

use crate::domain::{LearningLevel, RecentProblem, VisualizationSpec};
use crate::error::SolveError;
use crate::protocol::{to_solution_out, ProgressOut, SolutionOut};
use crate::state::AppState;
use crate::viz::{default_canvas_size, render, Canvas};

#[instrument(level = "info", skip(state, text, image_base64), fields(text_len = text.len()))]
pub async fn do_solve(
  state: &AppState,
  text: &str,
  image_base64: Option<String>,
) -> Result<SolutionOut, SolveError> {
  let outcome = state.submit_problem(text, image_base64).await?;
  let level = state.level().await;
  Ok(to_solution_out(&outcome, level))
}

/// Render one visualization spec into a fresh canvas and serialize it.
/// Unknown kinds produce an empty (but valid) SVG document.
#[instrument(level = "info", skip(state, spec), fields(kind = ?spec.kind))]
pub async fn do_render_visualization(
  state: &AppState,
  spec: &VisualizationSpec,
  width: Option<f64>,
  height: Option<f64>,
) -> String {
  let (dw, dh) = default_canvas_size(spec.kind);
  let mut canvas = Canvas::new(width.unwrap_or(dw), height.unwrap_or(dh));
  let level = state.level().await;
  render(spec, level, &mut canvas);
  debug!(target: "solve", shapes = canvas.shape_count(), "Visualization rendered");
  canvas.to_svg()
}

#[instrument(level = "debug", skip(state))]
pub async fn do_history(state: &AppState) -> Vec<RecentProblem> {
  state.recent_problems().await
}

#[instrument(level = "debug", skip(state))]
pub async fn do_progress(state: &AppState) -> ProgressOut {
  let (problems_solved, concept_mastery) = state.progress().await;
  ProgressOut { problems_solved, concept_mastery }
}

#[instrument(level = "info", skip(state))]
pub async fn do_set_level(state: &AppState, level: LearningLevel) -> LearningLevel {
  state.set_level(level).await;
  level
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Prompts;
  use crate::domain::VizKind;
  use serde_json::json;

  fn offline_state() -> AppState {
    AppState::with_parts(None, Prompts::default())
  }

  #[tokio::test]
  async fn solve_resolves_explanations_for_the_session_level() {
    let state = offline_state();
    state.set_level(LearningLevel::Kid).await;
    let out = do_solve(&state, "2x + 5 = 13", None).await.unwrap();
    assert_eq!(out.explanations[0].explanation, out.solution.steps[0].kid_explanation);
  }

  #[tokio::test]
  async fn visualization_round_trips_to_svg() {
    let state = offline_state();
    let spec = VisualizationSpec {
      kind: VizKind::NumberLine,
      data: json!({ "solution": 4, "range": [-2, 10] }),
    };
    let svg = do_render_visualization(&state, &spec, None, None).await;
    assert!(svg.contains("x = 4"));

    // Client-supplied surface size is honored.
    let svg = do_render_visualization(&state, &spec, Some(350.0), Some(100.0)).await;
    assert!(svg.contains("width=\"350\""));
  }
}
