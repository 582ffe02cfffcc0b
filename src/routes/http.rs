//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs include parameters and basic result info.

use std::sync::Arc;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, instrument, warn};

use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.len(), has_image = body.image_base64.is_some()))]
pub async fn http_post_solve(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SolveIn>,
) -> impl IntoResponse {
  match do_solve(&state, &body.text, body.image_base64).await {
    Ok(out) => {
      info!(target: "solve", source = ?out.source, steps = out.solution.steps.len(), "HTTP solve served");
      Json(out).into_response()
    }
    Err(e) => {
      // Only blank input reaches here; everything else degrades internally.
      warn!(target: "solve", error = %e, "HTTP solve rejected");
      (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
    }
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let problems = do_history(&state).await;
  info!(target: "solve", count = problems.len(), "HTTP history served");
  Json(HistoryOut { problems })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_progress(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(do_progress(&state).await)
}

#[instrument(level = "info", skip(state), fields(level = %body.level.as_str()))]
pub async fn http_post_level(
  State(state): State<Arc<AppState>>,
  Json(body): Json<LevelIn>,
) -> impl IntoResponse {
  let level = do_set_level(&state, body.level).await;
  Json(LevelOut { level })
}

#[instrument(level = "info", skip(state, body), fields(kind = ?body.spec.kind))]
pub async fn http_post_visualization(
  State(state): State<Arc<AppState>>,
  Json(body): Json<VisualizationIn>,
) -> impl IntoResponse {
  let svg = do_render_visualization(&state, &body.spec, body.width, body.height).await;
  Json(VisualizationOut { svg })
}
