//! Minimal Gemini client for the AI solving path.
//!
//! We only call `:generateContent` and demand a single JSON object back,
//! validated strictly against the Solution contract before anything reaches
//! session state. Calls are instrumented and log model names, latencies, and
//! response sizes (not contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::config::Prompts;
use crate::domain::{ConceptNote, LearningLevel, Solution, SolutionStep, VisualizationSpec, VizKind};
use crate::error::SolveError;
use crate::util::{fill_template, strip_code_fence, trunc_for_log};

#[derive(Clone)]
pub struct GeminiClient {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

impl GeminiClient {
  /// Construct the client if we find GEMINI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("GEMINI_API_KEY").ok()?;
    let base_url = std::env::var("GEMINI_BASE_URL")
      .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta/models".into());
    let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash-exp".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, model })
  }

  /// Solve a problem via the AI endpoint. Single attempt; the orchestrator
  /// falls back on any failure rather than retrying here.
  #[instrument(level = "info", skip(self, prompts, problem), fields(model = %self.model, level = %level.as_str(), problem_len = problem.len()))]
  pub async fn solve(
    &self,
    prompts: &Prompts,
    problem: &str,
    level: LearningLevel,
  ) -> Result<Solution, SolveError> {
    let prompt = build_solver_prompt(prompts, problem, level);

    let start = std::time::Instant::now();
    let text = self.generate_text(&prompt).await;
    let elapsed = start.elapsed();

    let text = match text {
      Ok(t) => {
        info!(?elapsed, reply_len = t.len(), "Model response received");
        t
      }
      Err(e) => {
        error!(?elapsed, error = %e, "Model call failed during solving");
        return Err(e);
      }
    };

    let solution = parse_ai_solution(&text)?;
    info!(
      topic = %solution.topic,
      steps = solution.steps.len(),
      visualizations = solution.visualizations.len(),
      "AI solution validated"
    );
    Ok(solution)
  }

  /// Raw text generation: POST the prompt, extract
  /// `candidates[0].content.parts[0].text`.
  async fn generate_text(&self, prompt: &str) -> Result<String, SolveError> {
    let url = format!("{}/{}:generateContent?key={}", self.base_url, self.model, self.api_key);
    let req = GenerateContentRequest {
      contents: vec![Content { parts: vec![Part { text: prompt.into() }] }],
      generation_config: GenerationConfig {
        temperature: 0.2,
        top_k: 40,
        top_p: 0.95,
        max_output_tokens: 8192,
      },
    };

    let res = self
      .client
      .post(&url)
      .header(CONTENT_TYPE, "application/json")
      .json(&req)
      .send()
      .await
      .map_err(|e| SolveError::ExternalService(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_gemini_error(&body).unwrap_or_else(|| trunc_for_log(&body, 200));
      return Err(SolveError::ExternalService(format!("Gemini HTTP {}: {}", status, msg)));
    }

    let body: GenerateContentResponse = res
      .json()
      .await
      .map_err(|e| SolveError::ExternalService(e.to_string()))?;

    body
      .candidates
      .into_iter()
      .next()
      .and_then(|c| c.content)
      .and_then(|c| c.parts.into_iter().next())
      .and_then(|p| p.text)
      .filter(|t| !t.trim().is_empty())
      .ok_or_else(|| SolveError::ExternalService("No text in Gemini reply".into()))
  }
}

/// Build the solver prompt: problem text plus a level-specific tone
/// directive, demanding the Solution JSON schema back.
pub fn build_solver_prompt(prompts: &Prompts, problem: &str, level: LearningLevel) -> String {
  fill_template(
    &prompts.solver_template,
    &[
      ("problem", problem),
      ("level", level.as_str()),
      ("tone", prompts.tone_for(level)),
    ],
  )
}

/// What the extracted reply text must parse to. The flat
/// `visualizationType`/`visualizationData` pair is folded into
/// `Solution::visualizations` after validation.
#[derive(Deserialize)]
struct AiSolutionReply {
  problem: String,
  #[serde(default)]
  topic: String,
  answer: String,
  steps: Vec<SolutionStep>,
  #[serde(default, rename = "visualizationType")]
  visualization_type: Option<String>,
  #[serde(default, rename = "visualizationData")]
  visualization_data: Option<serde_json::Value>,
  #[serde(default)]
  concepts: Vec<ConceptNote>,
}

/// Parse and validate an AI reply into a Solution.
///
/// Fence wrappers are stripped first; everything after that is strict:
/// unparseable JSON or a reply failing the Solution contract is a
/// `ContractViolation` (the orchestrator falls back on it).
pub fn parse_ai_solution(reply_text: &str) -> Result<Solution, SolveError> {
  let json_text = strip_code_fence(reply_text);

  let reply: AiSolutionReply = serde_json::from_str(json_text)
    .map_err(|e| SolveError::ContractViolation(format!("JSON parse error: {}", e)))?;

  let visualizations = match (reply.visualization_type, reply.visualization_data) {
    (Some(kind_str), Some(data)) => match serde_json::from_value::<VizKind>(serde_json::Value::String(kind_str.clone())) {
      Ok(kind) => {
        // `parameters` is the documented nesting; tolerate a flat object too.
        let data = data.get("parameters").cloned().unwrap_or(data);
        vec![VisualizationSpec { kind, data }]
      }
      Err(_) => {
        // Unknown type only costs us the drawing, never the solution.
        warn!(target: "solve", kind = %kind_str, "Unrecognized visualization type in AI reply; skipping");
        vec![]
      }
    },
    _ => vec![],
  };

  let solution = Solution {
    problem: reply.problem,
    topic: if reply.topic.trim().is_empty() { "Mathematics".into() } else { reply.topic },
    answer: reply.answer,
    steps: reply.steps,
    visualizations,
    concepts: reply.concepts,
  };

  solution
    .check_contract()
    .map_err(SolveError::ContractViolation)?;

  Ok(solution)
}

// --- Wire DTOs ---

#[derive(Serialize)]
struct GenerateContentRequest {
  contents: Vec<Content>,
  #[serde(rename = "generationConfig")]
  generation_config: GenerationConfig,
}
#[derive(Serialize)]
struct Content { parts: Vec<Part> }
#[derive(Serialize)]
struct Part { text: String }
#[derive(Serialize)]
struct GenerationConfig {
  temperature: f32,
  #[serde(rename = "topK")]
  top_k: u32,
  #[serde(rename = "topP")]
  top_p: f32,
  #[serde(rename = "maxOutputTokens")]
  max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}
#[derive(Deserialize)]
struct Candidate {
  #[serde(default)]
  content: Option<CandidateContent>,
}
#[derive(Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<CandidatePart>,
}
#[derive(Deserialize)]
struct CandidatePart {
  #[serde(default)]
  text: Option<String>,
}

/// Try to extract a clean error message from a Gemini error body.
fn extract_gemini_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn well_formed_reply() -> String {
    serde_json::json!({
      "problem": "2x + 5 = 13",
      "topic": "Algebra → Linear Equations",
      "answer": "x = 4",
      "steps": [{
        "number": 1,
        "math": "2x + 5 = 13",
        "concepts": ["linear equation"],
        "kid_explanation": "Find what number x is.",
        "school_explanation": "Isolate x.",
        "engineering_explanation": "Solve via inverse operations."
      }],
      "visualizationType": "number-line",
      "visualizationData": { "parameters": { "solution": 4, "range": [-2, 10] } },
      "concepts": [{
        "name": "Linear Equations",
        "description": "Variable to the first power.",
        "level": "school"
      }]
    })
    .to_string()
  }

  #[test]
  fn fenced_and_unfenced_replies_parse_identically() {
    let raw = well_formed_reply();
    let fenced = format!("```json\n{}\n```", raw);
    let a = parse_ai_solution(&raw).expect("unfenced");
    let b = parse_ai_solution(&fenced).expect("fenced");
    assert_eq!(serde_json::to_value(&a).unwrap(), serde_json::to_value(&b).unwrap());
  }

  #[test]
  fn viz_spec_is_synthesized_from_the_flat_pair() {
    let s = parse_ai_solution(&well_formed_reply()).unwrap();
    assert_eq!(s.visualizations.len(), 1);
    assert_eq!(s.visualizations[0].kind, VizKind::NumberLine);
    // `parameters` nesting is unwrapped.
    assert_eq!(s.visualizations[0].data["solution"], 4);
  }

  #[test]
  fn flat_visualization_data_is_accepted_too() {
    let mut v: serde_json::Value = serde_json::from_str(&well_formed_reply()).unwrap();
    v["visualizationData"] = serde_json::json!({ "solution": 4, "range": [-2, 10] });
    let s = parse_ai_solution(&v.to_string()).unwrap();
    assert_eq!(s.visualizations[0].data["solution"], 4);
  }

  #[test]
  fn missing_visualization_pair_means_no_specs() {
    let mut v: serde_json::Value = serde_json::from_str(&well_formed_reply()).unwrap();
    v.as_object_mut().unwrap().remove("visualizationType");
    let s = parse_ai_solution(&v.to_string()).unwrap();
    assert!(s.visualizations.is_empty());
  }

  #[test]
  fn unknown_viz_type_drops_the_drawing_not_the_solution() {
    let mut v: serde_json::Value = serde_json::from_str(&well_formed_reply()).unwrap();
    v["visualizationType"] = serde_json::json!("hologram");
    let s = parse_ai_solution(&v.to_string()).unwrap();
    assert!(s.visualizations.is_empty());
    s.check_contract().unwrap();
  }

  #[test]
  fn invalid_json_is_a_contract_violation() {
    let err = parse_ai_solution("the answer is four").unwrap_err();
    assert!(matches!(err, SolveError::ContractViolation(_)));
  }

  #[test]
  fn missing_required_fields_are_contract_violations() {
    let mut v: serde_json::Value = serde_json::from_str(&well_formed_reply()).unwrap();
    v.as_object_mut().unwrap().remove("answer");
    assert!(matches!(parse_ai_solution(&v.to_string()), Err(SolveError::ContractViolation(_))));

    let mut v: serde_json::Value = serde_json::from_str(&well_formed_reply()).unwrap();
    v["steps"] = serde_json::json!([]);
    assert!(matches!(parse_ai_solution(&v.to_string()), Err(SolveError::ContractViolation(_))));

    let mut v: serde_json::Value = serde_json::from_str(&well_formed_reply()).unwrap();
    v["steps"][0]["engineering_explanation"] = serde_json::json!("");
    assert!(matches!(parse_ai_solution(&v.to_string()), Err(SolveError::ContractViolation(_))));
  }

  #[test]
  fn out_of_sequence_step_numbers_are_contract_violations() {
    let mut v: serde_json::Value = serde_json::from_str(&well_formed_reply()).unwrap();
    v["steps"][0]["number"] = serde_json::json!(2);
    assert!(matches!(parse_ai_solution(&v.to_string()), Err(SolveError::ContractViolation(_))));
  }

  #[test]
  fn prompt_embeds_problem_and_tone() {
    let prompts = Prompts::default();
    let p = build_solver_prompt(&prompts, "2x + 5 = 13", LearningLevel::Kid);
    assert!(p.contains("Problem: 2x + 5 = 13"));
    assert!(p.contains(&prompts.kid_tone));
    assert!(p.contains("Return ONLY the JSON"));
  }
}
