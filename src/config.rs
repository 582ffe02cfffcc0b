//! Loading tutor configuration (prompt templates) from TOML.
//!
//! See `TutorConfig` and `Prompts` for expected schema.

use serde::Deserialize;
use tracing::{info, error};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct TutorConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompts used by the Gemini client. Defaults reproduce the built-in solver
/// prompt; override them in TOML to tune tone/structure.
///
/// The solver template supports `{problem}`, `{level}` and `{tone}`
/// placeholders. The JSON schema block is part of the template on purpose:
/// the response contract is enforced verbatim on parse, so the demanded
/// shape and the validated shape must not drift apart silently.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub solver_template: String,
  pub kid_tone: String,
  pub school_tone: String,
  pub engineering_tone: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      solver_template: r#"You are an expert math tutor. Solve this problem step-by-step and provide explanations at the {level} level.

Problem: {problem}

Please provide your response in the following JSON format:

{
    "problem": "{problem}",
    "topic": "Category → Subcategory (e.g., Algebra → Linear Equations)",
    "answer": "Final answer",
    "steps": [
        {
            "number": 1,
            "math": "Mathematical expression at this step",
            "concepts": ["concept1", "concept2"],
            "kid_explanation": "Simple explanation for kids",
            "school_explanation": "Explanation for high school students",
            "engineering_explanation": "Formal explanation for engineering students"
        }
    ],
    "visualizationType": "number-line | balance-scale | parabola | derivative-graph | integral-area | custom",
    "visualizationData": {
        "type": "Specific visualization type",
        "parameters": {
            "key": "value"
        }
    },
    "concepts": [
        {
            "name": "Concept name",
            "description": "Detailed explanation",
            "level": "kid | school | engineering"
        }
    ]
}

Guidelines:
1. {tone}
2. Break down the solution into clear, logical steps
3. For each step, provide all three explanation levels
4. Identify the best visualization type for this problem
5. Provide specific parameters for the visualization
6. List key mathematical concepts involved
7. Ensure the math notation uses standard symbols (use ^ for exponents, * for multiplication)

Return ONLY the JSON, no additional text."#.into(),
      kid_tone: "Explain using simple language, analogies, and encouragement. Suitable for ages 10-14.".into(),
      school_tone: "Use proper mathematical terminology. Suitable for high school students preparing for exams.".into(),
      engineering_tone: "Use formal mathematical notation and rigorous explanations. Suitable for university students.".into(),
    }
  }
}

impl Prompts {
  pub fn tone_for(&self, level: crate::domain::LearningLevel) -> &str {
    use crate::domain::LearningLevel::*;
    match level {
      Kid => &self.kid_tone,
      School => &self.school_tone,
      Engineering => &self.engineering_tone,
    }
  }
}

/// Attempt to load `TutorConfig` from TUTOR_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_tutor_config_from_env() -> Option<TutorConfig> {
  let path = std::env::var("TUTOR_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<TutorConfig>(&s) {
      Ok(cfg) => {
        info!(target: "visualmath_backend", %path, "Loaded tutor config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "visualmath_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "visualmath_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
