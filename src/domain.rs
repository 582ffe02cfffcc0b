//! Domain models used by the backend: classifications, solution steps,
//! visualization descriptors, concept notes, and the canonical Solution.

use serde::{Deserialize, Serialize};

/// Explanation depth the learner picked during onboarding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningLevel {
  Kid,
  School,
  Engineering,
}
impl Default for LearningLevel {
  fn default() -> Self { LearningLevel::School }
}

impl LearningLevel {
  pub fn as_str(&self) -> &'static str {
    match self {
      LearningLevel::Kid => "kid",
      LearningLevel::School => "school",
      LearningLevel::Engineering => "engineering",
    }
  }
}

/// (category, subcategory) tag assigned to a problem by the lexical rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemClassification {
  pub category: String,
  pub subcategory: String,
}

impl ProblemClassification {
  pub fn new(category: &str, subcategory: &str) -> Self {
    Self { category: category.into(), subcategory: subcategory.into() }
  }
}

/// One step of a worked solution. All three explanation fields are present
/// for every step; the presentation layer picks one by learner level.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolutionStep {
  pub number: u32,
  pub math: String,
  #[serde(default)]
  pub concepts: Vec<String>,
  pub kid_explanation: String,
  pub school_explanation: String,
  pub engineering_explanation: String,
}

impl SolutionStep {
  pub fn explanation_for(&self, level: LearningLevel) -> &str {
    match level {
      LearningLevel::Kid => &self.kid_explanation,
      LearningLevel::School => &self.school_explanation,
      LearningLevel::Engineering => &self.engineering_explanation,
    }
  }
}

/// Which rendering algorithm a visualization descriptor selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VizKind {
  NumberLine,
  BalanceScale,
  Parabola,
  DerivativeGraph,
  IntegralArea,
  Custom,
  #[serde(rename = "3d-graph")]
  Graph3d,
  VectorField,
}

/// Typed descriptor selecting a rendering algorithm plus its parameters.
/// The `data` shape is algorithm-specific, so it stays free-form JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VisualizationSpec {
  #[serde(rename = "type")]
  pub kind: VizKind,
  pub data: serde_json::Value,
}

/// Descriptive note about a concept the solution touches. Notes are shown
/// regardless of the current learner level; `level` is informational.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConceptNote {
  pub name: String,
  pub description: String,
  pub level: LearningLevel,
}

/// The single canonical output of either solving path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Solution {
  pub problem: String,
  pub topic: String,
  pub answer: String,
  pub steps: Vec<SolutionStep>,
  #[serde(default)]
  pub visualizations: Vec<VisualizationSpec>,
  #[serde(default)]
  pub concepts: Vec<ConceptNote>,
}

impl Solution {
  /// Check the Solution invariants: non-empty answer, at least one step,
  /// steps numbered 1..=n without gaps, every step carrying all three
  /// explanations. Returns the first violation found. A Solution failing
  /// this must not be displayed.
  pub fn check_contract(&self) -> Result<(), String> {
    if self.answer.trim().is_empty() {
      return Err("answer is empty".into());
    }
    if self.steps.is_empty() {
      return Err("steps is empty".into());
    }
    for (i, step) in self.steps.iter().enumerate() {
      let expected = (i + 1) as u32;
      if step.number != expected {
        return Err(format!("step {} is numbered {}", expected, step.number));
      }
      if step.kid_explanation.trim().is_empty()
        || step.school_explanation.trim().is_empty()
        || step.engineering_explanation.trim().is_empty()
      {
        return Err(format!("step {} is missing an explanation level", step.number));
      }
    }
    Ok(())
  }
}

/// Which path produced the current Solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveSource {
  Gemini,   // AI adapter succeeded
  Builtin,  // deterministic fallback (or AI not configured)
}

/// The submitted-problem record held as "current problem" in session state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolvedProblem {
  pub expression: String,
  pub classification: ProblemClassification,
  #[serde(default)]
  pub image_base64: Option<String>,
  pub timestamp_ms: u64,
}

/// Bounded-history summary. The full Solution body is not retained here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecentProblem {
  pub id: String,
  pub expression: String,
  pub topic: String,
  pub date: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn step(n: u32) -> SolutionStep {
    SolutionStep {
      number: n,
      math: "x = 4".into(),
      concepts: vec!["solution".into()],
      kid_explanation: "We found it!".into(),
      school_explanation: "Solution: x = 4.".into(),
      engineering_explanation: "Final solution: x = 4.".into(),
    }
  }

  #[test]
  fn contract_rejects_empty_steps_and_answer() {
    let mut s = Solution {
      problem: "2x + 5 = 13".into(),
      topic: "Algebra → Linear Equations".into(),
      answer: "x = 4".into(),
      steps: vec![step(1)],
      visualizations: vec![],
      concepts: vec![],
    };
    assert!(s.check_contract().is_ok());

    s.steps.clear();
    assert!(s.check_contract().is_err());

    s.steps = vec![step(1)];
    s.answer = "   ".into();
    assert!(s.check_contract().is_err());
  }

  #[test]
  fn contract_requires_gapless_one_based_numbering() {
    let mut second = step(3); // gap: 1, 3
    second.math = "2x = 8".into();
    let s = Solution {
      problem: "2x + 5 = 13".into(),
      topic: "Algebra → Linear Equations".into(),
      answer: "x = 4".into(),
      steps: vec![step(1), second],
      visualizations: vec![],
      concepts: vec![],
    };
    assert_eq!(s.check_contract(), Err("step 2 is numbered 3".into()));
  }

  #[test]
  fn contract_requires_all_three_explanations() {
    let mut st = step(1);
    st.engineering_explanation = String::new();
    let s = Solution {
      problem: "p".into(),
      topic: "t".into(),
      answer: "a".into(),
      steps: vec![st],
      visualizations: vec![],
      concepts: vec![],
    };
    assert!(s.check_contract().is_err());
  }

  #[test]
  fn viz_kind_uses_kebab_case_on_the_wire() {
    assert_eq!(serde_json::to_string(&VizKind::NumberLine).unwrap(), "\"number-line\"");
    assert_eq!(serde_json::to_string(&VizKind::Graph3d).unwrap(), "\"3d-graph\"");
    let k: VizKind = serde_json::from_str("\"integral-area\"").unwrap();
    assert_eq!(k, VizKind::IntegralArea);
  }
}
