//! Lexical problem classifier.
//!
//! Pure and total: every input maps to a (category, subcategory) tag, with
//! `algebra/general` as the default. First match wins, so the rule order
//! below is part of the contract — e.g. "x^2 - 5x + 6 = 0" is `quadratic`
//! only because the exponent rule is checked before the `=` rule, and
//! "sin(x) = 0" lands on `linear` because the `=` rule precedes the trig one.

use crate::domain::ProblemClassification;

const TRIG_NAMES: [&str; 6] = ["sin", "cos", "tan", "sec", "csc", "cot"];

/// Map raw problem text to a classification.
pub fn classify(problem: &str) -> ProblemClassification {
  let lower = problem.to_lowercase();

  // Calculus
  if lower.contains("d/dx") || lower.contains("derivative") || lower.contains("differentiate") {
    return ProblemClassification::new("calculus", "derivative");
  }
  if lower.contains('∫') || lower.contains("integral") || lower.contains("integrate") {
    return ProblemClassification::new("calculus", "integral");
  }

  // Quadratic (raw text, like the exponent glyphs themselves)
  if problem.contains("^2") || problem.contains('²') {
    return ProblemClassification::new("algebra", "quadratic");
  }

  // Linear equation
  if problem.contains('=') && (problem.contains('x') || problem.contains('y')) {
    return ProblemClassification::new("algebra", "linear");
  }

  // Trigonometry
  if TRIG_NAMES.iter().any(|t| lower.contains(t)) {
    return ProblemClassification::new("trigonometry", "basic");
  }

  ProblemClassification::new("algebra", "general")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tag(text: &str) -> (String, String) {
    let c = classify(text);
    (c.category, c.subcategory)
  }

  #[test]
  fn calculus_rules_fire_first() {
    assert_eq!(tag("d/dx(x^2)"), ("calculus".into(), "derivative".into()));
    assert_eq!(tag("Differentiate x^3 + 2x"), ("calculus".into(), "derivative".into()));
    assert_eq!(tag("∫x dx"), ("calculus".into(), "integral".into()));
    assert_eq!(tag("integrate x^2 + 2x"), ("calculus".into(), "integral".into()));
  }

  #[test]
  fn quadratic_beats_linear_on_rule_order() {
    // Contains both "^2" and "=", but the exponent rule is checked first.
    assert_eq!(tag("x^2 - 5x + 6 = 0"), ("algebra".into(), "quadratic".into()));
    assert_eq!(tag("x² - 5x + 6 = 0"), ("algebra".into(), "quadratic".into()));
  }

  #[test]
  fn linear_needs_equality_and_a_variable() {
    assert_eq!(tag("2x + 5 = 13"), ("algebra".into(), "linear".into()));
    assert_eq!(tag("y = 3"), ("algebra".into(), "linear".into()));
  }

  #[test]
  fn equation_rule_precedes_trig_rule() {
    // Textual precedence, not semantic priority: "=" plus "x" wins.
    assert_eq!(tag("sin(x) = 0"), ("algebra".into(), "linear".into()));
    assert_eq!(tag("cos(30)"), ("trigonometry".into(), "basic".into()));
  }

  #[test]
  fn default_is_general_algebra() {
    assert_eq!(tag("17 + 25"), ("algebra".into(), "general".into()));
    assert_eq!(tag(""), ("algebra".into(), "general".into()));
  }

  #[test]
  fn classification_is_deterministic() {
    for _ in 0..3 {
      assert_eq!(classify("d/dx(x^2)"), classify("d/dx(x^2)"));
    }
  }
}
