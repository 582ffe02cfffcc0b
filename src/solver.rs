//! Deterministic solver: built-in worked Solutions that guarantee the app
//! is useful even without the AI endpoint.
//!
//! Four archetypes are recognized (linear equation, quadratic equation,
//! derivative, integral); anything else gets a generic single-step Solution.
//! The step sequences are hand-authored demos keyed by classification — the
//! caller's actual coefficients are not parsed. This is a deliberate
//! simplification boundary: the path demonstrates the output contract, not
//! symbolic computation.

use serde_json::json;

use crate::domain::{
  ConceptNote, LearningLevel, ProblemClassification, Solution, SolutionStep, VisualizationSpec,
  VizKind,
};

/// Produce a Solution for the given classification. Never fails.
pub fn solve_deterministic(problem: &str, classification: &ProblemClassification) -> Solution {
  match (classification.category.as_str(), classification.subcategory.as_str()) {
    ("algebra", "linear") => linear_equation(problem),
    ("algebra", "quadratic") => quadratic_equation(problem),
    ("calculus", "derivative") => derivative(problem),
    ("calculus", "integral") => integral(problem),
    _ => generic(problem),
  }
}

fn step(
  number: u32,
  math: &str,
  concepts: &[&str],
  kid: &str,
  school: &str,
  engineering: &str,
) -> SolutionStep {
  SolutionStep {
    number,
    math: math.into(),
    concepts: concepts.iter().map(|c| (*c).into()).collect(),
    kid_explanation: kid.into(),
    school_explanation: school.into(),
    engineering_explanation: engineering.into(),
  }
}

fn note(name: &str, description: &str, level: LearningLevel) -> ConceptNote {
  ConceptNote { name: name.into(), description: description.into(), level }
}

/// Demo: 2x + 5 = 13
fn linear_equation(problem: &str) -> Solution {
  Solution {
    problem: problem.into(),
    topic: "Algebra → Linear Equations".into(),
    answer: "x = 4".into(),
    steps: vec![
      step(
        1,
        "2x + 5 = 13",
        &["linear equation", "equality"],
        "We start with the problem. We need to find what number x is.",
        "Given equation: 2x + 5 = 13. Our goal is to isolate x.",
        "Initial equation in standard form. Objective: solve for x using inverse operations.",
      ),
      step(
        2,
        "2x + 5 - 5 = 13 - 5",
        &["subtraction property of equality", "inverse operations"],
        "x is stuck with +5. Let's remove 5 from both sides to help x get free.",
        "Subtract 5 from both sides to isolate the term containing x.",
        "Apply the additive inverse of 5 to both sides to maintain equality while isolating the x-term.",
      ),
      step(
        3,
        "2x = 8",
        &["simplification"],
        "After removing 5 from both sides, we get 2x = 8.",
        "Simplify: 2x = 8",
        "Simplification yields: 2x = 8",
      ),
      step(
        4,
        "2x ÷ 2 = 8 ÷ 2",
        &["division property of equality"],
        "Now x is multiplied by 2. Let's divide both sides by 2 to find x alone.",
        "Divide both sides by 2 to solve for x.",
        "Apply the multiplicative inverse (division by 2) to both sides.",
      ),
      step(
        5,
        "x = 4",
        &["solution"],
        "We found it! x equals 4. We can check: 2(4) + 5 = 8 + 5 = 13 ✓",
        "Solution: x = 4. Verification: 2(4) + 5 = 13 ✓",
        "Final solution: x = 4. Verification confirms the solution satisfies the original equation.",
      ),
    ],
    visualizations: vec![
      VisualizationSpec {
        kind: VizKind::NumberLine,
        data: json!({ "solution": 4, "range": [-2, 10] }),
      },
      VisualizationSpec {
        kind: VizKind::BalanceScale,
        data: json!({ "steps": ["2x+5", "13", "2x", "8", "x", "4"] }),
      },
    ],
    concepts: vec![
      note(
        "Linear Equations",
        "An equation where the variable has an exponent of 1. The graph is always a straight line.",
        LearningLevel::School,
      ),
      note(
        "Inverse Operations",
        "Operations that undo each other. Addition and subtraction are inverses, as are multiplication and division.",
        LearningLevel::Kid,
      ),
      note(
        "Equality Property",
        "Whatever you do to one side of an equation, you must do to the other side to keep it balanced.",
        LearningLevel::Kid,
      ),
    ],
  }
}

/// Demo: x² - 5x + 6 = 0
fn quadratic_equation(problem: &str) -> Solution {
  Solution {
    problem: problem.into(),
    topic: "Algebra → Quadratic Equations".into(),
    answer: "x = 2 or x = 3".into(),
    steps: vec![
      step(
        1,
        "x² - 5x + 6 = 0",
        &["quadratic equation", "standard form"],
        "This is a quadratic equation because x is squared (x²). We need to find what values of x make this equal to zero.",
        "Given quadratic equation in standard form: ax² + bx + c = 0, where a=1, b=-5, c=6.",
        "Standard form quadratic: x² - 5x + 6 = 0. Coefficients: a=1, b=-5, c=6.",
      ),
      step(
        2,
        "(x - 2)(x - 3) = 0",
        &["factoring", "zero product property"],
        "We can break this into two smaller parts that multiply together. We're looking for two numbers that multiply to 6 and add to -5.",
        "Factor the quadratic expression. Find two numbers that multiply to 6 and add to -5: -2 and -3.",
        "Factor by finding roots of the characteristic polynomial. Factorization: (x - 2)(x - 3) = 0.",
      ),
      step(
        3,
        "x - 2 = 0  or  x - 3 = 0",
        &["zero product property"],
        "If two things multiply to make zero, at least one of them must be zero. So either (x-2) is zero OR (x-3) is zero.",
        "Apply the zero product property: if ab = 0, then a = 0 or b = 0.",
        "Zero product property: For the product to equal zero, at least one factor must equal zero.",
      ),
      step(
        4,
        "x = 2  or  x = 3",
        &["solutions", "roots"],
        "We found two answers! x can be 2 or x can be 3. Both work!",
        "Solutions: x = 2 and x = 3. These are the roots of the equation.",
        "Roots of the quadratic: x₁ = 2, x₂ = 3. Both values satisfy the original equation.",
      ),
    ],
    visualizations: vec![VisualizationSpec {
      kind: VizKind::Parabola,
      data: json!({
        "equation": "x^2 - 5x + 6",
        "roots": [2, 3],
        "vertex": [2.5, -0.25]
      }),
    }],
    concepts: vec![
      note(
        "Quadratic Equations",
        "An equation where the highest power of the variable is 2. The graph is a parabola (U-shape).",
        LearningLevel::School,
      ),
      note(
        "Factoring",
        "Breaking down an expression into simpler parts that multiply together.",
        LearningLevel::School,
      ),
      note(
        "Zero Product Property",
        "If two numbers multiply to give zero, at least one of them must be zero.",
        LearningLevel::Kid,
      ),
    ],
  }
}

/// Demo: d/dx(x³ + 2x)
fn derivative(problem: &str) -> Solution {
  Solution {
    problem: problem.into(),
    topic: "Calculus → Derivatives".into(),
    answer: "3x² + 2".into(),
    steps: vec![
      step(
        1,
        "d/dx(x³ + 2x)",
        &["derivative", "differentiation"],
        "A derivative tells us how fast something is changing. We're finding how fast this function changes.",
        "Find the derivative of f(x) = x³ + 2x with respect to x.",
        "Compute the first derivative of the polynomial function f(x) = x³ + 2x.",
      ),
      step(
        2,
        "d/dx(x³) + d/dx(2x)",
        &["sum rule"],
        "We can find the derivative of each part separately and then add them.",
        "Apply the sum rule: the derivative of a sum is the sum of derivatives.",
        "Linearity of differentiation: d/dx[f(x) + g(x)] = f'(x) + g'(x).",
      ),
      step(
        3,
        "3x² + 2",
        &["power rule", "constant rule"],
        "For x³, we bring down the 3 and reduce the power by 1, giving 3x². For 2x, the derivative is just 2.",
        "Apply power rule: d/dx(x³) = 3x². The derivative of 2x is 2.",
        "Power rule: d/dx(xⁿ) = nxⁿ⁻¹. Thus d/dx(x³) = 3x² and d/dx(2x) = 2.",
      ),
    ],
    visualizations: vec![VisualizationSpec {
      kind: VizKind::DerivativeGraph,
      data: json!({
        "original": "x^3 + 2x",
        "derivative": "3x^2 + 2",
        "point": 1
      }),
    }],
    concepts: vec![
      note(
        "Derivative",
        "Measures the rate of change or slope of a function at any point.",
        LearningLevel::School,
      ),
      note(
        "Power Rule",
        "To find the derivative of xⁿ, multiply by n and reduce the power by 1: nxⁿ⁻¹.",
        LearningLevel::School,
      ),
    ],
  }
}

/// Demo: ∫(x² + 2x) dx
fn integral(problem: &str) -> Solution {
  Solution {
    problem: problem.into(),
    topic: "Calculus → Integration".into(),
    answer: "(x³/3) + x² + C".into(),
    steps: vec![
      step(
        1,
        "∫(x² + 2x) dx",
        &["integral", "antiderivative"],
        "Integration is the opposite of finding a derivative. We're finding the original function.",
        "Find the indefinite integral (antiderivative) of x² + 2x.",
        "Compute the indefinite integral of the polynomial function f(x) = x² + 2x.",
      ),
      step(
        2,
        "∫x² dx + ∫2x dx",
        &["sum rule"],
        "We can integrate each part separately.",
        "Apply the sum rule for integration.",
        "Linearity of integration: ∫[f(x) + g(x)]dx = ∫f(x)dx + ∫g(x)dx.",
      ),
      step(
        3,
        "x³/3 + x² + C",
        &["power rule for integration", "constant of integration"],
        "For x², we increase the power by 1 and divide by the new power. Don't forget +C at the end!",
        "Apply power rule: ∫xⁿ dx = xⁿ⁺¹/(n+1) + C. Result: x³/3 + x² + C.",
        "Power rule for integration: ∫xⁿdx = xⁿ⁺¹/(n+1) + C. The constant C represents the family of antiderivatives.",
      ),
    ],
    visualizations: vec![VisualizationSpec {
      kind: VizKind::IntegralArea,
      data: json!({
        "function": "x^2 + 2x",
        "limits": [0, 2]
      }),
    }],
    concepts: vec![
      note(
        "Integration",
        "The reverse process of differentiation. Finds the area under a curve.",
        LearningLevel::School,
      ),
      note(
        "Constant of Integration",
        "The +C added to indefinite integrals because many functions have the same derivative.",
        LearningLevel::School,
      ),
    ],
  }
}

/// Last-resort single-step Solution echoing the input.
fn generic(problem: &str) -> Solution {
  Solution {
    problem: problem.into(),
    topic: "Mathematics".into(),
    answer: "Solution pending".into(),
    steps: vec![step(
      1,
      problem,
      &["problem analysis"],
      "Let's look at this problem carefully.",
      "Analyze the given problem.",
      "Problem statement analysis required.",
    )],
    visualizations: vec![],
    concepts: vec![],
  }
}
