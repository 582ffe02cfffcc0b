//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{LearningLevel, RecentProblem, Solution, SolveSource, VisualizationSpec};
use crate::state::SolveOutcome;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    SolveProblem {
        text: String,
        #[serde(rename = "imageBase64")]
        image_base64: Option<String>,
    },
    SetLevel {
        level: LearningLevel,
    },
    GetHistory,
    GetProgress,
    RenderVisualization {
        spec: VisualizationSpec,
        width: Option<f64>,
        height: Option<f64>,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Solution {
        solution: SolutionOut,
    },
    Level {
        level: LearningLevel,
    },
    History {
        problems: Vec<RecentProblem>,
    },
    Progress {
        #[serde(rename = "problemsSolved")]
        problems_solved: u64,
        #[serde(rename = "conceptMastery")]
        concept_mastery: HashMap<String, u32>,
    },
    Visualization {
        svg: String,
    },
    Error {
        message: String,
    },
}

/// One step with the explanation text already resolved for the session's
/// learner level (the other two levels stay available in the full Solution).
#[derive(Debug, Serialize)]
pub struct StepExplanationOut {
    pub number: u32,
    pub math: String,
    pub explanation: String,
    pub concepts: Vec<String>,
}

/// DTO used by both WS and HTTP for solution delivery.
#[derive(Debug, Serialize)]
pub struct SolutionOut {
    #[serde(rename = "solveId")]
    pub solve_id: String,
    pub source: SolveSource,
    pub solution: Solution,
    pub explanations: Vec<StepExplanationOut>,
}

/// Resolve per-step explanation text for a learner level.
pub fn resolve_explanations(solution: &Solution, level: LearningLevel) -> Vec<StepExplanationOut> {
    solution
        .steps
        .iter()
        .map(|step| StepExplanationOut {
            number: step.number,
            math: step.math.clone(),
            explanation: step.explanation_for(level).to_string(),
            concepts: step.concepts.clone(),
        })
        .collect()
}

/// Convert a solve outcome (internal) to the public DTO.
pub fn to_solution_out(outcome: &SolveOutcome, level: LearningLevel) -> SolutionOut {
    SolutionOut {
        solve_id: outcome.solve_id.to_string(),
        source: outcome.source,
        solution: outcome.solution.clone(),
        explanations: resolve_explanations(&outcome.solution, level),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct SolveIn {
    pub text: String,
    #[serde(default, rename = "imageBase64")]
    pub image_base64: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryOut {
    pub problems: Vec<RecentProblem>,
}

#[derive(Debug, Serialize)]
pub struct ProgressOut {
    #[serde(rename = "problemsSolved")]
    pub problems_solved: u64,
    #[serde(rename = "conceptMastery")]
    pub concept_mastery: HashMap<String, u32>,
}

#[derive(Debug, Deserialize)]
pub struct LevelIn {
    pub level: LearningLevel,
}

#[derive(Debug, Serialize)]
pub struct LevelOut {
    pub level: LearningLevel,
}

#[derive(Debug, Deserialize)]
pub struct VisualizationIn {
    pub spec: VisualizationSpec,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct VisualizationOut {
    pub svg: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::solver::solve_deterministic;

    #[test]
    fn explanations_follow_the_session_level() {
        let s = solve_deterministic("2x + 5 = 13", &classify("2x + 5 = 13"));
        let kid = resolve_explanations(&s, LearningLevel::Kid);
        let eng = resolve_explanations(&s, LearningLevel::Engineering);
        assert_eq!(kid.len(), s.steps.len());
        assert_eq!(kid[0].explanation, s.steps[0].kid_explanation);
        assert_eq!(eng[0].explanation, s.steps[0].engineering_explanation);
        assert_ne!(kid[0].explanation, eng[0].explanation);
    }

    #[test]
    fn ws_solve_message_accepts_camel_case_image_field() {
        let msg: ClientWsMessage = serde_json::from_str(
            r#"{"type":"solve_problem","text":"2x + 5 = 13","imageBase64":null}"#,
        )
        .unwrap();
        match msg {
            ClientWsMessage::SolveProblem { text, image_base64 } => {
                assert_eq!(text, "2x + 5 = 13");
                assert!(image_base64.is_none());
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
