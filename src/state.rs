//! Application state: the process-wide learner session, the Gemini client,
//! prompts, and the solve orchestration policy.
//!
//! This module owns:
//!   - session state (level, current problem/solution, bounded history,
//!     counters, concept mastery)
//!   - the prompts struct (from TOML or defaults)
//!   - optional Gemini client
//!
//! The solve policy tries the AI path first when a credential is configured
//! and absorbs every AI failure by falling back to the built-in solver, so a
//! non-empty submission always ends in a Solution.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine as _;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::classify::classify;
use crate::config::{load_tutor_config_from_env, Prompts};
use crate::domain::{
    LearningLevel, ProblemClassification, RecentProblem, Solution, SolveSource, SolvedProblem,
};
use crate::error::SolveError;
use crate::gemini::GeminiClient;
use crate::solver::solve_deterministic;

/// Bounded "recent problems" history: newest first, oldest evicted.
const HISTORY_CAP: usize = 10;

/// Mastery gained per solved problem in a concept, capped at 100.
const MASTERY_STEP: u32 = 5;

/// Everything persisted for one learner session. Mutated only under the
/// write lock in `submit_problem` / the explicit setters below, so readers
/// never observe a half-updated state.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub learning_level: LearningLevel,
    pub current_problem: Option<SolvedProblem>,
    pub current_solution: Option<Solution>,
    pub recent_problems: VecDeque<RecentProblem>,
    pub problems_solved: u64,
    pub concept_mastery: HashMap<String, u32>,
}

/// Outcome of one submission: the canonical Solution plus which path
/// produced it (so the client may show a soft "using built-in solver" note).
#[derive(Clone, Debug)]
pub struct SolveOutcome {
    pub solve_id: Uuid,
    pub solution: Solution,
    pub source: SolveSource,
    pub classification: ProblemClassification,
}

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<SessionState>>,
    /// Held across a solve: submissions queue behind it, so at most one
    /// solve is in flight per session.
    solve_gate: Arc<Mutex<()>>,
    pub gemini: Option<GeminiClient>,
    pub prompts: Prompts,
}

fn seed_mastery() -> HashMap<String, u32> {
    [
        "linear-equations",
        "quadratic-equations",
        "derivatives",
        "integration",
        "matrices",
        "trigonometry",
    ]
    .into_iter()
    .map(|k| (k.to_string(), 0))
    .collect()
}

/// Map a classification onto a mastery bucket, if it has one.
fn mastery_key(c: &ProblemClassification) -> Option<&'static str> {
    match (c.category.as_str(), c.subcategory.as_str()) {
        ("algebra", "linear") => Some("linear-equations"),
        ("algebra", "quadratic") => Some("quadratic-equations"),
        ("calculus", "derivative") => Some("derivatives"),
        ("calculus", "integral") => Some("integration"),
        ("trigonometry", _) => Some("trigonometry"),
        _ => None,
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl AppState {
    /// Build state from env: load config, seed mastery, init Gemini.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg_opt = load_tutor_config_from_env();
        let prompts = cfg_opt.map(|c| c.prompts).unwrap_or_default();

        let gemini = GeminiClient::from_env();
        if let Some(g) = &gemini {
            info!(target: "visualmath_backend", base_url = %g.base_url, model = %g.model, "Gemini enabled.");
        } else {
            info!(target: "visualmath_backend", "Gemini disabled (no GEMINI_API_KEY). Using built-in solver.");
        }

        Self::with_parts(gemini, prompts)
    }

    /// Assemble state from explicit parts. Lets tests pin the offline path.
    pub fn with_parts(gemini: Option<GeminiClient>, prompts: Prompts) -> Self {
        let session = SessionState { concept_mastery: seed_mastery(), ..Default::default() };
        Self {
            session: Arc::new(RwLock::new(session)),
            solve_gate: Arc::new(Mutex::new(())),
            gemini,
            prompts,
        }
    }

    /// Solve orchestration. Protocol:
    /// 1. reject blank input (the only user-visible hard failure);
    /// 2. AI path first iff a credential is configured;
    /// 3. on any AI failure, log and fall back to classify + built-in solve;
    /// 4. atomically store current problem/solution, push a bounded history
    ///    entry, bump counters and mastery.
    #[instrument(level = "info", skip(self, text, image_base64), fields(text_len = text.len(), has_image = image_base64.is_some()))]
    pub async fn submit_problem(
        &self,
        text: &str,
        image_base64: Option<String>,
    ) -> Result<SolveOutcome, SolveError> {
        let expression = text.trim();
        if expression.is_empty() {
            return Err(SolveError::Input);
        }

        // Serialize solves: a second submission queues here until the first
        // one has fully committed its state update.
        let _gate = self.solve_gate.lock().await;

        let solve_id = Uuid::new_v4();
        let level = { self.session.read().await.learning_level };

        let image_base64 = image_base64.filter(|img| {
            if base64::engine::general_purpose::STANDARD.decode(img).is_ok() {
                true
            } else {
                warn!(target: "solve", %solve_id, "Dropping problem image: not valid base64");
                false
            }
        });

        let mut ai_solution: Option<Solution> = None;
        if let Some(g) = &self.gemini {
            match g.solve(&self.prompts, expression, level).await {
                Ok(s) => ai_solution = Some(s),
                Err(e) => {
                    // Absorbed: the user is never shown raw network/parse
                    // errors, only the resulting Solution.
                    error!(target: "solve", %solve_id, error = %e, "AI solve failed; using built-in solver");
                }
            }
        }

        let classification = classify(expression);
        let (solution, source) = match ai_solution {
            Some(s) => (s, SolveSource::Gemini),
            None => (solve_deterministic(expression, &classification), SolveSource::Builtin),
        };

        let timestamp_ms = now_ms();
        {
            let mut session = self.session.write().await;
            session.current_problem = Some(SolvedProblem {
                expression: expression.to_string(),
                classification: classification.clone(),
                image_base64,
                timestamp_ms,
            });
            session.current_solution = Some(solution.clone());

            session.recent_problems.push_front(RecentProblem {
                id: timestamp_ms.to_string(),
                expression: expression.to_string(),
                topic: classification.category.clone(),
                date: "Today".into(),
            });
            session.recent_problems.truncate(HISTORY_CAP);

            session.problems_solved += 1;
            if let Some(key) = mastery_key(&classification) {
                let entry = session.concept_mastery.entry(key.to_string()).or_insert(0);
                *entry = (*entry + MASTERY_STEP).min(100);
            }
        }

        info!(
            target: "solve",
            %solve_id,
            source = ?source,
            category = %classification.category,
            subcategory = %classification.subcategory,
            steps = solution.steps.len(),
            "Problem solved"
        );

        Ok(SolveOutcome { solve_id, solution, source, classification })
    }

    /// Change the learner level (affects prompt tone and explanation pick).
    #[instrument(level = "info", skip(self))]
    pub async fn set_level(&self, level: LearningLevel) {
        let mut session = self.session.write().await;
        session.learning_level = level;
    }

    pub async fn level(&self) -> LearningLevel {
        self.session.read().await.learning_level
    }

    /// Snapshot of the bounded history, newest first.
    pub async fn recent_problems(&self) -> Vec<RecentProblem> {
        self.session.read().await.recent_problems.iter().cloned().collect()
    }

    /// Snapshot of the progress counters.
    pub async fn progress(&self) -> (u64, HashMap<String, u32>) {
        let session = self.session.read().await;
        (session.problems_solved, session.concept_mastery.clone())
    }

    pub async fn current_solution(&self) -> Option<Solution> {
        self.session.read().await.current_solution.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_state() -> AppState {
        AppState::with_parts(None, Prompts::default())
    }

    #[tokio::test]
    async fn blank_input_is_rejected_before_any_work() {
        let state = offline_state();
        assert!(matches!(state.submit_problem("   ", None).await, Err(SolveError::Input)));
        let (solved, _) = state.progress().await;
        assert_eq!(solved, 0);
        assert!(state.recent_problems().await.is_empty());
    }

    #[tokio::test]
    async fn history_is_capped_at_ten_newest_first() {
        let state = offline_state();
        for i in 0..15 {
            let text = format!("{}x + 5 = 13", i + 2);
            state.submit_problem(&text, None).await.unwrap();
        }
        let recent = state.recent_problems().await;
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].expression, "16x + 5 = 13");
        // The oldest five entries were evicted.
        for evicted in 0..5 {
            let text = format!("{}x + 5 = 13", evicted + 2);
            assert!(recent.iter().all(|r| r.expression != text), "{} still present", text);
        }
        let (solved, _) = state.progress().await;
        assert_eq!(solved, 15);
    }

    #[tokio::test]
    async fn builtin_path_is_idempotent_per_input() {
        let state = offline_state();
        let a = state.submit_problem("2x + 5 = 13", None).await.unwrap();
        let b = state.submit_problem("2x + 5 = 13", None).await.unwrap();
        assert_eq!(a.solution.topic, b.solution.topic);
        assert_eq!(a.solution.answer, b.solution.answer);
        assert_eq!(a.source, SolveSource::Builtin);
        assert_eq!(b.source, SolveSource::Builtin);
    }

    #[tokio::test]
    async fn solving_updates_current_problem_and_mastery() {
        let state = offline_state();
        let out = state.submit_problem("d/dx(x^3 + 2x)", None).await.unwrap();
        assert_eq!(out.classification.subcategory, "derivative");
        assert!(state.current_solution().await.is_some());

        let session = state.session.read().await;
        let current = session.current_problem.as_ref().unwrap();
        assert_eq!(current.expression, "d/dx(x^3 + 2x)");
        assert_eq!(session.concept_mastery["derivatives"], MASTERY_STEP);
    }

    #[tokio::test]
    async fn invalid_image_payload_is_dropped_not_fatal() {
        let state = offline_state();
        let out = state
            .submit_problem("2x + 5 = 13", Some("not&&base64".into()))
            .await
            .unwrap();
        assert_eq!(out.source, SolveSource::Builtin);
        let session = state.session.read().await;
        assert!(session.current_problem.as_ref().unwrap().image_base64.is_none());
    }

    #[tokio::test]
    async fn level_setter_round_trips() {
        let state = offline_state();
        assert_eq!(state.level().await, LearningLevel::School);
        state.set_level(LearningLevel::Engineering).await;
        assert_eq!(state.level().await, LearningLevel::Engineering);
    }
}
