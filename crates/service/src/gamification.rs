//! Point arithmetic for the active gamification configuration.

use models::gamification;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoredAction {
    Comment,
    Evaluation,
    ServiceCreated,
}

pub fn points_for(cfg: &gamification::Model, action: ScoredAction) -> i32 {
    match action {
        ScoredAction::Comment => cfg.points_per_comment,
        ScoredAction::Evaluation => cfg.points_per_evaluation,
        ScoredAction::ServiceCreated => cfg.points_per_service,
    }
}

/// Sum earned for `actions`; zero when no configuration is active.
pub fn total_points(cfg: Option<&gamification::Model>, actions: &[ScoredAction]) -> i32 {
    match cfg {
        Some(cfg) => actions.iter().map(|a| points_for(cfg, *a)).sum(),
        None => 0,
    }
}

/// A comment carrying text and a score earns both.
pub fn actions_for_comment(has_text: bool, has_evaluation: bool) -> Vec<ScoredAction> {
    let mut actions = Vec::with_capacity(2);
    if has_text {
        actions.push(ScoredAction::Comment);
    }
    if has_evaluation {
        actions.push(ScoredAction::Evaluation);
    }
    actions
}
