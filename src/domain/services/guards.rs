use crate::domain::models::opportunity::{OpportunityStatus, MAX_RELEVANCE_SCORE, UNCLASSIFIED_SCORE};
use crate::error::AppError;

pub fn require_non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed)
}

pub fn validate_score_upgrade(current: i32, score: i32) -> Result<(), AppError> {
    if !(0..=MAX_RELEVANCE_SCORE).contains(&score) {
        return Err(AppError::Validation(format!(
            "Relevance score must be between 0 and {}, got {}",
            MAX_RELEVANCE_SCORE, score
        )));
    }
    if score <= current {
        return Err(AppError::Validation(format!(
            "Relevance score must exceed the current score ({})",
            current
        )));
    }
    Ok(())
}

pub fn is_valid_score(score: i32) -> bool {
    (UNCLASSIFIED_SCORE..=MAX_RELEVANCE_SCORE).contains(&score)
}

pub fn check_transition(from: OpportunityStatus, to: OpportunityStatus) -> Result<(), AppError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::InvalidState(format!(
            "Cannot move opportunity from {} to {}",
            from, to
        )))
    }
}

pub fn require_pending(status: OpportunityStatus, action: &str) -> Result<(), AppError> {
    if status == OpportunityStatus::Pending {
        Ok(())
    } else {
        Err(AppError::InvalidState(format!(
            "{} is only allowed on pending opportunities (current: {})",
            action, status
        )))
    }
}
