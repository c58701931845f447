use serde::Deserialize;
use std::collections::BTreeSet;

use super::opportunity::OpportunityStatus;

/// One atomic mutation request against one opportunity.
///
/// Wire shape is `{"type": "<kind>", "payload": {...}}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    UpgradeRelevance { score: i32, explanation: String },
    DowngradeRelevance { explanation: String },
    AssignGoal { goal_id: String },
    AssignUser { user_id: String },
    FlagDiscussion { needs_discussion: bool },
    UpdateStatus { status: OpportunityStatus },
    AddComment { content: String },
    UpdateTags { tags: BTreeSet<String> },
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::UpgradeRelevance { .. } => "upgrade_relevance",
            Action::DowngradeRelevance { .. } => "downgrade_relevance",
            Action::AssignGoal { .. } => "assign_goal",
            Action::AssignUser { .. } => "assign_user",
            Action::FlagDiscussion { .. } => "flag_discussion",
            Action::UpdateStatus { .. } => "update_status",
            Action::AddComment { .. } => "add_comment",
            Action::UpdateTags { .. } => "update_tags",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_tagged_payload() {
        let action: Action = serde_json::from_value(json!({
            "type": "upgrade_relevance",
            "payload": { "score": 4, "explanation": "strong lead" }
        })).unwrap();

        match action {
            Action::UpgradeRelevance { score, explanation } => {
                assert_eq!(score, 4);
                assert_eq!(explanation, "strong lead");
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_status_payload_uses_snake_case() {
        let action: Action = serde_json::from_value(json!({
            "type": "update_status",
            "payload": { "status": "on_hold" }
        })).unwrap();
        assert!(matches!(action, Action::UpdateStatus { status: OpportunityStatus::OnHold }));
        assert_eq!(action.kind(), "update_status");
    }

    #[test]
    fn test_rejects_unknown_kind_and_bad_status() {
        assert!(serde_json::from_value::<Action>(json!({"type": "delete", "payload": {}})).is_err());
        assert!(serde_json::from_value::<Action>(json!({
            "type": "update_status", "payload": {"status": "archived"}
        })).is_err());
    }

    #[test]
    fn test_tags_collapse_duplicates() {
        let action: Action = serde_json::from_value(json!({
            "type": "update_tags",
            "payload": { "tags": ["vip", "brand", "vip"] }
        })).unwrap();
        match action {
            Action::UpdateTags { tags } => assert_eq!(tags.len(), 2),
            other => panic!("unexpected action {:?}", other),
        }
    }
}
