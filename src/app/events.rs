//! Outbound notifications emitted by the table.
//!
//! Every [`TableEvent`] is serializable so that hosts bridging to another
//! runtime can forward it as JSON:
//!
//! ```text
//! {"event":"sortChanged","column":"name","direction":"desc"}
//! {"event":"stateChanged","sortColumn":"name","sortDirection":"desc","selectedItems":[]}
//! ```

use super::actions::ActionExecuted;
use super::sort::SortDirection;
use serde::Serialize;
use serde_json::Value;

/// State change reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TableEvent {
    /// A header click changed the sort column or direction.
    SortChanged {
        column: String,
        direction: SortDirection,
    },

    /// The debounced search text settled on a new value.
    SearchCommitted { text: String },

    /// The selection snapshot after a selection mutation.
    SelectionChanged { items: Vec<Value> },

    /// A row action finished, successfully or not.
    ActionExecuted(ActionExecuted),

    /// Aggregate snapshot, emitted after every sort or selection change.
    StateChanged {
        sort_column: Option<String>,
        sort_direction: SortDirection,
        selected_items: Vec<Value>,
    },
}

impl TableEvent {
    /// Wire name of the event, as used in the `event` tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SortChanged { .. } => "sortChanged",
            Self::SearchCommitted { .. } => "searchCommitted",
            Self::SelectionChanged { .. } => "selectionChanged",
            Self::ActionExecuted(_) => "actionExecuted",
            Self::StateChanged { .. } => "stateChanged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ActionOutcome;
    use serde_json::json;

    #[test]
    fn events_serialize_with_a_tag() {
        let event = TableEvent::StateChanged {
            sort_column: Some("name".to_string()),
            sort_direction: SortDirection::Desc,
            selected_items: vec![json!({ "id": 1 })],
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "event": "stateChanged",
                "sortColumn": "name",
                "sortDirection": "desc",
                "selectedItems": [{ "id": 1 }],
            })
        );
    }

    #[test]
    fn action_events_flatten_the_record() {
        let event = TableEvent::ActionExecuted(ActionExecuted {
            action: "archive".to_string(),
            item: json!({ "id": 3 }),
            outcome: ActionOutcome::Failed("denied".to_string()),
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], event.name());
        assert_eq!(value["action"], "archive");
        assert_eq!(value["item"]["id"], 3);
    }
}
