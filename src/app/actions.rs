//! Per-row asynchronous action execution.
//!
//! [`ActionController`] runs [`ActionDef`] effects and tracks which
//! `(action id, row key)` pairs are in flight. Loading state is owned by the
//! controller rather than stored on the shared descriptor, so running an
//! action on one row never disables it on another.
//!
//! # Execution
//!
//! ```text
//! execute() ──mark loading──▶ await effect ──▶ ActionExecuted { outcome }
//!                 │                                   │
//!                 └──────── LoadingGuard dropped ◀────┘  (always, even on failure)
//! ```
//!
//! Loading is marked synchronously inside [`ActionController::execute`],
//! before the returned future is first polled, so a second click on the same
//! row is rejected even if the host has not started awaiting the first one.

use crate::domain::action::visible_actions;
use crate::domain::row::{RowIdentity, RowKey};
use crate::domain::{ActionDef, ActionOutcome};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::dropdown::DropdownState;

/// Completion record of an action, forwarded to the host as `actionExecuted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionExecuted {
    pub action: String,
    pub item: Value,
    pub outcome: ActionOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LoadingKey {
    action: String,
    row: RowKey,
}

type LoadingSet = Arc<Mutex<HashSet<LoadingKey>>>;

fn lock(set: &Mutex<HashSet<LoadingKey>>) -> MutexGuard<'_, HashSet<LoadingKey>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes its key from the loading set when dropped.
struct LoadingGuard {
    set: LoadingSet,
    key: LoadingKey,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        lock(&self.set).remove(&self.key);
        tracing::trace!(action = %self.key.action, row = %self.key.row, "action loading cleared");
    }
}

/// Runs row actions and owns the dropdown menu state.
#[derive(Debug, Default)]
pub struct ActionController {
    loading: LoadingSet,
    dropdown: DropdownState,
}

impl ActionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `action` on `row`.
    ///
    /// Returns `None` without calling the effect when the same action is
    /// already running for a row with the same identity. Otherwise returns a
    /// future resolving to the completion record. A failing effect is logged
    /// and reported as [`ActionOutcome::Failed`]; it never propagates.
    ///
    /// # Examples
    ///
    /// ```
    /// use complete_table::app::actions::ActionController;
    /// use complete_table::domain::{ActionDef, RowIdentity};
    /// use futures_util::FutureExt;
    /// use serde_json::{json, Value};
    ///
    /// let ping = ActionDef::new("ping", "Ping", |row: Value| async move { Ok(row["id"].clone()) }.boxed());
    /// let controller = ActionController::new();
    /// let row = json!({ "id": 4 });
    ///
    /// let running = controller.execute(&ping, &row, &RowIdentity::default()).unwrap();
    /// assert!(controller.is_loading("ping", &row, &RowIdentity::default()));
    /// assert!(controller.execute(&ping, &row, &RowIdentity::default()).is_none());
    /// drop(running);
    /// assert!(!controller.is_action_loading("ping"));
    /// ```
    #[must_use]
    pub fn execute(
        &self,
        action: &ActionDef,
        row: &Value,
        identity: &RowIdentity,
    ) -> Option<BoxFuture<'static, ActionExecuted>> {
        let key = LoadingKey {
            action: action.id.clone(),
            row: identity.key(row),
        };

        if !lock(&self.loading).insert(key.clone()) {
            tracing::debug!(action = %key.action, row = %key.row, "action already running, ignoring");
            return None;
        }
        tracing::debug!(action = %key.action, row = %key.row, "action started");

        let guard = LoadingGuard {
            set: Arc::clone(&self.loading),
            key,
        };
        let effect = Arc::clone(&action.effect);
        let action_id = action.id.clone();
        let item = row.clone();

        Some(
            async move {
                let _guard = guard;
                let outcome = match effect(item.clone()).await {
                    Ok(value) => ActionOutcome::Succeeded(value),
                    Err(error) => {
                        tracing::warn!(action = %action_id, error = %error, "action failed");
                        ActionOutcome::Failed(error.to_string())
                    }
                };
                ActionExecuted {
                    action: action_id,
                    item,
                    outcome,
                }
            }
            .boxed(),
        )
    }

    /// Closes the dropdown of `row_index`, then starts the action.
    ///
    /// The dropdown is closed even when the action is rejected as already running.
    #[must_use]
    pub fn execute_from_dropdown(
        &mut self,
        row_index: usize,
        action: &ActionDef,
        row: &Value,
        identity: &RowIdentity,
    ) -> Option<BoxFuture<'static, ActionExecuted>> {
        self.dropdown.close(row_index);
        self.execute(action, row, identity)
    }

    /// `true` while `action_id` runs for a row sharing `row`'s identity.
    #[must_use]
    pub fn is_loading(&self, action_id: &str, row: &Value, identity: &RowIdentity) -> bool {
        self.is_loading_key(action_id, &identity.key(row))
    }

    /// Same as [`Self::is_loading`] for an already computed row key.
    #[must_use]
    pub fn is_loading_key(&self, action_id: &str, row: &RowKey) -> bool {
        lock(&self.loading)
            .iter()
            .any(|k| k.action == action_id && k.row == *row)
    }

    /// `true` while `action_id` runs for any row.
    #[must_use]
    pub fn is_action_loading(&self, action_id: &str) -> bool {
        lock(&self.loading).iter().any(|k| k.action == action_id)
    }

    /// Number of actions currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        lock(&self.loading).len()
    }

    /// Actions offered for `row`, in declaration order.
    #[must_use]
    pub fn visible_actions<'a>(&self, actions: &'a [ActionDef], row: &Value) -> Vec<&'a ActionDef> {
        visible_actions(actions, row)
    }

    #[must_use]
    pub const fn dropdown(&self) -> &DropdownState {
        &self.dropdown
    }

    pub fn dropdown_mut(&mut self) -> &mut DropdownState {
        &mut self.dropdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BoxError;
    use futures::executor::block_on;
    use futures::future::join;
    use serde_json::json;

    fn echo() -> ActionDef {
        ActionDef::new("echo", "Echo", |row: Value| async move { Ok(json!({ "echo": row["id"] })) }.boxed())
    }

    fn failing() -> ActionDef {
        ActionDef::new("fail", "Fail", |_row: Value| {
            async move { Err::<Value, BoxError>("backend unavailable".into()) }.boxed()
        })
    }

    #[test]
    fn success_carries_the_result() {
        let controller = ActionController::new();
        let row = json!({ "id": 1 });
        let done = block_on(controller.execute(&echo(), &row, &RowIdentity::default()).unwrap());
        assert_eq!(done.action, "echo");
        assert_eq!(done.item, row);
        assert_eq!(done.outcome, ActionOutcome::Succeeded(json!({ "echo": 1 })));
        assert_eq!(controller.in_flight(), 0);
    }

    #[test]
    fn failure_is_reported_and_loading_cleared() {
        let controller = ActionController::new();
        let row = json!({ "id": 1 });
        let done = block_on(controller.execute(&failing(), &row, &RowIdentity::default()).unwrap());
        assert_eq!(done.outcome, ActionOutcome::Failed("backend unavailable".to_string()));
        assert!(!done.outcome.is_ok());
        assert!(!controller.is_action_loading("fail"));
    }

    #[test]
    fn same_action_on_different_rows_runs_concurrently() {
        let controller = ActionController::new();
        let identity = RowIdentity::default();
        let (a, b) = (json!({ "id": 1 }), json!({ "id": 2 }));
        let first = controller.execute(&echo(), &a, &identity).unwrap();
        let second = controller.execute(&echo(), &b, &identity).unwrap();
        assert_eq!(controller.in_flight(), 2);
        assert!(controller.is_loading("echo", &a, &identity));
        assert!(controller.is_loading("echo", &b, &identity));

        let (x, y) = block_on(join(first, second));
        assert!(x.outcome.is_ok() && y.outcome.is_ok());
        assert_eq!(controller.in_flight(), 0);
    }

    #[test]
    fn reentrant_call_is_rejected_until_completion() {
        let controller = ActionController::new();
        let identity = RowIdentity::default();
        let row = json!({ "id": 9 });
        let running = controller.execute(&echo(), &row, &identity).unwrap();
        assert!(controller.execute(&echo(), &row, &identity).is_none());
        block_on(running);
        assert!(controller.execute(&echo(), &row, &identity).is_some());
    }

    #[test]
    fn dropdown_closes_before_running() {
        let mut controller = ActionController::new();
        controller.dropdown_mut().open(3);
        let row = json!({ "id": 3 });
        let running = controller.execute_from_dropdown(3, &failing(), &row, &RowIdentity::default());
        assert_eq!(controller.dropdown().open_row(), None);
        let done = block_on(running.unwrap());
        assert!(!done.outcome.is_ok());
    }

    #[test]
    fn conditions_filter_actions_per_row() {
        let controller = ActionController::new();
        let actions = vec![echo(), failing().with_condition(|row| row["admin"] == true)];
        assert_eq!(controller.visible_actions(&actions, &json!({ "admin": false })).len(), 1);
        assert_eq!(controller.visible_actions(&actions, &json!({ "admin": true })).len(), 2);
    }
}
