//! Row action declarations.
//!
//! An [`ActionDef`] describes something the user can do to a single row:
//! an asynchronous effect plus an optional guard deciding whether the action
//! is offered for that row. Descriptors are shared by every row and are never
//! mutated by the engine; per-row loading state lives in
//! [`ActionController`](crate::app::actions::ActionController).

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Boxed error returned by a failing action effect.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Asynchronous effect of an action, called with an owned copy of the row.
pub type ActionEffect = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value, BoxError>> + Send + Sync>;

/// Guard deciding whether an action is offered for a row.
pub type ActionCondition = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionColor {
    #[default]
    Primary,
    Secondary,
    Success,
    Warning,
    Danger,
    Info,
}

/// A per-row action.
///
/// # Examples
///
/// ```
/// use complete_table::domain::ActionDef;
/// use futures_util::FutureExt;
/// use serde_json::{json, Value};
///
/// let archive = ActionDef::new("archive", "Archive", |row: Value| {
///     async move { Ok(json!({ "archived": row["id"] })) }.boxed()
/// })
/// .with_condition(|row| row["status"] != "archived");
///
/// assert!(archive.is_available(&json!({ "id": 1, "status": "open" })));
/// assert!(!archive.is_available(&json!({ "id": 2, "status": "archived" })));
/// ```
#[derive(Clone)]
pub struct ActionDef {
    pub id: String,
    pub label: String,
    pub effect: ActionEffect,
    pub condition: Option<ActionCondition>,
    pub color: ActionColor,
    pub icon: Option<String>,
    pub tooltip: Option<String>,
    pub confirmation_message: Option<String>,
}

impl fmt::Debug for ActionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDef")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("has_condition", &self.condition.is_some())
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

impl ActionDef {
    pub fn new<F>(id: impl Into<String>, label: impl Into<String>, effect: F) -> Self
    where
        F: Fn(Value) -> BoxFuture<'static, Result<Value, BoxError>> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            label: label.into(),
            effect: Arc::new(effect),
            condition: None,
            color: ActionColor::default(),
            icon: None,
            tooltip: None,
            confirmation_message: None,
        }
    }

    #[must_use]
    pub fn with_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    #[must_use]
    pub const fn with_color(mut self, color: ActionColor) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_confirmation(mut self, message: impl Into<String>) -> Self {
        self.confirmation_message = Some(message.into());
        self
    }

    /// Returns `true` when the action has no guard or the guard accepts the row.
    #[must_use]
    pub fn is_available(&self, row: &Value) -> bool {
        self.condition.as_ref().map_or(true, |guard| guard(row))
    }
}

/// Explicit result of an executed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum ActionOutcome {
    Succeeded(Value),
    Failed(String),
}

impl ActionOutcome {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Succeeded(v) => Some(v),
            Self::Failed(_) => None,
        }
    }
}

/// Keeps only the actions offered for `row`, preserving declaration order.
#[must_use]
pub fn visible_actions<'a>(actions: &'a [ActionDef], row: &Value) -> Vec<&'a ActionDef> {
    actions.iter().filter(|action| action.is_available(row)).collect()
}
