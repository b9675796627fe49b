//! Behavioral state machine

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Named;

/// States, transitions and the state the device starts in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMachine {
    pub initial_state: String,
    #[serde(default)]
    pub states: Vec<State>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

impl StateMachine {
    pub fn new(initial_state: impl Into<String>) -> Self {
        Self {
            initial_state: initial_state.into(),
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn with_states<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(names.into_iter().map(State::new));
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.states.iter().any(|s| s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
        }
    }
}

impl Named for State {
    fn name(&self) -> &str {
        &self.name
    }
}

/// An edge between two states
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub trigger: Trigger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

impl Transition {
    pub fn new(from: impl Into<String>, to: impl Into<String>, trigger: Trigger) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            trigger,
            action: None,
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }
}

/// What fires a transition. Exactly one kind is chosen.
///
/// Encoded as `{"command": "..."}`, `{"event": "..."}` or
/// `{"condition": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Trigger {
    Command(String),
    Event(String),
    Condition(String),
}

impl Trigger {
    pub fn command(name: impl Into<String>) -> Self {
        Trigger::Command(name.into())
    }

    pub fn event(name: impl Into<String>) -> Self {
        Trigger::Event(name.into())
    }

    pub fn condition(expr: impl Into<String>) -> Self {
        Trigger::Condition(expr.into())
    }

    pub fn event_name(&self) -> Option<&str> {
        match self {
            Trigger::Event(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Command(name) => write!(f, "command:{}", name),
            Trigger::Event(name) => write!(f, "event:{}", name),
            Trigger::Condition(expr) => write!(f, "when {}", expr),
        }
    }
}

/// Side effects of a transition or rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emit_event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_property: Option<PropertyUpdate>,
}

impl Action {
    pub fn emit(event: impl Into<String>) -> Self {
        Self {
            emit_event: Some(event.into()),
            update_property: None,
        }
    }

    pub fn update(property: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            emit_event: None,
            update_property: Some(PropertyUpdate {
                property: property.into(),
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyUpdate {
    pub property: String,
    pub value: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trigger_is_a_single_choice() {
        let trigger: Trigger = serde_json::from_value(json!({ "command": "start" })).unwrap();
        assert_eq!(trigger, Trigger::command("start"));

        let trigger: Trigger =
            serde_json::from_value(json!({ "condition": "temperature > 80" })).unwrap();
        assert_eq!(trigger, Trigger::condition("temperature > 80"));

        assert!(serde_json::from_value::<Trigger>(json!({})).is_err());
        assert!(
            serde_json::from_value::<Trigger>(json!({ "command": "a", "event": "b" })).is_err()
        );
    }

    #[test]
    fn test_transition_with_action_decodes() {
        let transition: Transition = serde_json::from_value(json!({
            "from": "idle",
            "to": "running",
            "trigger": { "event": "started" },
            "action": { "emitEvent": "runningChanged" }
        }))
        .unwrap();

        assert_eq!(transition.trigger.event_name(), Some("started"));
        assert_eq!(
            transition.action.and_then(|a| a.emit_event).as_deref(),
            Some("runningChanged")
        );
    }
}
