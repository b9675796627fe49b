//! Defects
//!
//! Every check reports into a [`Defects`] collection instead of returning
//! early. Collections from independent checks are merged by concatenation,
//! so the caller always sees every defect, in discovery order.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Element Kinds
// =============================================================================

/// The kind of model element a defect talks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Model,
    Property,
    Telemetry,
    Command,
    Event,
    Relationship,
    StateMachine,
    State,
    Transition,
    Trigger,
    Action,
    Rule,
    Schema,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "Model",
            Self::Property => "Property",
            Self::Telemetry => "Telemetry",
            Self::Command => "Command",
            Self::Event => "Event",
            Self::Relationship => "Relationship",
            Self::StateMachine => "StateMachine",
            Self::State => "State",
            Self::Transition => "Transition",
            Self::Trigger => "Trigger",
            Self::Action => "Action",
            Self::Rule => "Rule",
            Self::Schema => "Schema",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Defect
// =============================================================================

/// Discriminant of [`Defect`], for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefectKind {
    InvalidReference,
    DuplicateName,
    InvalidStateTransition,
    UnreachableStates,
    MissingRequiredField,
    InvalidFieldValue,
    InvalidContext,
    InvalidDtmi,
    CircularReference,
}

/// A single validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Defect {
    #[error("{source_kind} '{source_name}' references unknown {target_kind} '{target_name}'{}", did_you_mean(.suggestion))]
    InvalidReference {
        source_kind: ElementKind,
        source_name: String,
        target_kind: ElementKind,
        target_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suggestion: Option<String>,
    },

    #[error("Duplicate {element_kind} name '{name}'")]
    DuplicateName { element_kind: ElementKind, name: String },

    #[error("Invalid transition '{from}' -> '{to}': {reason}")]
    InvalidStateTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Unreachable states from initial state '{initial}': {}", .states.join(", "))]
    UnreachableStates { initial: String, states: Vec<String> },

    #[error("Missing required field '{field}'")]
    MissingRequiredField { field: String },

    #[error("Invalid value for '{field}': expected {expected}, got '{actual}'")]
    InvalidFieldValue {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid @context: expected '{expected}', got '{actual}'")]
    InvalidContext { expected: String, actual: String },

    #[error("Invalid DTMI '{id}': {reason}")]
    InvalidDtmi { id: String, reason: String },

    /// Reserved. Cycles in state machines are legal and no check emits this.
    #[error("Circular reference: {}", .path.join(" -> "))]
    CircularReference { path: Vec<String> },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{}'?)", name),
        None => String::new(),
    }
}

impl Defect {
    pub fn kind(&self) -> DefectKind {
        match self {
            Self::InvalidReference { .. } => DefectKind::InvalidReference,
            Self::DuplicateName { .. } => DefectKind::DuplicateName,
            Self::InvalidStateTransition { .. } => DefectKind::InvalidStateTransition,
            Self::UnreachableStates { .. } => DefectKind::UnreachableStates,
            Self::MissingRequiredField { .. } => DefectKind::MissingRequiredField,
            Self::InvalidFieldValue { .. } => DefectKind::InvalidFieldValue,
            Self::InvalidContext { .. } => DefectKind::InvalidContext,
            Self::InvalidDtmi { .. } => DefectKind::InvalidDtmi,
            Self::CircularReference { .. } => DefectKind::CircularReference,
        }
    }

    /// Stable code for tooling
    pub fn code(&self) -> &'static str {
        match self.kind() {
            DefectKind::InvalidContext => "E001",
            DefectKind::InvalidDtmi => "E002",
            DefectKind::MissingRequiredField => "E003",
            DefectKind::InvalidFieldValue => "E004",
            DefectKind::DuplicateName => "E005",
            DefectKind::InvalidReference => "E006",
            DefectKind::InvalidStateTransition => "E007",
            DefectKind::UnreachableStates => "E008",
            DefectKind::CircularReference => "E009",
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
        }
    }

    pub fn duplicate(element_kind: ElementKind, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            element_kind,
            name: name.into(),
        }
    }

    /// Drop any suggestion, leaving the structural content only
    pub fn without_suggestion(mut self) -> Self {
        if let Self::InvalidReference { suggestion, .. } = &mut self {
            *suggestion = None;
        }
        self
    }
}

// =============================================================================
// Defects Collection
// =============================================================================

/// Ordered collection of defects from one or more checks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Defects {
    items: Vec<Defect>,
}

impl Defects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, defect: Defect) {
        self.items.push(defect);
    }

    /// Append every defect of another collection, keeping its order
    pub fn merge(&mut self, other: Defects) {
        self.items.extend(other.items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Defect> {
        self.items.iter()
    }

    pub fn all(&self) -> &[Defect] {
        &self.items
    }

    /// Defects of one kind
    pub fn of_kind(&self, kind: DefectKind) -> impl Iterator<Item = &Defect> {
        self.items.iter().filter(move |d| d.kind() == kind)
    }

    pub fn count_of(&self, kind: DefectKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn into_vec(self) -> Vec<Defect> {
        self.items
    }

    /// One line per defect plus a summary
    pub fn format_all(&self) -> String {
        let mut output = String::new();

        for item in &self.items {
            output.push_str(&format!("[{}] {}\n", item.code(), item));
        }

        if !self.is_empty() {
            output.push_str(&format!("\n{} defect(s)\n", self.len()));
        }

        output
    }
}

impl fmt::Display for Defects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_all())
    }
}

impl std::error::Error for Defects {}

impl Extend<Defect> for Defects {
    fn extend<I: IntoIterator<Item = Defect>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl FromIterator<Defect> for Defects {
    fn from_iter<I: IntoIterator<Item = Defect>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Defect>> for Defects {
    fn from(items: Vec<Defect>) -> Self {
        Self { items }
    }
}

impl IntoIterator for Defects {
    type Item = Defect;
    type IntoIter = std::vec::IntoIter<Defect>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Defects {
    type Item = &'a Defect;
    type IntoIter = std::slice::Iter<'a, Defect>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defect_messages() {
        let defect = Defect::InvalidReference {
            source_kind: ElementKind::Trigger,
            source_name: "idle -> running".to_string(),
            target_kind: ElementKind::Command,
            target_name: "strat".to_string(),
            suggestion: Some("start".to_string()),
        };
        assert_eq!(
            defect.to_string(),
            "Trigger 'idle -> running' references unknown Command 'strat' (did you mean 'start'?)"
        );
        assert_eq!(defect.code(), "E006");

        let plain = defect.without_suggestion();
        assert!(!plain.to_string().contains("did you mean"));
    }

    #[test]
    fn test_unreachable_message_lists_states() {
        let defect = Defect::UnreachableStates {
            initial: "A".to_string(),
            states: vec!["C".to_string(), "D".to_string()],
        };
        assert_eq!(defect.to_string(), "Unreachable states from initial state 'A': C, D");
    }

    #[test]
    fn test_merge_preserves_order() {
        let mut first = Defects::new();
        first.push(Defect::missing_field("displayName"));

        let second: Defects = vec![
            Defect::duplicate(ElementKind::Property, "speed"),
            Defect::missing_field("description"),
        ]
        .into();

        first.merge(second);
        assert_eq!(first.len(), 3);
        assert_eq!(first.all()[1].kind(), DefectKind::DuplicateName);
        assert_eq!(first.count_of(DefectKind::MissingRequiredField), 2);
        assert!(first.format_all().ends_with("3 defect(s)\n"));
    }

    #[test]
    fn test_defect_serializes_with_kind_tag() {
        let value = serde_json::to_value(Defect::duplicate(ElementKind::Event, "alarm")).unwrap();
        assert_eq!(value["kind"], "duplicateName");
        assert_eq!(value["elementKind"], "Event");
    }
}
