//! Interface contents: properties, telemetry, commands, events, relationships

use serde::{Deserialize, Serialize};

use super::schema::SchemaRef;
use super::Named;

/// Observable, optionally writable state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    pub schema: SchemaRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub writable: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: SchemaRef::Named(schema.into()),
            display_name: None,
            description: None,
            unit: None,
            writable: false,
        }
    }
}

/// A data stream emitted by the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub name: String,
    pub schema: SchemaRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Telemetry {
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: SchemaRef::Named(schema.into()),
            display_name: None,
            description: None,
            unit: None,
        }
    }
}

/// How a command completes relative to its caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Sync,
    Async,
}

/// Request or response payload of a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandPayload {
    pub name: String,
    pub schema: SchemaRef,
}

/// Events raised when a command finishes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_success: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_failure: Option<String>,
}

impl CompletionEvents {
    /// Named events in success, failure order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.on_success
            .as_deref()
            .into_iter()
            .chain(self.on_failure.as_deref())
    }
}

/// An invocable action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<CommandPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<CommandPayload>,
    /// Free-form intent tag (e.g. "control", "diagnostic")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_events: Option<CompletionEvents>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
            request: None,
            response: None,
            intent: None,
            execution: None,
            completion_events: None,
        }
    }

    pub fn with_completion_events(
        mut self,
        on_success: Option<&str>,
        on_failure: Option<&str>,
    ) -> Self {
        self.completion_events = Some(CompletionEvents {
            on_success: on_success.map(str::to_string),
            on_failure: on_failure.map(str::to_string),
        });
        self
    }
}

/// A named notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
            schema: None,
        }
    }
}

/// A link to another twin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_multiplicity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_multiplicity: Option<u32>,
    #[serde(default)]
    pub writable: bool,
}

impl Relationship {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: Some(target.into()),
            min_multiplicity: None,
            max_multiplicity: None,
            writable: false,
        }
    }
}

impl Named for Property {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Telemetry {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Command {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Event {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Relationship {
    fn name(&self) -> &str {
        &self.name
    }
}
