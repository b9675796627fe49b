//! Twin model types
//!
//! The typed form of a device description. Everything here is plain data:
//! records are built once (by the loader or by hand) and transformed by
//! value, never mutated in place by the engine.
//!
//! ```text
//! Model
//! ├── schemas        ObjectSchema*
//! ├── properties     Property*
//! ├── telemetry      Telemetry*
//! ├── commands       Command*  ── completionEvents ──▶ Event
//! ├── events         Event*
//! ├── relationships  Relationship*
//! ├── stateMachine   StateMachine? ── transitions ──▶ State / Command / Event
//! ├── physics        Physics?
//! ├── rules          Rule*
//! ├── goals          Goal*
//! └── aiModels       AiModel*
//! ```

pub mod behavior;
pub mod contents;
pub mod schema;
pub mod state_machine;

pub use behavior::{AiModel, Goal, Physics, Rule};
pub use contents::{
    Command, CommandPayload, CompletionEvents, Event, ExecutionMode, Property, Relationship,
    Telemetry,
};
pub use schema::{ObjectSchema, SchemaField, SchemaRef};
pub use state_machine::{Action, PropertyUpdate, State, StateMachine, Transition, Trigger};

use serde::{Deserialize, Serialize};

/// The only accepted `@context` value
pub const CONTEXT: &str = "dtmi:htc:context;1";

/// The only accepted `@type` value on a model root
pub const INTERFACE_KIND: &str = "Interface";

/// Anything that lives in a name-keyed collection on the model
pub trait Named {
    fn name(&self) -> &str;
}

/// Root of a device description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub display_name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_info: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<ObjectSchema>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telemetry: Vec<Telemetry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Event>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_machine: Option<StateMachine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physics: Option<Physics>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<Goal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ai_models: Vec<AiModel>,
}

impl Model {
    /// Create an empty interface with the standard context
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            context: CONTEXT.to_string(),
            id: id.into(),
            kind: INTERFACE_KIND.to_string(),
            display_name: display_name.into(),
            description: description.into(),
            version_info: None,
            schemas: Vec::new(),
            properties: Vec::new(),
            telemetry: Vec::new(),
            commands: Vec::new(),
            events: Vec::new(),
            relationships: Vec::new(),
            state_machine: None,
            physics: None,
            rules: Vec::new(),
            goals: Vec::new(),
            ai_models: Vec::new(),
        }
    }

    pub fn with_properties(mut self, properties: Vec<Property>) -> Self {
        self.properties.extend(properties);
        self
    }

    pub fn with_telemetry(mut self, telemetry: Vec<Telemetry>) -> Self {
        self.telemetry.extend(telemetry);
        self
    }

    pub fn with_commands(mut self, commands: Vec<Command>) -> Self {
        self.commands.extend(commands);
        self
    }

    pub fn with_events(mut self, events: Vec<Event>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn with_schemas(mut self, schemas: Vec<ObjectSchema>) -> Self {
        self.schemas.extend(schemas);
        self
    }

    pub fn with_relationships(mut self, relationships: Vec<Relationship>) -> Self {
        self.relationships.extend(relationships);
        self
    }

    pub fn with_state_machine(mut self, state_machine: StateMachine) -> Self {
        self.state_machine = Some(state_machine);
        self
    }

    pub fn with_physics(mut self, physics: Physics) -> Self {
        self.physics = Some(physics);
        self
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn with_goals(mut self, goals: Vec<Goal>) -> Self {
        self.goals.extend(goals);
        self
    }

    pub fn with_ai_models(mut self, ai_models: Vec<AiModel>) -> Self {
        self.ai_models.extend(ai_models);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_model_defaults() {
        let model = Model::new("dtmi:com:example:Fan;1", "Fan", "A ceiling fan");
        assert_eq!(model.context, CONTEXT);
        assert_eq!(model.kind, INTERFACE_KIND);
        assert!(model.state_machine.is_none());
    }

    #[test]
    fn test_decode_uses_at_keys() {
        let model: Model = serde_json::from_value(json!({
            "@context": CONTEXT,
            "@id": "dtmi:com:example:Fan;1",
            "@type": "Interface",
            "displayName": "Fan",
            "description": "A ceiling fan",
            "properties": [{ "name": "speed", "schema": "integer" }]
        }))
        .unwrap();

        assert_eq!(model.id, "dtmi:com:example:Fan;1");
        assert_eq!(model.properties.len(), 1);
        assert!(model.events.is_empty());
    }

    #[test]
    fn test_encode_skips_empty_collections() {
        let model = Model::new("dtmi:com:example:Fan;1", "Fan", "A ceiling fan");
        let value = serde_json::to_value(&model).unwrap();
        assert!(value.get("properties").is_none());
        assert_eq!(value["@type"], "Interface");
    }
}
