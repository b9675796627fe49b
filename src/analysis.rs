//! Model Analysis
//!
//! Read-only reports over a model: element counts and declared elements
//! nothing refers to. Meant for validated models, but well defined on any.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::model::Model;

/// Element counts of a model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStatistics {
    pub properties: usize,
    pub telemetry: usize,
    pub commands: usize,
    pub events: usize,
    pub relationships: usize,
    pub states: usize,
    pub transitions: usize,
    pub rules: usize,
    pub goals: usize,
    pub ai_models: usize,
    pub has_state_machine: bool,
    pub has_physics: bool,
}

impl ModelStatistics {
    /// Sum of all counted elements
    pub fn total_elements(&self) -> usize {
        self.properties
            + self.telemetry
            + self.commands
            + self.events
            + self.relationships
            + self.states
            + self.transitions
            + self.rules
            + self.goals
            + self.ai_models
    }
}

/// Declared elements that are never referenced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnusedElements {
    pub unused_events: Vec<String>,
    pub unused_schemas: Vec<String>,
}

impl UnusedElements {
    pub fn is_empty(&self) -> bool {
        self.unused_events.is_empty() && self.unused_schemas.is_empty()
    }
}

/// Count the elements of a model
pub fn analyze(model: &Model) -> ModelStatistics {
    let machine = model.state_machine.as_ref();

    ModelStatistics {
        properties: model.properties.len(),
        telemetry: model.telemetry.len(),
        commands: model.commands.len(),
        events: model.events.len(),
        relationships: model.relationships.len(),
        states: machine.map(|m| m.states.len()).unwrap_or(0),
        transitions: machine.map(|m| m.transitions.len()).unwrap_or(0),
        rules: model.rules.len(),
        goals: model.goals.len(),
        ai_models: model.ai_models.len(),
        has_state_machine: machine.is_some(),
        has_physics: model.physics.is_some(),
    }
}

/// Find events and object schemas that nothing refers to
pub fn find_unused(model: &Model) -> UnusedElements {
    UnusedElements {
        unused_events: unused_events(model),
        unused_schemas: unused_schemas(model),
    }
}

/// Event names used as a trigger, an emitted action or a completion event
pub fn referenced_events(model: &Model) -> HashSet<&str> {
    let mut used = HashSet::new();

    if let Some(machine) = &model.state_machine {
        for transition in &machine.transitions {
            if let Some(event) = transition.trigger.event_name() {
                used.insert(event);
            }
            if let Some(event) = transition.action.as_ref().and_then(|a| a.emit_event.as_deref()) {
                used.insert(event);
            }
        }
    }

    for rule in &model.rules {
        if let Some(event) = rule.action.emit_event.as_deref() {
            used.insert(event);
        }
    }

    for command in &model.commands {
        if let Some(completion) = &command.completion_events {
            used.extend(completion.names());
        }
    }

    used
}

fn unused_events(model: &Model) -> Vec<String> {
    let used = referenced_events(model);
    let mut reported = HashSet::new();

    model
        .events
        .iter()
        .map(|e| e.name.as_str())
        .filter(|name| !used.contains(name) && reported.insert(*name))
        .map(str::to_string)
        .collect()
}

fn unused_schemas(model: &Model) -> Vec<String> {
    let mut used: Vec<&str> = Vec::new();

    for property in &model.properties {
        property.schema.referenced_names(&mut used);
    }
    for telemetry in &model.telemetry {
        telemetry.schema.referenced_names(&mut used);
    }
    for command in &model.commands {
        for payload in command.request.iter().chain(command.response.iter()) {
            payload.schema.referenced_names(&mut used);
        }
    }
    for event in &model.events {
        if let Some(schema) = &event.schema {
            schema.referenced_names(&mut used);
        }
    }

    // A schema used only by itself is still unused
    let mut used_by_other: HashSet<&str> = used.into_iter().collect();
    for schema in &model.schemas {
        let mut names = Vec::new();
        for field in &schema.fields {
            field.schema.referenced_names(&mut names);
        }
        used_by_other.extend(names.into_iter().filter(|n| Some(*n) != schema.id.as_deref()));
    }

    model
        .schemas
        .iter()
        .filter_map(|s| s.id.as_deref())
        .filter(|id| !used_by_other.contains(id))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Action, Command, Event, ObjectSchema, Physics, Property, SchemaField, SchemaRef,
        StateMachine, Telemetry, Transition, Trigger,
    };

    #[test]
    fn test_statistics_counts() {
        let machine = StateMachine::new("idle")
            .with_states(["idle", "heating", "cooling"])
            .with_transition(Transition::new("idle", "heating", Trigger::command("heat")))
            .with_transition(Transition::new("idle", "cooling", Trigger::command("cool")));

        let model = Model::new("dtmi:com:example:Hvac;1", "HVAC", "Climate control")
            .with_properties(vec![
                Property::new("target", "double"),
                Property::new("mode", "string"),
                Property::new("fan", "boolean"),
            ])
            .with_commands(vec![Command::new("heat"), Command::new("cool"), Command::new("stop")])
            .with_events(vec![
                Event::new("heated"),
                Event::new("cooled"),
                Event::new("stopped"),
                Event::new("fault"),
            ])
            .with_state_machine(machine)
            .with_physics(Physics::new("thermal").with_parameter("mass", 12.5));

        let stats = analyze(&model);
        assert_eq!(stats.properties, 3);
        assert_eq!(stats.commands, 3);
        assert_eq!(stats.events, 4);
        assert_eq!(stats.states, 3);
        assert_eq!(stats.transitions, 2);
        assert_eq!(stats.telemetry, 0);
        assert!(stats.has_state_machine);
        assert!(stats.has_physics);
        assert_eq!(stats.total_elements(), 15);
    }

    #[test]
    fn test_empty_model_statistics() {
        let stats = analyze(&Model::new("dtmi:a;1", "A", "a"));
        assert_eq!(stats, ModelStatistics::default());
    }

    #[test]
    fn test_unused_events() {
        let machine = StateMachine::new("idle")
            .with_states(["idle", "running"])
            .with_transition(
                Transition::new("idle", "running", Trigger::event("started"))
                    .with_action(Action::emit("runningChanged")),
            );

        let model = Model::new("dtmi:com:example:Motor;1", "Motor", "Motor")
            .with_events(vec![
                Event::new("started"),
                Event::new("runningChanged"),
                Event::new("stalled"),
                Event::new("done"),
                Event::new("orphan"),
            ])
            .with_commands(vec![
                Command::new("run").with_completion_events(Some("done"), Some("stalled"))
            ])
            .with_state_machine(machine);

        let unused = find_unused(&model);
        assert_eq!(unused.unused_events, vec!["orphan"]);
    }

    #[test]
    fn test_unused_schemas() {
        let reading = "dtmi:com:example:Reading;1";
        let calibration = "dtmi:com:example:Calibration;1";
        let tree = "dtmi:com:example:Tree;1";

        let model = Model::new("dtmi:com:example:Probe;1", "Probe", "Probe")
            .with_schemas(vec![
                ObjectSchema::new(reading, vec![SchemaField::new("value", SchemaRef::named("double"))]),
                ObjectSchema::new(calibration, vec![]),
                ObjectSchema::new(tree, vec![SchemaField::new("child", SchemaRef::named(tree))]),
            ])
            .with_telemetry(vec![Telemetry::new("reading", reading)]);

        let unused = find_unused(&model);
        assert_eq!(unused.unused_schemas, vec![calibration.to_string(), tree.to_string()]);
        assert!(unused.unused_events.is_empty());
    }
}
