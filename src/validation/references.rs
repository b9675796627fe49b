//! Name uniqueness and cross-reference resolution
//!
//! ## Checks
//! 1. **Duplicates**: properties, telemetry, commands, events and states
//!    each hold unique names. One defect per repeated name.
//! 2. **State machine**: the initial state, transition endpoints and
//!    trigger commands/events resolve.
//! 3. **Completion events**: command success/failure events resolve.
//! 4. **Emitted events**: action `emitEvent` names resolve (configurable).
//!
//! A single element can produce several defects.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::HashSet;

use crate::config::ValidationConfig;
use crate::model::{Action, Model, Named, StateMachine, Transition, Trigger};

use super::diagnostics::{Defect, Defects, ElementKind};

/// Run every uniqueness and reference check over a model
pub fn check_references(model: &Model, config: &ValidationConfig) -> Defects {
    let checker = ReferenceChecker::new(model, config);
    checker.run()
}

/// Report each name that occurs more than once, in order of first repetition
pub fn duplicate_names<T: Named>(items: &[T], kind: ElementKind) -> Defects {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut defects = Defects::new();

    for item in items {
        let name = item.name();
        if !seen.insert(name) && reported.insert(name) {
            defects.push(Defect::duplicate(kind, name));
        }
    }

    defects
}

struct ReferenceChecker<'a> {
    model: &'a Model,
    config: &'a ValidationConfig,
    commands: HashSet<&'a str>,
    events: HashSet<&'a str>,
    matcher: SkimMatcherV2,
    defects: Defects,
}

impl<'a> ReferenceChecker<'a> {
    fn new(model: &'a Model, config: &'a ValidationConfig) -> Self {
        Self {
            model,
            config,
            commands: model.commands.iter().map(|c| c.name.as_str()).collect(),
            events: model.events.iter().map(|e| e.name.as_str()).collect(),
            matcher: SkimMatcherV2::default(),
            defects: Defects::new(),
        }
    }

    fn run(mut self) -> Defects {
        let model = self.model;

        self.defects.merge(duplicate_names(&model.properties, ElementKind::Property));
        self.defects.merge(duplicate_names(&model.telemetry, ElementKind::Telemetry));
        self.defects.merge(duplicate_names(&model.commands, ElementKind::Command));
        self.defects.merge(duplicate_names(&model.events, ElementKind::Event));

        if let Some(machine) = &model.state_machine {
            self.defects.merge(duplicate_names(&machine.states, ElementKind::State));
            self.check_state_machine(machine);
        }

        self.check_completion_events();

        if self.config.check_emitted_events {
            for rule in &model.rules {
                self.check_emitted_event(&rule.action, ElementKind::Rule, &rule.name);
            }
        }

        self.defects
    }

    fn check_state_machine(&mut self, machine: &'a StateMachine) {
        if !machine.has_state(&machine.initial_state) {
            let suggestion = self.suggest(
                &machine.initial_state,
                machine.states.iter().map(|s| s.name.as_str()),
            );
            self.defects.push(Defect::InvalidReference {
                source_kind: ElementKind::StateMachine,
                source_name: "stateMachine".to_string(),
                target_kind: ElementKind::State,
                target_name: machine.initial_state.clone(),
                suggestion,
            });
        }

        for transition in &machine.transitions {
            self.check_transition(machine, transition);
        }
    }

    fn check_transition(&mut self, machine: &StateMachine, transition: &Transition) {
        for (role, state) in [("source", &transition.from), ("target", &transition.to)] {
            if !machine.has_state(state) {
                self.defects.push(Defect::InvalidStateTransition {
                    from: transition.from.clone(),
                    to: transition.to.clone(),
                    reason: format!("unknown {} state '{}'", role, state),
                });
            }
        }

        let label = format!("{} -> {}", transition.from, transition.to);

        match &transition.trigger {
            Trigger::Command(name) if !self.commands.contains(name.as_str()) => {
                let suggestion = self.suggest(name, self.commands.iter().copied());
                self.defects.push(Defect::InvalidReference {
                    source_kind: ElementKind::Trigger,
                    source_name: label.clone(),
                    target_kind: ElementKind::Command,
                    target_name: name.clone(),
                    suggestion,
                });
            }
            Trigger::Event(name) if !self.events.contains(name.as_str()) => {
                let suggestion = self.suggest(name, self.events.iter().copied());
                self.defects.push(Defect::InvalidReference {
                    source_kind: ElementKind::Trigger,
                    source_name: label.clone(),
                    target_kind: ElementKind::Event,
                    target_name: name.clone(),
                    suggestion,
                });
            }
            _ => {}
        }

        if self.config.check_emitted_events {
            if let Some(action) = &transition.action {
                self.check_emitted_event(action, ElementKind::Action, &label);
            }
        }
    }

    fn check_completion_events(&mut self) {
        let model = self.model;

        for command in &model.commands {
            let Some(completion) = &command.completion_events else {
                continue;
            };
            for event in completion.names() {
                if !self.events.contains(event) {
                    let suggestion = self.suggest(event, self.events.iter().copied());
                    self.defects.push(Defect::InvalidReference {
                        source_kind: ElementKind::Command,
                        source_name: command.name.clone(),
                        target_kind: ElementKind::Event,
                        target_name: event.to_string(),
                        suggestion,
                    });
                }
            }
        }
    }

    fn check_emitted_event(&mut self, action: &Action, source_kind: ElementKind, source_name: &str) {
        let Some(event) = &action.emit_event else {
            return;
        };
        if self.events.contains(event.as_str()) {
            return;
        }

        let suggestion = self.suggest(event, self.events.iter().copied());
        self.defects.push(Defect::InvalidReference {
            source_kind,
            source_name: source_name.to_string(),
            target_kind: ElementKind::Event,
            target_name: event.clone(),
            suggestion,
        });
    }

    /// Closest declared name, scored in both directions so that both
    /// abbreviations and over-long names find their match
    fn suggest<'b>(&self, wanted: &str, candidates: impl Iterator<Item = &'b str>) -> Option<String> {
        if !self.config.suggest_names {
            return None;
        }

        let mut scored: Vec<(i64, &str)> = candidates
            .filter_map(|candidate| {
                let forward = self.matcher.fuzzy_match(candidate, wanted);
                let backward = self.matcher.fuzzy_match(wanted, candidate);
                forward.max(backward).map(|score| (score, candidate))
            })
            .collect();

        // Highest score first, ties broken by name so output is stable
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored.first().map(|(_, name)| name.to_string())
    }
}
