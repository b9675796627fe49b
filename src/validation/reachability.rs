//! State reachability

use crate::graph::StateGraph;
use crate::model::StateMachine;

use super::diagnostics::{Defect, Defects};

/// Declared states that cannot be reached from the initial state
pub fn unreachable_states(machine: &StateMachine) -> Vec<String> {
    StateGraph::from_state_machine(machine)
        .unreachable()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// One defect listing every unreachable state, or nothing
pub fn check_reachability(machine: &StateMachine) -> Defects {
    let states = unreachable_states(machine);
    if states.is_empty() {
        return Defects::new();
    }

    Defects::from(vec![Defect::UnreachableStates {
        initial: machine.initial_state.clone(),
        states,
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Transition, Trigger};

    #[test]
    fn test_single_state_without_transitions_is_valid() {
        let machine = StateMachine::new("idle").with_states(["idle"]);
        assert!(check_reachability(&machine).is_empty());
    }

    #[test]
    fn test_states_without_transitions_are_unreachable() {
        let machine = StateMachine::new("idle").with_states(["idle", "busy", "error"]);
        assert_eq!(unreachable_states(&machine), vec!["busy", "error"]);

        let defects = check_reachability(&machine);
        assert_eq!(
            defects.all(),
            &[Defect::UnreachableStates {
                initial: "idle".to_string(),
                states: vec!["busy".to_string(), "error".to_string()],
            }]
        );
    }

    #[test]
    fn test_reverse_edges_do_not_count() {
        let machine = StateMachine::new("A")
            .with_states(["A", "B"])
            .with_transition(Transition::new("B", "A", Trigger::event("reset")));
        assert_eq!(unreachable_states(&machine), vec!["B"]);
    }
}
