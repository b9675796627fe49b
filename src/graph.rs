//! State Graph
//!
//! Petgraph view of a state machine. Nodes are state names, edges are
//! transitions labeled with their trigger. Used for reachability and for
//! GraphViz export.
//!
//! Every name that appears in the machine gets a node, declared or not, so
//! a breadth-first walk from the initial state visits exactly the states the
//! transition closure `{initial} ∪ {to | from ∈ reached}` would.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, EdgeRef};
use std::collections::{HashMap, HashSet};

use crate::model::{StateMachine, Trigger};

/// Directed graph of states and transitions
#[derive(Debug, Clone)]
pub struct StateGraph {
    graph: DiGraph<String, Trigger>,
    indices: HashMap<String, NodeIndex>,
    declared: Vec<String>,
    initial: String,
}

impl StateGraph {
    pub fn from_state_machine(machine: &StateMachine) -> Self {
        let mut graph = DiGraph::with_capacity(machine.states.len() + 1, machine.transitions.len());
        let mut indices = HashMap::with_capacity(machine.states.len() + 1);

        let mut node = |graph: &mut DiGraph<String, Trigger>, name: &str| -> NodeIndex {
            *indices
                .entry(name.to_string())
                .or_insert_with(|| graph.add_node(name.to_string()))
        };

        for state in &machine.states {
            node(&mut graph, &state.name);
        }
        node(&mut graph, &machine.initial_state);

        for transition in &machine.transitions {
            let from = node(&mut graph, &transition.from);
            let to = node(&mut graph, &transition.to);
            graph.add_edge(from, to, transition.trigger.clone());
        }

        Self {
            graph,
            indices,
            declared: machine.states.iter().map(|s| s.name.clone()).collect(),
            initial: machine.initial_state.clone(),
        }
    }

    pub fn initial(&self) -> &str {
        &self.initial
    }

    /// Declared states, without names that only appear in transitions
    pub fn state_count(&self) -> usize {
        self.graph
            .node_weights()
            .filter(|name| self.is_declared(name))
            .count()
    }

    /// Every node, including undeclared names referenced by transitions
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn transition_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn is_declared(&self, name: &str) -> bool {
        self.declared.iter().any(|d| d == name)
    }

    /// Names reachable from the initial state by following zero or more transitions
    pub fn reachable_from_initial(&self) -> HashSet<&str> {
        let mut reached = HashSet::new();
        let Some(&start) = self.indices.get(&self.initial) else {
            return reached;
        };

        let mut bfs = Bfs::new(&self.graph, start);
        while let Some(idx) = bfs.next(&self.graph) {
            reached.insert(self.graph[idx].as_str());
        }
        reached
    }

    /// Declared states missing from the reachable set, in declaration order
    pub fn unreachable(&self) -> Vec<&str> {
        let reached = self.reachable_from_initial();
        let mut seen = HashSet::new();

        self.declared
            .iter()
            .map(String::as_str)
            .filter(|name| !reached.contains(name))
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Export to GraphViz DOT format
    pub fn to_dot(&self) -> String {
        let mut output = String::new();

        output.push_str("digraph StateMachine {\n");
        output.push_str("  rankdir=LR;\n");
        output.push_str("  node [shape=box, style=rounded, fontname=\"Helvetica\", fontsize=10];\n");
        output.push_str("  edge [fontname=\"Helvetica\", fontsize=8];\n");
        output.push('\n');

        for idx in self.graph.node_indices() {
            let name = &self.graph[idx];
            let mut attrs = vec![format!("label=\"{}\"", escape(name))];
            if *name == self.initial {
                attrs.push("peripheries=2".to_string());
            }
            if !self.is_declared(name) {
                attrs.push("style=dashed".to_string());
            }
            output.push_str(&format!("  \"{}\" [{}];\n", escape(name), attrs.join(", ")));
        }

        output.push('\n');

        for edge in self.graph.edge_references() {
            let from = &self.graph[edge.source()];
            let to = &self.graph[edge.target()];
            output.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                escape(from),
                escape(to),
                escape(&edge.weight().to_string())
            ));
        }

        output.push_str("}\n");
        output
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Transition;

    fn machine(transitions: &[(&str, &str)]) -> StateMachine {
        transitions.iter().fold(
            StateMachine::new("A").with_states(["A", "B", "C"]),
            |m, (from, to)| m.with_transition(Transition::new(*from, *to, Trigger::condition("true"))),
        )
    }

    #[test]
    fn test_chain_is_fully_reachable() {
        let graph = StateGraph::from_state_machine(&machine(&[("A", "B"), ("B", "C")]));
        assert!(graph.unreachable().is_empty());
        assert_eq!(graph.reachable_from_initial().len(), 3);
    }

    #[test]
    fn test_missing_edge_leaves_state_unreachable() {
        let graph = StateGraph::from_state_machine(&machine(&[("A", "B")]));
        assert_eq!(graph.unreachable(), vec!["C"]);
    }

    #[test]
    fn test_cycles_are_fine() {
        let graph =
            StateGraph::from_state_machine(&machine(&[("A", "B"), ("B", "A"), ("B", "C"), ("C", "C")]));
        assert!(graph.unreachable().is_empty());
    }

    #[test]
    fn test_undeclared_initial_reaches_through_closure() {
        let machine = StateMachine::new("X")
            .with_states(["A", "B"])
            .with_transition(Transition::new("X", "A", Trigger::condition("boot")));
        let graph = StateGraph::from_state_machine(&machine);
        assert_eq!(graph.unreachable(), vec!["B"]);
    }

    #[test]
    fn test_undeclared_waypoint_is_a_node_but_not_a_state() {
        let machine = StateMachine::new("A")
            .with_states(["A", "B"])
            .with_transition(Transition::new("A", "Z", Trigger::condition("go")))
            .with_transition(Transition::new("Z", "B", Trigger::condition("go")));
        let graph = StateGraph::from_state_machine(&machine);

        assert_eq!(graph.state_count(), 2);
        assert_eq!(graph.node_count(), 3);
        assert!(graph.unreachable().is_empty());
    }

    #[test]
    fn test_dot_export() {
        let graph = StateGraph::from_state_machine(&machine(&[("A", "B")]));
        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph StateMachine {"));
        assert!(dot.contains("\"A\" [label=\"A\", peripheries=2];"));
        assert!(dot.contains("\"A\" -> \"B\" [label=\"when true\"];"));
    }
}
