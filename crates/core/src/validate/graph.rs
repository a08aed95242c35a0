//! Workflow graph checks: entry state, circular transitions, reachability.

use crate::definition::{DefinitionView, StateView, FIELD_START_STATE, FIELD_WORKFLOW, STATE_TRANSITION};
use crate::diagnostic::{Diagnostic, Rule};
use crate::TERMINAL_STATE;
use std::collections::{HashMap, HashSet};

// ── Entry ───────────────────────────────────────────────────────────────────

pub(super) fn validate_entry(view: &DefinitionView<'_>) -> Vec<Diagnostic> {
    let Some(states) = &view.workflow else {
        return Vec::new();
    };
    let Some(first) = states.first() else {
        return vec![Diagnostic::new(
            Rule::NoWorkflowStates,
            FIELD_WORKFLOW,
            "no workflow states defined",
        )];
    };
    match view.start_state {
        Some(start) if start != first.name => vec![Diagnostic::new(
            Rule::StartStateMismatch,
            FIELD_START_STATE,
            format!(
                "start state '{}' does not match the first workflow state '{}'",
                start, first.name
            ),
        )],
        _ => Vec::new(),
    }
}

// ── Circular transitions ────────────────────────────────────────────────────

struct Walk<'v, 'd> {
    states: HashMap<&'v str, &'d StateView<'v>>,
    in_path: HashSet<&'v str>,
    path: Vec<&'v str>,
    done: HashSet<&'v str>,
    reported: HashSet<(&'v str, &'v str)>,
    diags: Vec<Diagnostic>,
}

/// Depth-first walk from the entry state. A transition back onto the
/// current path is reported once per `(from, to)` pair and that branch
/// stops. `End` and undeclared targets stop their branch only.
pub(super) fn validate_paths(view: &DefinitionView<'_>) -> Vec<Diagnostic> {
    let (Some(states), Some(entry)) = (&view.workflow, view.entry_state()) else {
        return Vec::new();
    };
    let mut walk = Walk {
        states: states.iter().map(|s| (s.name, s)).collect(),
        in_path: HashSet::new(),
        path: Vec::new(),
        done: HashSet::new(),
        reported: HashSet::new(),
        diags: Vec::new(),
    };
    walk.run(entry);
    walk.diags
}

impl<'v, 'd> Walk<'v, 'd> {
    /// Iterative so that long chains cannot exhaust the call stack. Each
    /// frame holds a state and the index of its next transition.
    fn run(&mut self, entry: &'d StateView<'v>) {
        let mut stack: Vec<(&'d StateView<'v>, usize)> = Vec::new();
        self.enter(entry);
        stack.push((entry, 0));

        while let Some((state, next)) = stack.last_mut() {
            let state = *state;
            let Some(transition) = state.transition.as_deref().and_then(|t| t.get(*next)) else {
                stack.pop();
                self.leave(state.name);
                continue;
            };
            *next += 1;

            let target = transition.target;
            if target == TERMINAL_STATE || self.done.contains(target) {
                continue;
            }
            if self.in_path.contains(target) {
                self.report_cycle(state.name, target);
                continue;
            }
            if let Some(&child) = self.states.get(target) {
                self.enter(child);
                stack.push((child, 0));
            }
        }
    }

    fn enter(&mut self, state: &'d StateView<'v>) {
        self.path.push(state.name);
        self.in_path.insert(state.name);
    }

    fn leave(&mut self, name: &'v str) {
        self.in_path.remove(name);
        self.done.insert(name);
        self.path.pop();
    }

    fn report_cycle(&mut self, from: &'v str, to: &'v str) {
        if !self.reported.insert((from, to)) {
            return;
        }
        let start = self.path.iter().position(|&s| s == to).unwrap_or(0);
        let mut cycle: Vec<&str> = self.path[start..].to_vec();
        cycle.push(to);
        self.diags.push(Diagnostic::new(
            Rule::CircularTransition,
            format!("{}.{}.{}.{}", FIELD_WORKFLOW, from, STATE_TRANSITION, to),
            format!(
                "circular reference in workflow transition: cannot transition from '{}' to '{}' ({})",
                from,
                to,
                cycle.join(" \u{2192} ")
            ),
        ));
    }
}

// ── Reachability ────────────────────────────────────────────────────────────

/// Every state other than the entry (and the declared start state) must be
/// the target of a transition from some other state.
pub(super) fn validate_reachability(view: &DefinitionView<'_>) -> Vec<Diagnostic> {
    let Some(states) = &view.workflow else {
        return Vec::new();
    };

    let mut targeted: HashSet<&str> = HashSet::new();
    for state in states {
        for entry in state.transition.iter().flatten() {
            if entry.target != state.name {
                targeted.insert(entry.target);
            }
        }
    }

    states
        .iter()
        .enumerate()
        .filter(|(i, state)| {
            *i > 0 && Some(state.name) != view.start_state && !targeted.contains(state.name)
        })
        .map(|(_, state)| {
            Diagnostic::new(
                Rule::UnreachableState,
                format!("{}.{}", FIELD_WORKFLOW, state.name),
                format!("workflow state '{}' is not reachable", state.name),
            )
        })
        .collect()
}
