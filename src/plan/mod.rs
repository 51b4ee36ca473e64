//! Plan store: per-timestep robot actions extracted from a clingo answer set.
//!
//! Atoms have the shape `occurs(object(robot,R),ACTION,T)`. Atoms that do
//! not have that shape, or whose action is not understood, are reported and
//! left out of the plan; a timestep seen on an `occurs` atom still counts
//! toward [`Plan::max_time`] even if its action was rejected.

pub mod action;
pub mod document;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{InputError, ReplayError, ReplayResult};
use crate::warehouse::RobotId;

pub use action::{Action, ActionGrammar, ActionParseError};
pub use document::{extract_atoms, strip_comment_lines, WitnessSelector};

const OCCURS_PATTERN: &str =
    r"^occurs\(\s*object\(\s*robot\s*,\s*(\w+)\s*\)\s*,\s*(.+)\s*,\s*(\d+)\s*\)$";

/// An action together with the robot performing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedAction {
    /// Acting robot.
    pub robot: RobotId,
    /// What it does.
    pub action: Action,
}

impl PlannedAction {
    /// Creates a planned action.
    #[must_use]
    pub fn new(robot: impl Into<RobotId>, action: Action) -> Self {
        Self {
            robot: robot.into(),
            action,
        }
    }
}

/// Actions grouped by timestep, in document order within each timestep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    steps: BTreeMap<u32, Vec<PlannedAction>>,
    max_time: u32,
}

impl Plan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action at `time`.
    pub fn push(&mut self, time: u32, robot: impl Into<RobotId>, action: Action) {
        self.observe_time(time);
        self.steps
            .entry(time)
            .or_default()
            .push(PlannedAction::new(robot, action));
    }

    /// Appends an action (builder pattern).
    #[must_use]
    pub fn with(mut self, time: u32, robot: impl Into<RobotId>, action: Action) -> Self {
        self.push(time, robot, action);
        self
    }

    /// Extends the horizon to at least `time` without scheduling anything.
    pub fn observe_time(&mut self, time: u32) {
        self.max_time = self.max_time.max(time);
    }

    /// Actions scheduled at `time`; empty if none.
    #[must_use]
    pub fn actions_at(&self, time: u32) -> &[PlannedAction] {
        self.steps.get(&time).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Largest timestep observed in the plan document.
    #[must_use]
    pub const fn max_time(&self) -> u32 {
        self.max_time
    }

    /// Total number of scheduled actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.values().map(Vec::len).sum()
    }

    /// Returns true if no action is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.values().all(Vec::is_empty)
    }
}

/// Result of reading the plan input.
#[derive(Debug, Clone)]
pub struct LoadedPlan {
    /// The parsed plan.
    pub plan: Plan,
    /// Atoms that were left out.
    pub diagnostics: Diagnostics,
}

/// Reads and parses a plan file. A missing file or undecipherable document is fatal.
pub fn load_plan(path: impl AsRef<Path>, selector: WitnessSelector) -> ReplayResult<LoadedPlan> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| InputError::from_io(path, e))?;
    info!(path = %path.display(), bytes = text.len(), witness = %selector, "loaded plan file");
    parse_plan(&text, selector)
}

/// Parses a clingo JSON document into a plan.
pub fn parse_plan(text: &str, selector: WitnessSelector) -> ReplayResult<LoadedPlan> {
    let atoms = extract_atoms(text, selector)?;
    let loaded = plan_from_atoms(&atoms)?;
    info!(
        actions = loaded.plan.len(),
        max_time = loaded.plan.max_time(),
        warnings = loaded.diagnostics.len(),
        "parsed plan"
    );
    Ok(loaded)
}

/// Builds a plan from raw atom strings.
pub fn plan_from_atoms<S: AsRef<str>>(atoms: &[S]) -> ReplayResult<LoadedPlan> {
    let occurs = Regex::new(OCCURS_PATTERN)
        .map_err(|e| ReplayError::internal(format!("invalid atom grammar: {e}")))?;
    let grammar = ActionGrammar::compile()
        .map_err(|e| ReplayError::internal(format!("invalid action grammar: {e}")))?;

    let mut plan = Plan::new();
    let mut diagnostics = Diagnostics::new();

    for atom in atoms {
        let atom = atom.as_ref().trim();
        let Some(caps) = occurs.captures(atom) else {
            diagnostics.record(Diagnostic::UnmatchedAtom {
                atom: atom.to_string(),
            });
            continue;
        };
        let Ok(time) = caps[3].parse::<u32>() else {
            diagnostics.record(Diagnostic::UnmatchedAtom {
                atom: atom.to_string(),
            });
            continue;
        };
        let robot = RobotId::from(&caps[1]);
        plan.observe_time(time);

        match grammar.parse(&caps[2]) {
            Ok(action) => plan.push(time, robot, action),
            Err(_) => diagnostics.record(Diagnostic::UnparseableAction {
                time,
                robot,
                action: caps[2].trim().to_string(),
            }),
        }
    }

    Ok(LoadedPlan { plan, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_atoms_by_time_in_document_order() {
        let atoms = [
            "occurs(object(robot,2),move(0,1),2)",
            "occurs(object(robot,1),pickup,1)",
            "occurs(object(robot,1),move(-1,0),2)",
            "occurs(object(robot,1),deliver(3,2,1),4)",
        ];
        let loaded = plan_from_atoms(&atoms).unwrap();
        assert!(loaded.diagnostics.is_empty());

        let plan = loaded.plan;
        assert_eq!(plan.max_time(), 4);
        assert_eq!(plan.len(), 4);
        assert_eq!(plan.actions_at(1), &[PlannedAction::new("1", Action::Pickup)]);
        let robots: Vec<&str> = plan.actions_at(2).iter().map(|a| a.robot.as_str()).collect();
        assert_eq!(robots, vec!["2", "1"]);
        assert!(plan.actions_at(3).is_empty());
    }

    #[test]
    fn bad_action_is_reported_but_time_still_counts() {
        let atoms = ["occurs(object(robot,1),dance(2),7)", "occurs(object(robot,1),pickup,3)"];
        let loaded = plan_from_atoms(&atoms).unwrap();
        assert_eq!(loaded.plan.max_time(), 7);
        assert_eq!(loaded.plan.len(), 1);
        assert!(loaded.plan.actions_at(7).is_empty());
        assert!(matches!(
            loaded.diagnostics.iter().next(),
            Some(Diagnostic::UnparseableAction { time: 7, action, .. }) if action == "dance(2)"
        ));
    }

    #[test]
    fn non_occurs_atoms_are_reported() {
        let atoms = ["goal(3)", "occurs(object(shelf,1),pickup,1)"];
        let loaded = plan_from_atoms(&atoms).unwrap();
        assert!(loaded.plan.is_empty());
        assert_eq!(loaded.plan.max_time(), 0);
        assert_eq!(loaded.diagnostics.count_of("unmatched_atom"), 2);
    }

    #[test]
    fn parse_plan_reads_clingo_json() {
        let doc = r#"{"Call":[{"Witnesses":[{"Value":[
            "occurs(object(robot,1),move(1,0),1)",
            "occurs(object(robot,1), pickup, 2)"
        ]}]}]}"#;
        let loaded = parse_plan(doc, WitnessSelector::First).unwrap();
        assert_eq!(loaded.plan.max_time(), 2);
        assert_eq!(loaded.plan.actions_at(2)[0].action, Action::Pickup);
    }

    #[test]
    fn undecipherable_document_is_fatal() {
        let err = parse_plan("{\"Call\": 3}", WitnessSelector::First).unwrap_err();
        assert!(err.is_input());
    }
}
