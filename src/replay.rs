//! Timestep replay.
//!
//! [`Replay`] threads a warehouse state through the engine one timestep at a
//! time and yields a [`Frame`] for every timestep `0..=max_time`. Frame 0 is
//! the initial configuration; actions a plan schedules at time 0 are never
//! applied.

use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::engine;
use crate::plan::{Plan, PlannedAction};
use crate::warehouse::{StateDigest, WarehouseState};

/// The warehouse after one timestep, with what happened during it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'p> {
    /// Timestep this frame shows.
    pub time: u32,
    /// State at the end of the timestep.
    pub state: WarehouseState,
    /// Actions applied to reach this state; empty for frame 0.
    pub actions: &'p [PlannedAction],
    /// Rejections and warnings raised during the timestep.
    pub diagnostics: Diagnostics,
    /// Digest of `state`.
    pub digest: StateDigest,
}

/// A diagnostic tagged with the timestep that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedDiagnostic {
    /// Timestep.
    pub time: u32,
    /// What went wrong.
    pub diagnostic: Diagnostic,
}

/// Result of [`Replay::run_to_end`].
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    /// State after the last timestep.
    pub final_state: WarehouseState,
    /// Last timestep replayed.
    pub final_time: u32,
    /// Every diagnostic of the run, in timestep order.
    pub diagnostics: Vec<TimedDiagnostic>,
}

impl ReplayOutcome {
    /// Number of rejected actions over the whole run.
    #[must_use]
    pub fn rejections(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.diagnostic.is_rejection())
            .count()
    }
}

/// Iterator over the frames of a plan replay.
#[derive(Debug, Clone)]
pub struct Replay<'p> {
    plan: &'p Plan,
    state: WarehouseState,
    next_time: Option<u32>,
}

impl<'p> Replay<'p> {
    /// Starts a replay of `plan` from `initial`.
    #[must_use]
    pub fn new(initial: WarehouseState, plan: &'p Plan) -> Self {
        Self {
            plan,
            state: initial,
            next_time: Some(0),
        }
    }

    /// Runs every remaining frame and keeps only the final state and the diagnostics.
    #[must_use]
    pub fn run_to_end(mut self) -> ReplayOutcome {
        let mut diagnostics = Vec::new();
        let mut final_time = 0;
        for frame in self.by_ref() {
            final_time = frame.time;
            diagnostics.extend(frame.diagnostics.into_iter().map(|diagnostic| TimedDiagnostic {
                time: frame.time,
                diagnostic,
            }));
        }
        ReplayOutcome {
            final_state: self.state,
            final_time,
            diagnostics,
        }
    }

    fn initial_frame(&self) -> Frame<'p> {
        let mut diagnostics = Diagnostics::new();
        let ignored = self.plan.actions_at(0).len();
        if ignored > 0 {
            diagnostics.record(Diagnostic::IgnoredInitialActions { count: ignored });
        }
        Frame {
            time: 0,
            state: self.state.clone(),
            actions: &[],
            diagnostics,
            digest: self.state.digest(),
        }
    }
}

impl<'p> Iterator for Replay<'p> {
    type Item = Frame<'p>;

    fn next(&mut self) -> Option<Self::Item> {
        let time = self.next_time?;
        self.next_time = (time < self.plan.max_time()).then_some(time + 1);

        let frame = if time == 0 {
            self.initial_frame()
        } else {
            let actions = self.plan.actions_at(time);
            let step = engine::apply(&self.state, actions);
            self.state = step.state;
            Frame {
                time,
                state: self.state.clone(),
                actions,
                diagnostics: step.diagnostics,
                digest: self.state.digest(),
            }
        };

        debug!(
            time,
            actions = frame.actions.len(),
            diagnostics = frame.diagnostics.len(),
            digest = %frame.digest.short(),
            "replayed timestep"
        );
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.next_time.map_or(0, |t| {
            usize::try_from(self.plan.max_time() - t).map_or(usize::MAX, |n| n.saturating_add(1))
        });
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Replay<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Action;
    use crate::warehouse::{Coord, Layout, Robot};

    fn one_robot() -> WarehouseState {
        let mut layout = Layout::default();
        layout.nodes.insert(Coord::new(1, 1));
        WarehouseState::new(layout).with_robot("r1", Robot::at(Coord::new(1, 1)))
    }

    #[test]
    fn yields_frame_per_timestep_including_gaps() {
        let plan = Plan::new()
            .with(1, "r1", Action::Move { dx: 1, dy: 0 })
            .with(3, "r1", Action::Move { dx: 0, dy: 1 });
        let replay = Replay::new(one_robot(), &plan);
        assert_eq!(replay.len(), 4);

        let frames: Vec<Frame<'_>> = replay.collect();
        let times: Vec<u32> = frames.iter().map(|f| f.time).collect();
        assert_eq!(times, vec![0, 1, 2, 3]);
        assert!(frames[2].actions.is_empty());
        assert_eq!(frames[1].digest, frames[2].digest);
        assert_ne!(frames[0].digest, frames[1].digest);
        assert_eq!(
            frames[3].state.robot(&"r1".into()).map(|r| r.position),
            Some(Coord::new(2, 2))
        );
    }

    #[test]
    fn time_zero_actions_are_ignored_with_warning() {
        let plan = Plan::new().with(0, "r1", Action::Move { dx: 5, dy: 5 });
        let frames: Vec<Frame<'_>> = Replay::new(one_robot(), &plan).collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].state, one_robot());
        assert!(frames[0].actions.is_empty());
        assert_eq!(frames[0].diagnostics.count_of("ignored_initial_actions"), 1);
    }

    #[test]
    fn run_to_end_tags_diagnostics_with_time() {
        let plan = Plan::new()
            .with(1, "r1", Action::Putdown)
            .with(2, "ghost", Action::Pickup)
            .with(2, "r1", Action::Move { dx: 0, dy: 1 });
        let outcome = Replay::new(one_robot(), &plan).run_to_end();
        assert_eq!(outcome.final_time, 2);
        assert_eq!(outcome.rejections(), 2);
        let times: Vec<u32> = outcome.diagnostics.iter().map(|d| d.time).collect();
        assert_eq!(times, vec![1, 2]);
        assert_eq!(
            outcome.final_state.robot(&"r1".into()).map(|r| r.position),
            Some(Coord::new(1, 2))
        );
    }

    #[test]
    fn empty_plan_replays_only_initial_frame() {
        let plan = Plan::new();
        let outcome = Replay::new(one_robot(), &plan).run_to_end();
        assert_eq!(outcome.final_time, 0);
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.final_state, one_robot());
    }
}
