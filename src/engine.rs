//! State transition engine.
//!
//! [`apply`] turns the snapshot at the start of a timestep plus that
//! timestep's actions into the next snapshot. The input snapshot is only
//! read; the result is a fresh value.
//!
//! Actions are folded in plan order. Each action sees the acting robot's
//! position and carried shelf as they were at the start of the timestep,
//! while every write lands in the snapshot being built. Pickup looks for
//! shelves in the start snapshot but refuses a shelf an earlier pickup of the
//! same step already lifted; putdown and deliver checks read the snapshot
//! being built, so they observe earlier actions of the same step.

use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::plan::{Action, PlannedAction};
use crate::warehouse::{Coord, OrderId, ProductId, Robot, RobotId, ShelfId, WarehouseState};

/// Result of applying one timestep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Snapshot after the timestep.
    pub state: WarehouseState,
    /// Rejected actions and bookkeeping warnings, in action order.
    pub diagnostics: Diagnostics,
}

/// Applies one timestep of actions to `state`.
///
/// Rejected actions are no-ops and produce a diagnostic; the remaining
/// actions of the timestep still run.
#[must_use]
pub fn apply(state: &WarehouseState, actions: &[PlannedAction]) -> Step {
    let mut transition = Transition {
        start: state,
        next: state.clone(),
        diagnostics: Diagnostics::new(),
    };
    for planned in actions {
        transition.execute(planned);
    }
    Step {
        state: transition.next,
        diagnostics: transition.diagnostics,
    }
}

type Outcome = Result<(), Diagnostic>;

struct Transition<'a> {
    start: &'a WarehouseState,
    next: WarehouseState,
    diagnostics: Diagnostics,
}

impl<'a> Transition<'a> {
    fn execute(&mut self, planned: &PlannedAction) {
        let start: &'a WarehouseState = self.start;
        let robot_id = &planned.robot;
        let Some(robot) = start.robot(robot_id) else {
            self.diagnostics.record(Diagnostic::UnknownRobot {
                robot: robot_id.clone(),
            });
            return;
        };

        let outcome = match &planned.action {
            Action::Move { dx, dy } => {
                self.execute_move(robot_id, robot, *dx, *dy);
                Ok(())
            }
            Action::Pickup => self.execute_pickup(robot_id, robot),
            Action::Putdown => self.execute_putdown(robot_id, robot),
            Action::Deliver {
                order,
                product,
                units,
            } => self.execute_deliver(robot_id, robot, order, product, *units),
        };

        match outcome {
            Ok(()) => debug!(
                robot = %robot_id,
                kind = planned.action.kind(),
                action = %planned.action,
                "applied action"
            ),
            Err(diagnostic) => self.diagnostics.record(diagnostic),
        }
    }

    fn update_robot(&mut self, id: &RobotId, update: impl FnOnce(&mut Robot)) {
        if let Some(robot) = self.next.robots.get_mut(id) {
            update(robot);
        }
    }

    fn execute_move(&mut self, id: &RobotId, robot: &Robot, dx: i32, dy: i32) {
        let target = robot.position + (dx, dy);
        self.update_robot(id, |r| r.position = target);
    }

    fn execute_pickup(&mut self, id: &RobotId, robot: &Robot) -> Outcome {
        if let Some(carrying) = &robot.carrying {
            return Err(Diagnostic::PickupWhileCarrying {
                robot: id.clone(),
                carrying: carrying.clone(),
            });
        }

        let shelf_id = self
            .start
            .shelf_at(robot.position)
            .cloned()
            .ok_or_else(|| Diagnostic::NoShelfToPickup {
                robot: id.clone(),
                at: robot.position,
            })?;

        let Some(shelf) = self
            .next
            .shelves
            .get_mut(&shelf_id)
            .filter(|s| s.position == Some(robot.position))
        else {
            return Err(Diagnostic::ShelfTaken {
                robot: id.clone(),
                shelf: shelf_id,
                at: robot.position,
            });
        };
        shelf.position = None;
        self.update_robot(id, |r| r.carrying = Some(shelf_id));
        Ok(())
    }

    fn execute_putdown(&mut self, id: &RobotId, robot: &Robot) -> Outcome {
        let at = robot.position;
        let shelf_id = robot
            .carrying
            .clone()
            .ok_or_else(|| Diagnostic::PutdownWithoutShelf { robot: id.clone() })?;

        if self.next.layout().is_highway(at) {
            return Err(Diagnostic::PutdownOnHighway {
                robot: id.clone(),
                shelf: shelf_id,
                at,
            });
        }

        if let Some(occupant) = self.other_shelf_at(at, &shelf_id) {
            return Err(Diagnostic::PutdownOccupied {
                robot: id.clone(),
                shelf: shelf_id,
                at,
                occupant,
            });
        }

        if let Some(shelf) = self.next.shelves.get_mut(&shelf_id) {
            shelf.position = Some(at);
        }
        self.update_robot(id, |r| r.carrying = None);
        Ok(())
    }

    fn other_shelf_at(&self, at: Coord, except: &ShelfId) -> Option<ShelfId> {
        self.next
            .shelves
            .iter()
            .find(|(sid, shelf)| shelf.position == Some(at) && *sid != except)
            .map(|(sid, _)| sid.clone())
    }

    fn execute_deliver(
        &mut self,
        id: &RobotId,
        robot: &Robot,
        order_id: &OrderId,
        product: &ProductId,
        units: u32,
    ) -> Outcome {
        let at = robot.position;
        let shelf_id = robot
            .carrying
            .as_ref()
            .ok_or_else(|| Diagnostic::DeliverWithoutShelf { robot: id.clone() })?;

        let shelf = self
            .next
            .shelf(shelf_id)
            .ok_or_else(|| Diagnostic::UnknownCarriedShelf {
                robot: id.clone(),
                shelf: shelf_id.clone(),
            })?;
        let order = self
            .next
            .order(order_id)
            .ok_or_else(|| Diagnostic::UnknownOrder {
                robot: id.clone(),
                order: order_id.clone(),
            })?;
        let available = shelf
            .quantities
            .get(product)
            .copied()
            .ok_or_else(|| Diagnostic::ProductNotOnShelf {
                robot: id.clone(),
                shelf: shelf_id.clone(),
                product: product.clone(),
            })?;

        let station_at = self.next.layout().station(&order.station);
        if station_at != Some(at) {
            return Err(Diagnostic::WrongStation {
                robot: id.clone(),
                order: order_id.clone(),
                at,
                station: order.station.clone(),
                station_at,
            });
        }

        if available < units {
            return Err(Diagnostic::InsufficientStock {
                robot: id.clone(),
                shelf: shelf_id.clone(),
                product: product.clone(),
                requested: units,
                available,
            });
        }

        if let Some(qty) = self
            .next
            .shelves
            .get_mut(shelf_id)
            .and_then(|s| s.quantities.get_mut(product))
        {
            *qty -= units;
        }

        let requirement = self
            .next
            .orders
            .get_mut(order_id)
            .and_then(|o| o.requirements.get_mut(product));
        match requirement {
            Some(required) => *required = required.saturating_sub(units),
            None => self.diagnostics.record(Diagnostic::RequirementMissing {
                order: order_id.clone(),
                product: product.clone(),
            }),
        }
        Ok(())
    }
}
