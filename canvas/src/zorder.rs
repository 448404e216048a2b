//! Z-order manager: stacking operations over the placement list.
//!
//! Placements are ordered by `z_index` ascending (bottom first), ties broken
//! by their position in the list. Every effective operation rewrites the
//! z-indices of all placements to the dense sequence `0..n`, so only the
//! relative order carries meaning. Operations that would not move the target
//! (unknown id, `BringForward` on the top item, `SendBackward` on the bottom
//! item) leave every placement untouched.

#[cfg(test)]
#[path = "zorder_test.rs"]
mod zorder_test;

use serde::{Deserialize, Serialize};

use crate::store::{DishId, Placement2D};

/// A stacking change requested for one placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZOrderOp {
    /// Move to the top of the stack.
    BringToFront,
    /// Move to the bottom of the stack.
    SendToBack,
    /// Swap with the placement directly above.
    BringForward,
    /// Swap with the placement directly below.
    SendBackward,
}

/// Indices into `placements`, bottom first.
fn paint_order(placements: &[Placement2D]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..placements.len()).collect();
    order.sort_by_key(|&i| placements[i].z_index);
    order
}

/// Apply `op` to the placement of `dish_id`. Returns whether any z-index changed.
pub fn apply(placements: &mut [Placement2D], dish_id: &DishId, op: ZOrderOp) -> bool {
    let mut order = paint_order(placements);
    let Some(pos) = order.iter().position(|&i| placements[i].dish_id == *dish_id) else {
        tracing::debug!(%dish_id, ?op, "z-order: not placed");
        return false;
    };
    let last = order.len() - 1;

    match op {
        ZOrderOp::BringToFront => {
            let idx = order.remove(pos);
            order.push(idx);
        }
        ZOrderOp::SendToBack => {
            let idx = order.remove(pos);
            order.insert(0, idx);
        }
        ZOrderOp::BringForward => {
            if pos == last {
                return false;
            }
            order.swap(pos, pos + 1);
        }
        ZOrderOp::SendBackward => {
            if pos == 0 {
                return false;
            }
            order.swap(pos, pos - 1);
        }
    }

    renumber(placements, &order)
}

fn renumber(placements: &mut [Placement2D], order: &[usize]) -> bool {
    let mut changed = false;
    for (rank, &idx) in order.iter().enumerate() {
        let z = i64::try_from(rank).unwrap_or(i64::MAX);
        if placements[idx].z_index != z {
            placements[idx].z_index = z;
            changed = true;
        }
    }
    changed
}

/// Whether the z-indices are exactly `0..n` with no gaps or duplicates.
#[must_use]
pub fn is_dense(placements: &[Placement2D]) -> bool {
    let mut zs: Vec<i64> = placements.iter().map(|p| p.z_index).collect();
    zs.sort_unstable();
    zs.iter().enumerate().all(|(rank, &z)| i64::try_from(rank).is_ok_and(|r| r == z))
}
