//! Knockback destination resolver.
//!
//! A pushed unit slides along its row toward the board edge. Tanks stop it
//! gracefully one cell short; any other living unit in the way blocks the push
//! completely and the target stays where it is. Dead units are ignored.

use crate::traits::Role;

/// A unit sharing the pushed target's row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowOccupant {
    pub col: i32,
    pub role: Role,
    pub alive: bool,
}

/// Computes the column a knocked-back target ends in.
///
/// `direction` is `+1` or `-1`; any other sign is normalized and zero leaves
/// the target in place.
pub fn find_destination(
    current_col: i32,
    direction: i32,
    row_units: &[RowOccupant],
    board_width: i32,
) -> i32 {
    let step = direction.signum();
    if step == 0 {
        return current_col;
    }

    let mut last_empty = current_col;
    let mut col = current_col + step;
    while (0..board_width).contains(&col) {
        let blocker = row_units.iter().find(|u| u.alive && u.col == col);
        match blocker {
            Some(unit) if unit.role.is_tank() => {
                // Stop just before the tank, never behind the start.
                return if step > 0 {
                    current_col.max(col - 1)
                } else {
                    current_col.min(col + 1)
                };
            }
            Some(_) => return current_col,
            None => last_empty = col,
        }
        col += step;
    }
    last_empty
}
