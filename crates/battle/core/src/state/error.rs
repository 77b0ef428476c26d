//! Battle setup errors.
//!
//! Every variant is raised while building a [`BattleState`](super::BattleState)
//! from roster specs, before the first action resolves.

use crate::error::{BattleError, ErrorContext, ErrorSeverity};
use crate::skill::CatalogError;
use crate::state::{GridPos, UnitId};
use crate::traits::Side;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SetupError {
    /// Roster references a skill the catalog does not define.
    #[error("unit {} references unknown skill '{skill}'", display_template(.context))]
    MissingSkill { skill: String, context: ErrorContext },

    /// Star level outside 1..=3.
    #[error("unit {} has invalid star level {star}", display_template(.context))]
    InvalidStar { star: u8, context: ErrorContext },

    /// Position outside the board.
    #[error("position {position} is out of bounds (board: {rows}x{cols})")]
    OutOfBounds {
        position: GridPos,
        rows: i32,
        cols: i32,
        context: ErrorContext,
    },

    /// Position on the opponent's half of the board.
    #[error("position {position} is not on the {side} half of the board")]
    WrongHalf {
        side: Side,
        position: GridPos,
        context: ErrorContext,
    },

    /// Two units placed on the same cell.
    #[error("position {position} is already occupied by unit {occupant}")]
    PositionOccupied {
        position: GridPos,
        occupant: UnitId,
        context: ErrorContext,
    },

    /// A unit that could never cast its skill.
    #[error("unit {} has rage_max 0", display_template(.context))]
    ZeroRageMax { context: ErrorContext },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

fn display_template(context: &ErrorContext) -> &str {
    context.template.as_deref().unwrap_or("<unknown>")
}

impl BattleError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        use SetupError::*;
        match self {
            InvalidStar { .. }
            | OutOfBounds { .. }
            | WrongHalf { .. }
            | PositionOccupied { .. }
            | ZeroRageMax { .. } => ErrorSeverity::Validation,

            MissingSkill { .. } => ErrorSeverity::Fatal,
            Catalog(err) => err.severity(),
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        use SetupError::*;
        match self {
            MissingSkill { context, .. }
            | InvalidStar { context, .. }
            | OutOfBounds { context, .. }
            | WrongHalf { context, .. }
            | PositionOccupied { context, .. }
            | ZeroRageMax { context } => Some(context),
            Catalog(_) => None,
        }
    }

    fn error_code(&self) -> &'static str {
        use SetupError::*;
        match self {
            MissingSkill { .. } => "SETUP_MISSING_SKILL",
            InvalidStar { .. } => "SETUP_INVALID_STAR",
            OutOfBounds { .. } => "SETUP_OUT_OF_BOUNDS",
            WrongHalf { .. } => "SETUP_WRONG_HALF",
            PositionOccupied { .. } => "SETUP_POSITION_OCCUPIED",
            ZeroRageMax { .. } => "SETUP_ZERO_RAGE_MAX",
            Catalog(err) => err.error_code(),
        }
    }
}
