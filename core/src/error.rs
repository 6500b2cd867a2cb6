use thiserror::Error;

use crate::{RoundState, Seat};

#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum ScoreError {
    #[error("Select the active shooter before placing discs")]
    NoActiveShooter,
    #[error("A disc was already placed at ({x:.1}, {y:.1}) in this shot")]
    DuplicatePlacement { x: f64, y: f64 },
    #[error("Both players have taken all their shots")]
    AllShotsTaken,
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("Save or clear the {discs} disc(s) of the current shot first")]
    ShotInProgress { discs: usize },
    #[error("Round points must add up to 2, got {total}")]
    InvalidScoreSum { total: u32 },
    #[error("Player {} entered {entered} twenties but {tracked} were recorded", .seat.number())]
    TwentiesMismatch {
        seat: Seat,
        entered: u32,
        tracked: u32,
    },
    #[error("Both players need a name")]
    IncompleteRoster,
    #[error("Player {} must start this round", .expected.number())]
    WrongStartingPlayer { expected: Seat },
    #[error("Not allowed while the round is {state:?}")]
    InvalidTransition { state: RoundState },
    #[error("The classification surface is not ready")]
    SurfaceNotReady,
    #[error("Classification surface must have a non-zero size matching its pixel data")]
    InvalidSurfaceShape,
    #[error("Invalid player index {index}")]
    InvalidSeat { index: u8 },
    #[error("Match already ended, no new events are accepted")]
    MatchFinished,
}

impl ScoreError {
    /// Warnings may be overridden by the caller; everything else blocks the operation.
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::TwentiesMismatch { .. })
    }
}

pub type Result<T> = core::result::Result<T, ScoreError>;
