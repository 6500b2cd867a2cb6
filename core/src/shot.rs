use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Clicks closer than this on both axes to a disc of the same shot count as a duplicate.
pub const DUPLICATE_TOLERANCE: f64 = 1.0;

/// One disc landing, classified at placement time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub owner: Seat,
    pub zone: String,
    pub points: u8,
}

impl Disc {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_twenty(&self) -> bool {
        is_twenty_zone(&self.zone)
    }
}

/// All discs recorded for one player's turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shot {
    pub player: String,
    pub player_index: Seat,
    pub discs: Vec<Disc>,
    pub shot_type: String,
    pub shot_number: u8,
    pub round_number: u32,
    pub shot_count: u8,
}

/// Where a shot sits inside its round.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ShotNumbering {
    pub round_number: u32,
    /// 1-based, per player.
    pub shot_number: u8,
    /// 1-based, across both players.
    pub shot_count: u8,
}

/// Accumulates the discs of the shot currently being recorded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShotBuilder {
    discs: Vec<Disc>,
    previous: Vec<Disc>,
}

impl ShotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn discs(&self) -> &[Disc] {
        &self.discs
    }

    /// Discs of the last saved shot, kept only so they can be drawn faintly.
    pub fn previous_discs(&self) -> &[Disc] {
        &self.previous
    }

    pub fn is_empty(&self) -> bool {
        self.discs.is_empty()
    }

    pub fn place_disc<S: ClassificationSurface>(
        &mut self,
        classifier: &ZoneClassifier<S>,
        point: Point,
        active: Option<Seat>,
    ) -> Result<&Disc> {
        let owner = active.ok_or(ScoreError::NoActiveShooter)?;
        let point = classifier.clamp_point(point);

        if let Some(existing) = self
            .discs
            .iter()
            .find(|disc| disc.position().is_near(point, DUPLICATE_TOLERANCE))
        {
            log::debug!("Ignoring duplicate click next to disc {}", existing.id);
            return Err(ScoreError::DuplicatePlacement {
                x: point.x,
                y: point.y,
            });
        }

        let zone = classifier.classify(point);
        let id = self.discs.len() as u32 + 1;
        self.discs.push(Disc {
            id,
            x: point.x,
            y: point.y,
            owner,
            zone: zone.name.into(),
            points: zone.points,
        });
        Ok(&self.discs[self.discs.len() - 1])
    }

    pub fn undo_last_disc(&mut self) -> Result<Disc> {
        self.discs.pop().ok_or(ScoreError::NothingToUndo)
    }

    /// Packages the accumulated discs, leaving them behind as the previous shot.
    pub fn finalize_shot(
        &mut self,
        player: String,
        seat: Seat,
        numbering: ShotNumbering,
        shot_type: String,
    ) -> Shot {
        let discs = core::mem::take(&mut self.discs);
        self.previous.clone_from(&discs);
        Shot {
            player,
            player_index: seat,
            discs,
            shot_type,
            shot_number: numbering.shot_number,
            round_number: numbering.round_number,
            shot_count: numbering.shot_count,
        }
    }

    /// Reopens a saved shot for editing; `previous` becomes the shot saved before it.
    pub fn reopen(&mut self, shot: &Shot, previous: Option<&Shot>) {
        self.discs.clone_from(&shot.discs);
        self.previous = previous.map(|shot| shot.discs.clone()).unwrap_or_default();
    }
}
