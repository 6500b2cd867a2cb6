use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    Playing,
    Finished,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::Playing
    }
}

/// One match in progress: closed rounds, the open round and the classification capability.
#[derive(Clone, Debug, PartialEq)]
pub struct Match<S = ReferenceSurface> {
    metadata: MatchMetadata,
    closed_rounds: Vec<Round>,
    tracker: RoundTracker,
    /// Starting seat of the open round, predetermined from round two on.
    starting_seat: Option<Seat>,
    classifier: Option<ZoneClassifier<S>>,
    state: MatchState,
}

impl<S: ClassificationSurface> Match<S> {
    pub fn start(mut metadata: MatchMetadata) -> Result<Self> {
        metadata.check_roster()?;
        if metadata.tournament_name.trim().is_empty() {
            metadata.tournament_name = metadata.derived_tournament_name();
        }
        log::debug!(
            "Match {} started: {} vs {}",
            metadata.match_id,
            metadata.players.one.name,
            metadata.players.two.name
        );
        let tracker = RoundTracker::new(1, &metadata.players);
        Ok(Self {
            metadata,
            closed_rounds: Vec::new(),
            tracker,
            starting_seat: None,
            classifier: None,
            state: Default::default(),
        })
    }

    pub fn with_surface(mut self, surface: S) -> Self {
        self.attach_surface(surface);
        self
    }

    /// Called by the asset loader once the reference surface is decoded.
    pub fn attach_surface(&mut self, surface: S) {
        let (width, height) = surface.size();
        log::debug!("Classification surface ready ({width}x{height})");
        self.classifier = Some(ZoneClassifier::new(surface));
    }

    pub fn is_surface_ready(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn classifier(&self) -> Option<&ZoneClassifier<S>> {
        self.classifier.as_ref()
    }

    pub fn metadata(&self) -> &MatchMetadata {
        &self.metadata
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, MatchState::Finished)
    }

    pub fn closed_rounds(&self) -> &[Round] {
        &self.closed_rounds
    }

    /// Every round in order, the open one last.
    pub fn rounds(&self) -> impl Iterator<Item = &Round> {
        self.closed_rounds
            .iter()
            .chain(core::iter::once(self.tracker.round()))
    }

    pub fn round_tracker(&self) -> &RoundTracker {
        &self.tracker
    }

    pub fn current_round_number(&self) -> u32 {
        self.tracker.round_number()
    }

    pub fn starting_player(&self) -> Option<Seat> {
        self.starting_seat
    }

    /// Seat that has to open the current round, if it is already decided.
    pub fn expected_starting_player(&self) -> Option<Seat> {
        if self.closed_rounds.is_empty() {
            None
        } else {
            self.starting_seat
        }
    }

    pub fn status(&self) -> RoundStatus {
        self.tracker.status()
    }

    pub fn set_starting_player(&mut self, seat: Seat) -> Result<()> {
        self.check_playing()?;
        if let Some(expected) = self.expected_starting_player() {
            if expected != seat {
                return Err(ScoreError::WrongStartingPlayer { expected });
            }
        }
        self.tracker.set_starting_player(seat)?;
        self.starting_seat = Some(seat);
        Ok(())
    }

    /// Opens a follow-up round with its predetermined starting player.
    pub fn begin_round(&mut self) -> Result<Seat> {
        let seat = self
            .expected_starting_player()
            .ok_or(ScoreError::InvalidTransition {
                state: self.tracker.state(),
            })?;
        self.set_starting_player(seat)?;
        Ok(seat)
    }

    pub fn set_active_shooter(&mut self, seat: Seat) -> Result<()> {
        self.check_playing()?;
        self.tracker.set_active_shooter(seat)
    }

    pub fn place_disc(&mut self, point: Point) -> Result<Disc> {
        self.check_playing()?;
        let classifier = self.classifier.as_ref().ok_or(ScoreError::SurfaceNotReady)?;
        self.tracker.place_disc(classifier, point)
    }

    /// Places a disc from a click on a displayed canvas of size `display`.
    pub fn place_disc_on_canvas(&mut self, click: Point, display: (f64, f64)) -> Result<Disc> {
        let canonical = self
            .classifier
            .as_ref()
            .map(|classifier| classifier.surface().size())
            .ok_or(ScoreError::SurfaceNotReady)?;
        self.place_disc(scale_to_canonical(click, display, canonical))
    }

    pub fn undo_last_disc(&mut self) -> Result<Disc> {
        self.check_playing()?;
        self.tracker.undo_last_disc()
    }

    pub fn save_shot(&mut self, shot_type: impl Into<String>) -> Result<&Shot> {
        self.check_playing()?;
        self.tracker.finalize_shot(shot_type)
    }

    pub fn undo_last_shot(&mut self) -> Result<Shot> {
        self.check_playing()?;
        self.tracker.undo_last_shot()
    }

    pub fn score_sheet(&self) -> RoundScores {
        RoundScores::blank(&self.metadata.players)
    }

    pub fn review_scores(&self, scores: &RoundScores) -> Result<Vec<ScoreError>> {
        self.check_playing()?;
        self.tracker.review_scores(scores)
    }

    /// Records the open round's scores and opens the next round. Returns the accepted warnings.
    pub fn submit_scores(
        &mut self,
        scores: RoundScores,
        policy: MismatchPolicy,
    ) -> Result<Vec<ScoreError>> {
        self.check_playing()?;
        let warnings = self.tracker.submit_scores(scores, policy)?;
        self.on_round_closed();
        Ok(warnings)
    }

    fn on_round_closed(&mut self) {
        let next = RoundTracker::new(self.tracker.round_number() + 1, &self.metadata.players);
        let closed = core::mem::replace(&mut self.tracker, next).into_round();
        self.closed_rounds.push(closed);
        self.starting_seat = self.starting_seat.map(Seat::other);

        let totals = self.total_points();
        log::debug!(
            "Round {} opened, match stands {}-{}",
            self.tracker.round_number(),
            totals.one,
            totals.two
        );
    }

    pub fn total_points(&self) -> PerPlayer<u32> {
        self.fold_scores(|score| score.points)
    }

    pub fn total_twenties(&self) -> PerPlayer<u32> {
        self.fold_scores(|score| score.twenties)
    }

    fn fold_scores(&self, value: impl Fn(&PlayerScore) -> u32) -> PerPlayer<u32> {
        self.closed_rounds
            .iter()
            .fold(PerPlayer::default(), |mut totals, round| {
                for seat in Seat::ALL {
                    totals[seat] = totals[seat].saturating_add(value(&round.scores[seat]));
                }
                totals
            })
    }

    pub fn export(&self) -> MatchRecord {
        MatchRecord::from_match(self)
    }

    /// Stops accepting events and returns the final record.
    pub fn end_match(&mut self) -> MatchRecord {
        if !self.is_finished() {
            self.state = MatchState::Finished;
            log::debug!(
                "Match {} ended after {} round(s)",
                self.metadata.match_id,
                self.closed_rounds.len()
            );
        }
        self.export()
    }

    fn check_playing(&self) -> Result<()> {
        if self.is_finished() {
            Err(ScoreError::MatchFinished)
        } else {
            Ok(())
        }
    }
}
