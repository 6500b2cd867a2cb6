use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    AwaitingStartingPlayer,
    InProgress,
    AwaitingScoreEntry,
    Closed,
}

impl Default for RoundState {
    fn default() -> Self {
        Self::AwaitingStartingPlayer
    }
}

/// Final score line of one player for one round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub name: String,
    pub twenties: u32,
    pub points: u32,
}

pub type RoundScores = PerPlayer<PlayerScore>;

impl PerPlayer<PlayerScore> {
    /// Blank score sheet carrying the player names.
    pub fn blank(players: &PerPlayer<Player>) -> Self {
        players.map(|_, player| PlayerScore {
            name: player.name.clone(),
            ..Default::default()
        })
    }

    /// Saturates, so an oversized entry can never wrap into a valid total.
    pub fn total_points(&self) -> u32 {
        self.one.points.saturating_add(self.two.points)
    }

    pub fn total_twenties(&self) -> u32 {
        self.one.twenties.saturating_add(self.two.twenties)
    }
}

/// Whether a twenties mismatch stops a score submission.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MismatchPolicy {
    Reject,
    Accept,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub round_number: u32,
    pub shots: Vec<Shot>,
    pub scores: RoundScores,
}

impl Round {
    pub fn new(round_number: u32, players: &PerPlayer<Player>) -> Self {
        Self {
            round_number,
            shots: Vec::new(),
            scores: RoundScores::blank(players),
        }
    }

    pub fn shots_by(&self, seat: Seat) -> usize {
        self.shots
            .iter()
            .filter(|shot| shot.player_index == seat)
            .count()
    }

    /// Both players have taken exactly their eight shots.
    pub fn is_scoreable(&self) -> bool {
        Seat::ALL
            .iter()
            .all(|&seat| self.shots_by(seat) == SHOTS_PER_PLAYER as usize)
    }
}

/// Display snapshot of the open round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoundStatus {
    pub round_number: u32,
    pub state: RoundState,
    pub current_player: Option<Seat>,
    pub active_shooter: Option<Seat>,
    /// Shot number the current player is about to take.
    pub next_shot_number: Option<u8>,
    pub pending_discs: usize,
    pub tally: RoundTally,
}

/// State machine sequencing the shots of one round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundTracker {
    round: Round,
    state: RoundState,
    /// Seat whose turn it is.
    current: Option<Seat>,
    /// Seat credited with newly placed discs.
    active: Option<Seat>,
    builder: ShotBuilder,
    /// Active shooter at the moment each saved shot was taken, parallel to the round's shots.
    shooters: Vec<Seat>,
    tally: RoundTally,
}

impl RoundTracker {
    pub fn new(round_number: u32, players: &PerPlayer<Player>) -> Self {
        Self {
            round: Round::new(round_number, players),
            state: Default::default(),
            current: None,
            active: None,
            builder: ShotBuilder::new(),
            shooters: Vec::new(),
            tally: Default::default(),
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn into_round(self) -> Round {
        self.round
    }

    pub fn round_number(&self) -> u32 {
        self.round.round_number
    }

    pub fn current_player(&self) -> Option<Seat> {
        self.current
    }

    pub fn active_shooter(&self) -> Option<Seat> {
        self.active
    }

    pub fn pending_discs(&self) -> &[Disc] {
        self.builder.discs()
    }

    pub fn previous_discs(&self) -> &[Disc] {
        self.builder.previous_discs()
    }

    pub fn tally(&self) -> &RoundTally {
        &self.tally
    }

    pub fn status(&self) -> RoundStatus {
        RoundStatus {
            round_number: self.round.round_number,
            state: self.state,
            current_player: self.current,
            active_shooter: self.active,
            next_shot_number: self
                .current
                .filter(|_| matches!(self.state, RoundState::InProgress))
                .map(|seat| self.tally.shots_taken[seat] + 1),
            pending_discs: self.builder.discs().len(),
            tally: self.tally,
        }
    }

    pub fn set_starting_player(&mut self, seat: Seat) -> Result<()> {
        self.check_state(RoundState::AwaitingStartingPlayer)?;
        self.current = Some(seat);
        self.active = Some(seat);
        self.state = RoundState::InProgress;
        self.recount();
        log::debug!(
            "Round {}: player {} shoots first",
            self.round.round_number,
            seat.number()
        );
        Ok(())
    }

    /// Credits subsequent discs to `seat` without passing the turn.
    pub fn set_active_shooter(&mut self, seat: Seat) -> Result<()> {
        self.check_state(RoundState::InProgress)?;
        self.active = Some(seat);
        Ok(())
    }

    pub fn place_disc<S: ClassificationSurface>(
        &mut self,
        classifier: &ZoneClassifier<S>,
        point: Point,
    ) -> Result<Disc> {
        self.check_accepting_shots()?;
        let disc = self.builder.place_disc(classifier, point, self.active)?.clone();
        self.recount();
        Ok(disc)
    }

    pub fn undo_last_disc(&mut self) -> Result<Disc> {
        let disc = self.builder.undo_last_disc()?;
        self.recount();
        log::debug!("Removed disc {} ({})", disc.id, disc.zone);
        Ok(disc)
    }

    /// Saves the pending discs as the current player's shot and passes the turn.
    pub fn finalize_shot(&mut self, shot_type: impl Into<String>) -> Result<&Shot> {
        self.check_accepting_shots()?;
        let seat = self.current.ok_or(ScoreError::NoActiveShooter)?;
        if self.tally.is_complete() || self.tally.shots_taken[seat] >= SHOTS_PER_PLAYER {
            return Err(ScoreError::AllShotsTaken);
        }

        let numbering = ShotNumbering {
            round_number: self.round.round_number,
            shot_number: self.tally.shots_taken[seat] + 1,
            shot_count: self.round.shots.len() as u8 + 1,
        };
        let player = self.round.scores[seat].name.clone();
        let shot = self
            .builder
            .finalize_shot(player, seat, numbering, shot_type.into());
        self.round.shots.push(shot);
        self.shooters.push(self.active.unwrap_or(seat));

        let next = seat.other();
        self.current = Some(next);
        self.active = Some(next);
        self.recount();

        if self.round.is_scoreable() {
            self.state = RoundState::AwaitingScoreEntry;
            log::debug!("Round {} complete, awaiting scores", self.round.round_number);
        }

        let saved = &self.round.shots[self.round.shots.len() - 1];
        log::debug!(
            "Saved shot {} of round {} for {} with {} disc(s)",
            saved.shot_count,
            saved.round_number,
            saved.player,
            saved.discs.len()
        );
        Ok(saved)
    }

    /// Takes back the newest saved shot and reopens its discs for editing.
    pub fn undo_last_shot(&mut self) -> Result<Shot> {
        if !matches!(
            self.state,
            RoundState::InProgress | RoundState::AwaitingScoreEntry
        ) {
            return Err(ScoreError::NothingToUndo);
        }
        if !self.builder.is_empty() {
            return Err(ScoreError::ShotInProgress {
                discs: self.builder.discs().len(),
            });
        }

        let shot = self.round.shots.pop().ok_or(ScoreError::NothingToUndo)?;
        self.builder.reopen(&shot, self.round.shots.last());
        self.current = Some(shot.player_index);
        self.active = self.shooters.pop().or(Some(shot.player_index));
        self.state = RoundState::InProgress;
        self.recount();

        log::debug!(
            "Reopened shot {} of round {}",
            shot.shot_count,
            shot.round_number
        );
        Ok(shot)
    }

    /// Checks a score sheet without recording it. Hard failures are errors, the returned
    /// list holds the warnings the caller may choose to override.
    pub fn review_scores(&self, scores: &RoundScores) -> Result<Vec<ScoreError>> {
        self.check_state(RoundState::AwaitingScoreEntry)?;

        let total = scores.total_points();
        if total != POINTS_PER_ROUND {
            return Err(ScoreError::InvalidScoreSum { total });
        }

        Ok(Seat::ALL
            .iter()
            .filter_map(|&seat| {
                let entered = scores[seat].twenties;
                let tracked = self.tally.twenties[seat];
                (entered != tracked).then_some(ScoreError::TwentiesMismatch {
                    seat,
                    entered,
                    tracked,
                })
            })
            .collect())
    }

    /// Records the final scores and closes the round. Returns the warnings that were accepted.
    pub fn submit_scores(
        &mut self,
        mut scores: RoundScores,
        policy: MismatchPolicy,
    ) -> Result<Vec<ScoreError>> {
        let warnings = self.review_scores(&scores)?;
        if let (MismatchPolicy::Reject, Some(&warning)) = (policy, warnings.first()) {
            return Err(warning);
        }
        for warning in &warnings {
            log::warn!("Round {}: {}", self.round.round_number, warning);
        }

        for seat in Seat::ALL {
            if scores[seat].name.trim().is_empty() {
                scores[seat].name.clone_from(&self.round.scores[seat].name);
            }
        }
        self.round.scores = scores;
        self.state = RoundState::Closed;
        self.current = None;
        self.active = None;
        log::debug!(
            "Round {} closed {}-{}",
            self.round.round_number,
            self.round.scores.one.points,
            self.round.scores.two.points
        );
        Ok(warnings)
    }

    fn recount(&mut self) {
        self.tally = RoundTally::recount(&self.round.shots, self.builder.discs());
    }

    fn check_state(&self, expected: RoundState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ScoreError::InvalidTransition { state: self.state })
        }
    }

    fn check_accepting_shots(&self) -> Result<()> {
        match self.state {
            RoundState::AwaitingStartingPlayer => Err(ScoreError::NoActiveShooter),
            RoundState::InProgress => Ok(()),
            RoundState::AwaitingScoreEntry => Err(ScoreError::AllShotsTaken),
            RoundState::Closed => Err(ScoreError::InvalidTransition { state: self.state }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players() -> PerPlayer<Player> {
        PerPlayer::new(Player::new("Ann Lee", Side::Top), Player::new("Bob Ray", Side::Bottom))
    }

    fn classifier() -> ZoneClassifier<ReferenceSurface> {
        ZoneClassifier::new(ReferenceSurface::concentric())
    }

    fn started(seat: Seat) -> RoundTracker {
        let mut tracker = RoundTracker::new(1, &players());
        tracker.set_starting_player(seat).unwrap();
        tracker
    }

    fn play_full_round(tracker: &mut RoundTracker) {
        for _ in 0..SHOTS_PER_ROUND {
            tracker.finalize_shot("").unwrap();
        }
    }

    fn scores(one: u32, two: u32) -> RoundScores {
        let mut sheet = RoundScores::blank(&players());
        sheet.one.points = one;
        sheet.two.points = two;
        sheet
    }

    #[test]
    fn shots_alternate_from_starting_player() {
        let mut tracker = started(Seat::Two);

        let first = tracker.finalize_shot("Open").unwrap().clone();
        let second = tracker.finalize_shot("").unwrap().clone();

        assert_eq!(first.player_index, Seat::Two);
        assert_eq!(first.player, "Bob Ray");
        assert_eq!((first.shot_number, first.shot_count), (1, 1));
        assert_eq!(second.player_index, Seat::One);
        assert_eq!((second.shot_number, second.shot_count), (1, 2));
        assert_eq!(tracker.current_player(), Some(Seat::Two));
    }

    #[test]
    fn placement_before_start_has_no_shooter() {
        let mut tracker = RoundTracker::new(1, &players());

        let result = tracker.place_disc(&classifier(), Point::new(300.0, 250.0));

        assert_eq!(result, Err(ScoreError::NoActiveShooter));
        assert_eq!(tracker.finalize_shot(""), Err(ScoreError::NoActiveShooter));
    }

    #[test]
    fn starting_player_is_set_once() {
        let mut tracker = started(Seat::One);

        assert_eq!(
            tracker.set_starting_player(Seat::Two),
            Err(ScoreError::InvalidTransition {
                state: RoundState::InProgress
            })
        );
    }

    #[test]
    fn round_becomes_scoreable_after_sixteen_shots() {
        let mut tracker = started(Seat::One);

        for _ in 0..SHOTS_PER_ROUND - 1 {
            tracker.finalize_shot("").unwrap();
            assert_eq!(tracker.state(), RoundState::InProgress);
        }
        tracker.finalize_shot("").unwrap();

        assert_eq!(tracker.state(), RoundState::AwaitingScoreEntry);
        assert_eq!(tracker.tally().shots_taken, PerPlayer::new(8, 8));
        assert!(tracker.round().is_scoreable());
        assert_eq!(tracker.finalize_shot(""), Err(ScoreError::AllShotsTaken));
        assert_eq!(
            tracker.place_disc(&classifier(), Point::new(1.0, 1.0)),
            Err(ScoreError::AllShotsTaken)
        );
    }

    #[test]
    fn active_shooter_owns_discs_but_not_the_turn() {
        let classifier = classifier();
        let mut tracker = started(Seat::One);

        tracker.set_active_shooter(Seat::Two).unwrap();
        let disc = tracker.place_disc(&classifier, Point::new(300.0, 250.0)).unwrap();
        let shot = tracker.finalize_shot("").unwrap();

        assert_eq!(disc.owner, Seat::Two);
        assert_eq!(shot.player_index, Seat::One);
        assert_eq!(tracker.tally().twenties, PerPlayer::new(0, 1));
        assert_eq!(tracker.active_shooter(), Some(Seat::Two));
        assert_eq!(tracker.current_player(), Some(Seat::Two));
    }

    #[test]
    fn disc_undo_restores_counts() {
        let classifier = classifier();
        let mut tracker = started(Seat::One);
        tracker.place_disc(&classifier, Point::new(300.0, 170.0)).unwrap();
        let before = *tracker.tally();

        tracker.place_disc(&classifier, Point::new(300.0, 250.0)).unwrap();
        tracker.place_disc(&classifier, Point::new(302.0, 250.0)).unwrap();
        assert_eq!(tracker.tally().twenties.one, 2);
        tracker.undo_last_disc().unwrap();
        tracker.undo_last_disc().unwrap();

        assert_eq!(*tracker.tally(), before);
        assert_eq!(tracker.pending_discs().len(), 1);
    }

    #[test]
    fn shot_undo_restores_state_before_finalize() {
        let classifier = classifier();
        let mut tracker = started(Seat::One);
        tracker.place_disc(&classifier, Point::new(10.0, 10.0)).unwrap();
        tracker.finalize_shot("").unwrap();
        tracker.place_disc(&classifier, Point::new(300.0, 250.0)).unwrap();
        tracker.set_active_shooter(Seat::One).unwrap();
        tracker.place_disc(&classifier, Point::new(300.0, 170.0)).unwrap();
        let before = tracker.clone();

        tracker.finalize_shot("Take out").unwrap();
        let reopened = tracker.undo_last_shot().unwrap();

        assert_eq!(reopened.shot_type, "Take out");
        assert_eq!(tracker.round().shots, before.round().shots);
        assert_eq!(tracker.pending_discs(), before.pending_discs());
        assert_eq!(tracker.previous_discs(), before.previous_discs());
        assert_eq!(tracker.current_player(), before.current_player());
        assert_eq!(tracker.active_shooter(), before.active_shooter());
        assert_eq!(tracker.tally(), before.tally());
        assert_eq!(
            *tracker.tally(),
            RoundTally::recount(&tracker.round().shots, tracker.pending_discs())
        );
    }

    #[test]
    fn shot_undo_keeps_active_shooter_override() {
        let classifier = classifier();
        let mut tracker = started(Seat::One);
        tracker.set_active_shooter(Seat::Two).unwrap();
        tracker.place_disc(&classifier, Point::new(300.0, 250.0)).unwrap();

        tracker.finalize_shot("").unwrap();
        tracker.undo_last_shot().unwrap();

        assert_eq!(tracker.current_player(), Some(Seat::One));
        assert_eq!(tracker.active_shooter(), Some(Seat::Two));
        assert_eq!(tracker.pending_discs()[0].owner, Seat::Two);
    }

    #[test]
    fn shot_undo_needs_saved_shot_and_empty_pending() {
        let classifier = classifier();
        let mut tracker = started(Seat::One);
        assert_eq!(tracker.undo_last_shot(), Err(ScoreError::NothingToUndo));

        tracker.finalize_shot("").unwrap();
        tracker.place_disc(&classifier, Point::new(10.0, 10.0)).unwrap();

        assert_eq!(
            tracker.undo_last_shot(),
            Err(ScoreError::ShotInProgress { discs: 1 })
        );
    }

    #[test]
    fn undoing_last_shot_reopens_full_round() {
        let mut tracker = started(Seat::One);
        play_full_round(&mut tracker);

        let shot = tracker.undo_last_shot().unwrap();

        assert_eq!(shot.player_index, Seat::Two);
        assert_eq!(tracker.state(), RoundState::InProgress);
        assert_eq!(tracker.current_player(), Some(Seat::Two));
        assert_eq!(tracker.status().next_shot_number, Some(8));
    }

    #[test]
    fn oversized_scores_do_not_wrap_into_a_valid_sum() {
        let mut tracker = started(Seat::One);
        play_full_round(&mut tracker);

        assert_eq!(
            tracker.submit_scores(scores(u32::MAX, 3), MismatchPolicy::Reject),
            Err(ScoreError::InvalidScoreSum { total: u32::MAX })
        );
        assert_eq!(tracker.state(), RoundState::AwaitingScoreEntry);

        let mut sheet = scores(1, 1);
        sheet.one.twenties = u32::MAX;
        sheet.two.twenties = 1;
        assert_eq!(sheet.total_twenties(), u32::MAX);
    }

    #[test]
    fn scores_must_sum_to_two() {
        let mut tracker = started(Seat::One);
        play_full_round(&mut tracker);

        assert_eq!(
            tracker.submit_scores(scores(1, 2), MismatchPolicy::Reject),
            Err(ScoreError::InvalidScoreSum { total: 3 })
        );
        assert_eq!(tracker.state(), RoundState::AwaitingScoreEntry);

        let warnings = tracker
            .submit_scores(scores(2, 0), MismatchPolicy::Reject)
            .unwrap();
        assert!(warnings.is_empty());
        assert_eq!(tracker.state(), RoundState::Closed);
        assert_eq!(tracker.round().scores.one.points, 2);
    }

    #[test]
    fn scores_before_round_end_are_rejected() {
        let mut tracker = started(Seat::One);

        assert_eq!(
            tracker.submit_scores(scores(1, 1), MismatchPolicy::Accept),
            Err(ScoreError::InvalidTransition {
                state: RoundState::InProgress
            })
        );
    }

    #[test]
    fn twenties_mismatch_is_a_warning() {
        let classifier = classifier();
        let mut tracker = started(Seat::One);
        tracker.place_disc(&classifier, Point::new(300.0, 250.0)).unwrap();
        play_full_round(&mut tracker);

        let mut sheet = scores(1, 1);
        sheet.two.twenties = 2;
        let mismatch_one = ScoreError::TwentiesMismatch {
            seat: Seat::One,
            entered: 0,
            tracked: 1,
        };

        assert_eq!(
            tracker.submit_scores(sheet.clone(), MismatchPolicy::Reject),
            Err(mismatch_one)
        );
        assert_eq!(tracker.state(), RoundState::AwaitingScoreEntry);

        let warnings = tracker
            .submit_scores(sheet, MismatchPolicy::Accept)
            .unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(ScoreError::is_warning));
        assert_eq!(tracker.state(), RoundState::Closed);
    }
}
