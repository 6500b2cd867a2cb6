use serde::{Deserialize, Serialize};

use crate::*;

/// Per-player counters of the open round.
///
/// Recounted from the round's shots plus the in-progress discs after every change.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTally {
    pub shots_taken: PerPlayer<u8>,
    pub discs: PerPlayer<u32>,
    pub twenties: PerPlayer<u32>,
}

impl RoundTally {
    pub fn recount(shots: &[Shot], in_progress: &[Disc]) -> Self {
        let mut tally = Self::default();
        for shot in shots {
            tally.shots_taken[shot.player_index] += 1;
            shot.discs.iter().for_each(|disc| tally.count_disc(disc));
        }
        in_progress.iter().for_each(|disc| tally.count_disc(disc));
        tally
    }

    fn count_disc(&mut self, disc: &Disc) {
        self.discs[disc.owner] += 1;
        if disc.is_twenty() {
            self.twenties[disc.owner] += 1;
        }
    }

    pub fn total_shots(&self) -> u8 {
        self.shots_taken.one + self.shots_taken.two
    }

    /// Both players have taken all their shots.
    pub fn is_complete(&self) -> bool {
        self.shots_taken.one >= SHOTS_PER_PLAYER && self.shots_taken.two >= SHOTS_PER_PLAYER
    }
}
