use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::metadata::or_placeholder;
use crate::*;

/// Disc as exported, with its owner resolved to the full player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscRecord {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub owner: Player,
    pub zone: String,
    pub points: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotRecord {
    pub player: String,
    pub player_index: Seat,
    pub discs: Vec<DiscRecord>,
    pub shot_type: String,
    pub shot_number: u8,
    pub round_number: u32,
    pub shot_count: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub round_number: u32,
    pub shots: Vec<ShotRecord>,
    pub scores: RoundScores,
}

/// Exportable flattening of a match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub metadata: MatchMetadata,
    pub rounds: Vec<RoundRecord>,
}

impl MatchRecord {
    /// Snapshot of `game`. The trailing round is left out while it has no shots.
    pub fn from_match<S: ClassificationSurface>(game: &Match<S>) -> Self {
        let metadata = game.metadata().clone();
        let players = &metadata.players;
        let mut rounds: Vec<_> = game
            .rounds()
            .map(|round| RoundRecord::new(round, players))
            .collect();
        if rounds.last().is_some_and(|round| round.shots.is_empty()) {
            rounds.pop();
        }
        Self { metadata, rounds }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn filename(&self) -> String {
        record_filename(&self.metadata)
    }
}

impl RoundRecord {
    fn new(round: &Round, players: &PerPlayer<Player>) -> Self {
        Self {
            round_number: round.round_number,
            shots: round
                .shots
                .iter()
                .map(|shot| ShotRecord::new(shot, players))
                .collect(),
            scores: round.scores.clone(),
        }
    }
}

impl ShotRecord {
    fn new(shot: &Shot, players: &PerPlayer<Player>) -> Self {
        Self {
            player: shot.player.clone(),
            player_index: shot.player_index,
            discs: shot
                .discs
                .iter()
                .map(|disc| DiscRecord {
                    id: disc.id,
                    x: disc.x,
                    y: disc.y,
                    owner: players[disc.owner].clone(),
                    zone: disc.zone.clone(),
                    points: disc.points,
                })
                .collect(),
            shot_type: shot.shot_type.clone(),
            shot_number: shot.shot_number,
            round_number: shot.round_number,
            shot_count: shot.shot_count,
        }
    }
}

/// `classified_<P1First><P2First>_<Year><MatchId>_<TournamentRound>.json`
pub fn record_filename(metadata: &MatchMetadata) -> String {
    let year = metadata
        .year()
        .map(|year| format!("{year}"))
        .unwrap_or_else(|| UNKNOWN_YEAR.into());
    format!(
        "classified_{}{}_{}{}_{}.json",
        metadata.players.one.first_name(),
        metadata.players.two.first_name(),
        year,
        or_placeholder(&metadata.match_id, UNKNOWN_MATCH),
        or_placeholder(&metadata.tournament_round, UNKNOWN_ROUND),
    )
}
