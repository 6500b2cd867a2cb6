use alloc::format;
use alloc::string::String;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::*;

pub const UNKNOWN_PLAYER: &str = "UnknownPlayer";
pub const UNKNOWN_YEAR: &str = "UnknownYear";
pub const UNKNOWN_MATCH: &str = "UnknownMatch";
pub const UNKNOWN_ROUND: &str = "UnknownRound";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Top,
    Bottom,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Display color token used to draw the player's discs.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub side: Side,
}

impl Player {
    pub fn new(name: impl Into<String>, side: Side) -> Self {
        let color = match side {
            Side::Top => "#000000",
            Side::Bottom => "#FF0000",
        };
        Self {
            name: name.into(),
            color: color.into(),
            side,
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// First word of the name, used in export filenames.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(UNKNOWN_PLAYER)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    pub tournament_round: String,
    #[serde(default)]
    pub youtube_link: String,
    /// Derived from the match id and year when the match starts, kept for older readers.
    #[serde(default)]
    pub tournament_name: String,
    pub players: PerPlayer<Player>,
}

impl MatchMetadata {
    pub fn year(&self) -> Option<i32> {
        self.date.trim().parse::<NaiveDate>().ok().map(|date| date.year())
    }

    pub fn derived_tournament_name(&self) -> String {
        let year = self
            .year()
            .map(|year| format!("{year}"))
            .unwrap_or_else(|| UNKNOWN_YEAR.into());
        format!("{} {}", or_placeholder(&self.match_id, UNKNOWN_MATCH), year)
    }

    pub(crate) fn check_roster(&self) -> Result<()> {
        if self.players.iter().all(|(_, player)| player.has_name()) {
            Ok(())
        } else {
            Err(ScoreError::IncompleteRoster)
        }
    }
}

pub(crate) fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    match value.trim() {
        "" => placeholder,
        trimmed => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(date: &str, match_id: &str) -> MatchMetadata {
        MatchMetadata {
            match_id: match_id.into(),
            date: date.into(),
            players: PerPlayer::new(
                Player::new("Ann Lee", Side::Top),
                Player::new("", Side::Bottom),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn year_is_read_from_iso_date() {
        assert_eq!(metadata("2024-06-01", "M7").year(), Some(2024));
        assert_eq!(metadata("June 1st", "M7").year(), None);
    }

    #[test]
    fn tournament_name_uses_placeholders() {
        assert_eq!(metadata("2024-06-01", "M7").derived_tournament_name(), "M7 2024");
        assert_eq!(
            metadata("", " ").derived_tournament_name(),
            "UnknownMatch UnknownYear"
        );
    }

    #[test]
    fn roster_needs_two_names() {
        let mut data = metadata("", "");
        assert_eq!(data.check_roster(), Err(ScoreError::IncompleteRoster));

        data.players.two.name = "Bob".into();
        assert_eq!(data.check_roster(), Ok(()));
        assert_eq!(data.players.one.first_name(), "Ann");
    }

    #[test]
    fn player_defaults_fill_missing_fields() {
        let player: Player = serde_json::from_str(r#"{"name":"Cy"}"#).unwrap();

        assert_eq!(player.side, Side::Top);
        assert!(player.color.is_empty());
    }
}
