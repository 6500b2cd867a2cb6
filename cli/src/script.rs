use anyhow::{Context, Result, bail};
use crokinole_core::*;
use serde::Deserialize;

/// A recorded session: match setup followed by the user events in the order they happened.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct Script {
    pub metadata: MatchMetadata,
    /// Displayed canvas size the clicks were taken on. Clicks are canonical when absent.
    #[serde(default)]
    pub canvas: Option<Canvas>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct Canvas {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub(crate) enum Event {
    /// Pick who shoots first; without a player the predetermined starter opens the round.
    Start { player: Option<u8> },
    Shooter { player: u8 },
    Place { x: f64, y: f64 },
    UndoDisc,
    Save {
        #[serde(default)]
        shot_type: String,
    },
    UndoShot,
    Scores {
        points: [u32; 2],
        /// Falls back to the tracked counts when omitted.
        twenties: Option<[u32; 2]>,
        #[serde(default)]
        accept_mismatch: bool,
    },
    End,
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Shooter { .. } => "shooter",
            Self::Place { .. } => "place",
            Self::UndoDisc => "undo-disc",
            Self::Save { .. } => "save",
            Self::UndoShot => "undo-shot",
            Self::Scores { .. } => "scores",
            Self::End => "end",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ReplayOptions {
    /// Log rejected events and carry on instead of aborting.
    pub keep_going: bool,
    /// Accept twenties mismatches for every score entry.
    pub accept_mismatch: bool,
}

impl Script {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid session script")
    }

    pub fn replay(&self, options: ReplayOptions) -> Result<Match> {
        let mut game = Match::start(self.metadata.clone())
            .context("Cannot start match")?
            .with_surface(ReferenceSurface::concentric());

        let mut rejected = 0;
        for (number, event) in self.events.iter().enumerate() {
            if game.is_finished() {
                log::warn!("Ignoring {} event(s) after the match ended", self.events.len() - number);
                break;
            }
            match self.apply(&mut game, event, options) {
                Ok(()) => {}
                Err(err) if options.keep_going => {
                    rejected += 1;
                    log::warn!("Event #{} ({}) rejected: {:#}", number + 1, event.name(), err);
                }
                Err(err) => {
                    return Err(err.context(format!("Event #{} ({})", number + 1, event.name())));
                }
            }
        }

        if rejected > 0 {
            log::warn!("{rejected} event(s) were rejected");
        }
        Ok(game)
    }

    fn apply(&self, game: &mut Match, event: &Event, options: ReplayOptions) -> Result<()> {
        match event {
            Event::Start { player: Some(player) } => game.set_starting_player(seat(*player)?)?,
            Event::Start { player: None } => {
                let seat = game.begin_round()?;
                log::info!("Round {}: player {} starts", game.current_round_number(), seat.number());
            }
            Event::Shooter { player } => game.set_active_shooter(seat(*player)?)?,
            Event::Place { x, y } => {
                let click = Point::new(*x, *y);
                let disc = match self.canvas {
                    Some(canvas) => game.place_disc_on_canvas(click, (canvas.width, canvas.height))?,
                    None => game.place_disc(click)?,
                };
                log::info!(
                    "Disc {} for player {}: {} ({} points)",
                    disc.id,
                    disc.owner.number(),
                    disc.zone,
                    disc.points
                );
            }
            Event::UndoDisc => {
                game.undo_last_disc()?;
            }
            Event::Save { shot_type } => {
                let shot = game.save_shot(shot_type.as_str())?;
                log::info!(
                    "Shot {} saved for {} ({} disc(s))",
                    shot.shot_count,
                    shot.player,
                    shot.discs.len()
                );
            }
            Event::UndoShot => {
                game.undo_last_shot()?;
            }
            Event::Scores {
                points,
                twenties,
                accept_mismatch,
            } => {
                let tracked = game.round_tracker().tally().twenties;
                let mut sheet = game.score_sheet();
                for seat in Seat::ALL {
                    sheet[seat].points = points[seat.index()];
                    sheet[seat].twenties = twenties.map_or(tracked[seat], |entered| entered[seat.index()]);
                }
                let policy = if *accept_mismatch || options.accept_mismatch {
                    MismatchPolicy::Accept
                } else {
                    MismatchPolicy::Reject
                };
                let round = game.current_round_number();
                game.submit_scores(sheet, policy)?;
                let totals = game.total_points();
                log::info!("Round {round} scored, match stands {}-{}", totals.one, totals.two);
            }
            Event::End => {
                let record = game.end_match();
                log::info!("Match ended with {} recorded round(s)", record.rounds.len());
            }
        }
        Ok(())
    }
}

fn seat(player: u8) -> Result<Seat> {
    match player {
        1 => Ok(Seat::One),
        2 => Ok(Seat::Two),
        _ => bail!("Player must be 1 or 2, got {player}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../sessions/sample.toml");

    const STRICT: ReplayOptions = ReplayOptions {
        keep_going: false,
        accept_mismatch: false,
    };

    #[test]
    fn sample_session_replays() {
        let script = Script::parse(SAMPLE).unwrap();
        let game = script.replay(STRICT).unwrap();

        assert!(game.is_finished());
        let record = game.export();
        assert_eq!(record.rounds.len(), 2);
        assert_eq!(record.rounds[0].shots.len(), 16);
        assert_eq!(record.rounds[1].shots.len(), 1);
        assert_eq!(game.total_points(), PerPlayer::new(2, 0));
        assert_eq!(record.rounds[0].shots[0].discs[0].zone, "Open 20");
        assert_eq!(record.rounds[1].shots[0].player_index, Seat::Two);
    }

    #[test]
    fn canvas_clicks_are_scaled() {
        let script = Script::parse(
            r#"
            [metadata]
            matchId = "1"
            date = ""
            tournamentRound = ""
            players."1".name = "Ann"
            players."2".name = "Bob"

            [canvas]
            width = 300
            height = 250

            [[events]]
            type = "start"
            player = 1

            [[events]]
            type = "place"
            x = 150
            y = 125
            "#,
        )
        .unwrap();

        let game = script.replay(STRICT).unwrap();
        let disc = &game.round_tracker().pending_discs()[0];

        assert_eq!(disc.position(), Point::new(300.0, 250.0));
        assert_eq!(disc.points, 20);
    }

    #[test]
    fn strict_replay_stops_at_rejected_event() {
        let mut script = Script::parse(SAMPLE).unwrap();
        script.events.insert(1, Event::UndoShot);

        let err = script.replay(STRICT).unwrap_err();

        assert!(format!("{err:#}").contains("Event #2 (undo-shot)"));
        assert_eq!(
            err.root_cause().downcast_ref::<ScoreError>(),
            Some(&ScoreError::NothingToUndo)
        );
    }

    #[test]
    fn keep_going_skips_rejected_events() {
        let mut script = Script::parse(SAMPLE).unwrap();
        script.events.insert(1, Event::Shooter { player: 3 });

        let options = ReplayOptions {
            keep_going: true,
            ..STRICT
        };

        assert!(script.replay(options).unwrap().is_finished());
    }

    #[test]
    fn mismatched_twenties_need_acceptance() {
        let mut script = Script::parse(SAMPLE).unwrap();
        for event in &mut script.events {
            if let Event::Scores { twenties, .. } = event {
                *twenties = Some([0, 5]);
            }
        }

        let err = script.replay(STRICT).unwrap_err();
        assert!(matches!(
            err.root_cause().downcast_ref::<ScoreError>(),
            Some(ScoreError::TwentiesMismatch { .. })
        ));

        let options = ReplayOptions {
            accept_mismatch: true,
            ..STRICT
        };
        assert!(script.replay(options).is_ok());
    }
}
