//! Scoring engine for recording Crokinole matches shot by shot.
//!
//! A [`Match`] sequences rounds; each round is driven by a [`RoundTracker`] that collects discs
//! through a [`ShotBuilder`], classifies them with a [`ZoneClassifier`] and keeps the per-player
//! [`RoundTally`]. Finished matches are flattened into a [`MatchRecord`].

#![no_std]

extern crate alloc;

pub use error::*;
pub use metadata::*;
pub use record::*;
pub use round::*;
pub use session::*;
pub use shot::*;
pub use surface::*;
pub use tally::*;
pub use types::*;
pub use zone::*;

mod error;
mod metadata;
mod record;
mod round;
mod session;
mod shot;
mod surface;
mod tally;
mod types;
mod zone;
