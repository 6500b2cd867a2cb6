use core::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};

use crate::ScoreError;

/// Single axis of the reference surface, in whole pixels.
pub type Dim = u32;

/// Two-dimensional pixel coordinates or extents `(x, y)`.
pub type Dim2 = (Dim, Dim);

/// Extent of the canonical classification surface.
pub const CANONICAL_SIZE: Dim2 = (600, 500);

pub const SHOTS_PER_PLAYER: u8 = 8;
pub const SHOTS_PER_ROUND: u8 = 2 * SHOTS_PER_PLAYER;

/// Points handed out per round: 2-0 for a win, 1-1 on a tie.
pub const POINTS_PER_ROUND: u32 = 2;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Dim2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0 as usize, self.1 as usize]
    }
}

/// One of the two player positions at the board.
///
/// Shots refer to seats by zero-based index, per-player maps by one-based number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub const ALL: [Seat; 2] = [Seat::One, Seat::Two];

    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::One),
            1 => Some(Self::Two),
            _ => None,
        }
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> Self {
        seat.index() as u8
    }
}

impl TryFrom<u8> for Seat {
    type Error = ScoreError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::from_index(index.into()).ok_or(ScoreError::InvalidSeat { index })
    }
}

/// A value held once per seat, serialized as `{"1": .., "2": ..}`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    #[serde(rename = "1")]
    pub one: T,
    #[serde(rename = "2")]
    pub two: T,
}

impl<T> PerPlayer<T> {
    pub const fn new(one: T, two: T) -> Self {
        Self { one, two }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Seat, &T) -> U) -> PerPlayer<U> {
        PerPlayer {
            one: f(Seat::One, &self.one),
            two: f(Seat::Two, &self.two),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        [(Seat::One, &self.one), (Seat::Two, &self.two)].into_iter()
    }
}

impl<T> Index<Seat> for PerPlayer<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        match seat {
            Seat::One => &self.one,
            Seat::Two => &self.two,
        }
    }
}

impl<T> IndexMut<Seat> for PerPlayer<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        match seat {
            Seat::One => &mut self.one,
            Seat::Two => &mut self.two,
        }
    }
}

/// A position on the board in canonical surface units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when both axes differ by at most `tolerance`.
    pub fn is_near(self, other: Point, tolerance: f64) -> bool {
        let within = |delta: f64| -tolerance <= delta && delta <= tolerance;
        within(self.x - other.x) && within(self.y - other.y)
    }
}

/// Maps a click on a displayed canvas of `display` size into canonical units.
///
/// A degenerate display axis leaves that coordinate unscaled.
pub fn scale_to_canonical(click: Point, display: (f64, f64), canonical: Dim2) -> Point {
    let scale = |value: f64, shown: f64, target: Dim| {
        if shown > 0.0 {
            value * f64::from(target) / shown
        } else {
            value
        }
    };
    Point {
        x: scale(click.x, display.0, canonical.0),
        y: scale(click.y, display.1, canonical.1),
    }
}

/// Reference color sampled from the classification surface.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// True when every channel lies within `tolerance` of `other`.
    pub const fn is_close_to(self, other: Rgb, tolerance: u8) -> bool {
        self.0.abs_diff(other.0) <= tolerance
            && self.1.abs_diff(other.1) <= tolerance
            && self.2.abs_diff(other.2) <= tolerance
    }
}
