//! Panel geometry: how big a board is and where it travels.
//!
//! Everything here is a pure function of the board's position, its
//! requested size, the screen size and the handle width.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::Size;

/// Strip of a closed board that stays on screen.
pub const HANDLE_WIDTH: i32 = 50;

/// Screen edge a board slides in from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

impl Position {
    pub const ALL: [Position; 4] = [Position::Left, Position::Right, Position::Top, Position::Bottom];

    /// Name used in saved properties and config files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Position::Left => "left",
            Position::Right => "right",
            Position::Top => "top",
            Position::Bottom => "bottom",
        }
    }

    /// Left and right boards slide along x, top and bottom along y.
    pub const fn slides_horizontally(self) -> bool {
        matches!(self, Position::Left | Position::Right)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::Deserialization(format!("unknown position {s:?}")))
    }
}

/// Start and end values of the open and close travel along the sliding axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchors {
    pub open_start: i32,
    pub open_end: i32,
    pub close_start: i32,
    pub close_end: i32,
}

/// Board size: the requested extent (or the screen's, where 0 was asked
/// for) plus the handle on the sliding axis.
pub fn compute_size(position: Position, requested: Size, screen: Size, handle: i32) -> Size {
    let base = Size::new(
        if requested.width == 0 { screen.width } else { requested.width },
        if requested.height == 0 { screen.height } else { requested.height },
    );

    if position.slides_horizontally() {
        base + Size::new(handle, 0)
    } else {
        base + Size::new(0, handle)
    }
}

/// Travel anchors. Closing retraces the opening path backwards.
pub fn compute_anchors(position: Position, requested: Size, screen: Size, handle: i32) -> Anchors {
    let (open_start, open_end) = match position {
        Position::Left => (
            if requested.width == 0 { -screen.width } else { -requested.width },
            0,
        ),
        Position::Right => (
            screen.width - handle,
            if requested.width == 0 { -handle } else { screen.width - requested.width - handle },
        ),
        Position::Top => (
            if requested.height == 0 { -screen.height } else { -requested.height },
            0,
        ),
        Position::Bottom => (
            screen.height - handle,
            if requested.height == 0 { -handle } else { screen.height - requested.height - handle },
        ),
    };

    Anchors { open_start, open_end, close_start: open_end, close_end: open_start }
}
