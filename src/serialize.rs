// Save/load hook for boards.
// Generic widget properties travel as an ordered list of name/value pairs;
// a board owns exactly one of them, "position".

use crate::error::{Error, Result};
use crate::geometry::Position;
use crate::sideboard::SideBoard;
use crate::types::Size;

pub type Properties = Vec<(String, String)>;

pub const POSITION_PROPERTY: &str = "position";

/// Append the board's own properties.
pub fn serialize(board: &SideBoard, props: &mut Properties) {
    props.push((POSITION_PROPERTY.to_string(), board.position().as_str().to_string()));
}

/// Consume every "position" entry from `props` and apply the last one.
///
/// The entries are removed even when one is malformed; the board is only
/// touched when all of them parse.
pub fn deserialize(board: &mut SideBoard, props: &mut Properties) -> Result<()> {
    let mut values = Vec::new();
    props.retain(|(name, value)| {
        if name == POSITION_PROPERTY {
            values.push(value.clone());
            false
        } else {
            true
        }
    });

    let mut parsed = None;
    for value in &values {
        parsed = Some(value.parse::<Position>()?);
    }
    if let Some(position) = parsed {
        board.set_position(position);
    }
    Ok(())
}

/// Build a board from saved properties: default geometry and transitions,
/// then whatever the properties say.
pub fn from_properties(props: &mut Properties, screen: Size) -> Result<SideBoard> {
    let mut board = SideBoard::new(Position::default(), Size::default(), screen);
    deserialize(&mut board, props)?;
    Ok(board)
}

/// Single value lookup for callers that only want to peek.
pub fn position_of(props: &Properties) -> Result<Option<Position>> {
    props
        .iter()
        .rev()
        .find(|(name, _)| name == POSITION_PROPERTY)
        .map(|(_, value)| value.parse::<Position>())
        .transpose()
        .map_err(|e| match e {
            Error::Deserialization(msg) => Error::Deserialization(format!("{POSITION_PROPERTY}: {msg}")),
            other => other,
        })
}
