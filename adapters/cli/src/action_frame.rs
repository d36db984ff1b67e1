//! Decoding of the engine's action-frame JSON into core events.

use breachline_core::{Coord, Event, MobileKind, Owner, StationaryKind, UnitId, UnitKind};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Errors that make a whole action frame unusable.
#[derive(Debug, Error)]
pub(crate) enum FrameError {
    /// The frame was not valid JSON.
    #[error("action frame is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// The frame carried no `events` object.
    #[error("action frame has no `events` object")]
    MissingEvents,
}

/// Reasons a single event entry is skipped.
#[derive(Debug, Error, PartialEq, Eq)]
enum EntryError {
    #[error("entry is not an array")]
    NotAnArray,
    #[error("field {0} is missing or malformed")]
    Field(usize),
    #[error("unknown unit type {0}")]
    UnitType(u64),
    #[error("unknown player {0}")]
    Player(u64),
}

/// Decodes one frame, skipping malformed entries with a warning.
///
/// Breaches, spawns and deaths are emitted in that order, each list keeping
/// the frame's own ordering.
pub(crate) fn decode(frame: &str) -> Result<Vec<Event>, FrameError> {
    let root: Value = serde_json::from_str(frame)?;
    let events = root
        .get("events")
        .and_then(Value::as_object)
        .ok_or(FrameError::MissingEvents)?;

    let mut decoded = Vec::new();
    for (list, parse) in [
        ("breach", breach as fn(&[Value]) -> Result<Event, EntryError>),
        ("spawn", spawn),
        ("death", death),
    ] {
        let Some(entries) = events.get(list).and_then(Value::as_array) else {
            continue;
        };
        for (index, entry) in entries.iter().enumerate() {
            match entry.as_array().ok_or(EntryError::NotAnArray).and_then(|fields| parse(fields)) {
                Ok(event) => decoded.push(event),
                Err(error) => warn!(list, index, %error, "skipping malformed frame entry"),
            }
        }
    }

    Ok(decoded)
}

// [[x, y], damage, unit_type, unit_id, player]
fn breach(fields: &[Value]) -> Result<Event, EntryError> {
    Ok(Event::Breach {
        cell: cell(fields, 0)?,
        damage: number(fields, 1)? as f32,
        kind: unit_type(fields, 2)?,
        unit: unit_id(fields, 3)?,
        owner: player(fields, 4)?,
    })
}

// [[x, y], unit_type, unit_id, player]
fn spawn(fields: &[Value]) -> Result<Event, EntryError> {
    Ok(Event::Spawn {
        cell: cell(fields, 0)?,
        kind: unit_type(fields, 1)?,
        unit: unit_id(fields, 2)?,
        owner: player(fields, 3)?,
    })
}

// [[x, y], unit_type, unit_id, player, removed_by_owner]
fn death(fields: &[Value]) -> Result<Event, EntryError> {
    Ok(Event::Death {
        cell: cell(fields, 0)?,
        kind: unit_type(fields, 1)?,
        unit: unit_id(fields, 2)?,
        owner: player(fields, 3)?,
        removed_by_owner: fields.get(4).and_then(Value::as_bool).unwrap_or(false),
    })
}

fn cell(fields: &[Value], index: usize) -> Result<Coord, EntryError> {
    let pair = fields
        .get(index)
        .and_then(Value::as_array)
        .filter(|pair| pair.len() == 2)
        .ok_or(EntryError::Field(index))?;
    let axis = |value: &Value| {
        value
            .as_i64()
            .and_then(|raw| i32::try_from(raw).ok())
            .ok_or(EntryError::Field(index))
    };
    Ok(Coord::new(axis(&pair[0])?, axis(&pair[1])?))
}

fn number(fields: &[Value], index: usize) -> Result<f64, EntryError> {
    fields
        .get(index)
        .and_then(Value::as_f64)
        .ok_or(EntryError::Field(index))
}

fn integer(fields: &[Value], index: usize) -> Result<u64, EntryError> {
    fields
        .get(index)
        .and_then(Value::as_u64)
        .ok_or(EntryError::Field(index))
}

fn unit_type(fields: &[Value], index: usize) -> Result<UnitKind, EntryError> {
    let kind = match integer(fields, index)? {
        0 => StationaryKind::Filter.into(),
        1 => StationaryKind::Encryptor.into(),
        2 => StationaryKind::Destructor.into(),
        3 => MobileKind::Ping.into(),
        4 => MobileKind::Emp.into(),
        5 => MobileKind::Scrambler.into(),
        other => return Err(EntryError::UnitType(other)),
    };
    Ok(kind)
}

// The engine sends identifiers as decimal strings; bare numbers are accepted too.
fn unit_id(fields: &[Value], index: usize) -> Result<UnitId, EntryError> {
    let raw = match fields.get(index) {
        Some(Value::String(text)) => text.parse::<u32>().ok(),
        Some(Value::Number(number)) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    };
    raw.map(UnitId::new).ok_or(EntryError::Field(index))
}

fn player(fields: &[Value], index: usize) -> Result<Owner, EntryError> {
    match integer(fields, index)? {
        1 => Ok(Owner::Defender),
        2 => Ok(Owner::Opponent),
        other => Err(EntryError::Player(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breaches_decode_with_owner_mapping() {
        let frame = r#"{"events": {"breach": [
            [[13, 0], 1, 3, "41", 2],
            [[27, 13], 2.5, 4, "42", 1]
        ]}}"#;

        let events = decode(frame).expect("frame decodes");

        assert_eq!(
            events,
            vec![
                Event::Breach {
                    cell: Coord::new(13, 0),
                    damage: 1.0,
                    kind: MobileKind::Ping.into(),
                    unit: UnitId::new(41),
                    owner: Owner::Opponent,
                },
                Event::Breach {
                    cell: Coord::new(27, 13),
                    damage: 2.5,
                    kind: MobileKind::Emp.into(),
                    unit: UnitId::new(42),
                    owner: Owner::Defender,
                },
            ]
        );
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let frame = r#"{"events": {
            "breach": [
                "garbage",
                [[13], 1, 3, "1", 2],
                [[13, 0], 1, 9, "2", 2],
                [[13, 0], 1, 3, "3", 7],
                [[14, 0], 1, 3, "4", 2]
            ]
        }}"#;

        let events = decode(frame).expect("frame decodes");

        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Event::Breach { cell, .. } if cell == Coord::new(14, 0)
        ));
    }

    #[test]
    fn spawns_and_deaths_follow_breaches() {
        let frame = r#"{"events": {
            "death": [[[5, 8], 5, "9", 1, true]],
            "spawn": [[[13, 20], 2, "8", 2]],
            "breach": [[[13, 0], 1, 3, "7", 2]]
        }}"#;

        let events = decode(frame).expect("frame decodes");

        assert!(matches!(events[0], Event::Breach { .. }));
        assert_eq!(
            events[1],
            Event::Spawn {
                cell: Coord::new(13, 20),
                kind: StationaryKind::Destructor.into(),
                unit: UnitId::new(8),
                owner: Owner::Opponent,
            }
        );
        assert_eq!(
            events[2],
            Event::Death {
                cell: Coord::new(5, 8),
                kind: MobileKind::Scrambler.into(),
                unit: UnitId::new(9),
                owner: Owner::Defender,
                removed_by_owner: true,
            }
        );
    }

    #[test]
    fn frames_without_events_are_rejected() {
        assert!(matches!(decode("{}"), Err(FrameError::MissingEvents)));
        assert!(matches!(decode("not json"), Err(FrameError::InvalidJson(_))));
    }

    #[test]
    fn identifiers_accept_numbers() {
        let fields = [Value::from(12)];
        assert_eq!(unit_id(&fields, 0), Ok(UnitId::new(12)));
        assert_eq!(unit_id(&fields, 1), Err(EntryError::Field(1)));
    }
}
