//! Map grammar: text lines and JSON documents into [`CityRecord`]s.
//!
//! The text form has one city per line:
//!
//! ```text
//! Foo north=Bar west=Baz south=Qu-ux
//! Bar south=Foo west=Bee
//! ```
//!
//! Each line is a name followed by up to four `direction=city` tokens
//! separated by whitespace. Blank lines in a document are skipped.
//!
//! The JSON form is an array of records:
//!
//! ```json
//! [{ "name": "Foo", "roads": [{ "direction": "north", "to": "Bar" }] }]
//! ```
//!
//! Both forms enforce the same rules through [`CityRecord::validate`].

use crate::direction::Direction;
use crate::error::{ParseError, WorldError};
use crate::record::{CityRecord, RoadRecord};

/// A name plus one road per direction.
const MAX_SEGMENTS: usize = 5;

/// Parse a single line of the text grammar.
///
/// # Errors
///
/// Returns [`ParseError::EmptyLine`] for a blank line,
/// [`ParseError::TooManySegments`] for more than five segments,
/// [`ParseError::InvalidRoad`] for a token that is not `direction=city`,
/// [`ParseError::UnknownDirection`] for an unrecognized direction, and any
/// error from [`CityRecord::validate`].
pub fn parse_line(line: &str) -> Result<CityRecord, ParseError> {
    let segments: Vec<&str> = line.split_whitespace().collect();
    if segments.len() > MAX_SEGMENTS {
        return Err(ParseError::TooManySegments(segments.len()));
    }

    let Some((name, roads)) = segments.split_first() else {
        return Err(ParseError::EmptyLine);
    };

    let mut record = CityRecord::new(*name);
    for token in roads {
        record.roads.push(parse_road(token)?);
    }
    record.validate()?;
    Ok(record)
}

/// Parse a `direction=city` token.
fn parse_road(token: &str) -> Result<RoadRecord, ParseError> {
    let mut parts = token.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(direction), Some(to), None) if !direction.is_empty() && !to.is_empty() => {
            Ok(RoadRecord {
                direction: direction.parse::<Direction>()?,
                to: to.to_owned(),
            })
        }
        _ => Err(ParseError::InvalidRoad(token.to_owned())),
    }
}

/// Parse a whole text map, one record per non-blank line.
///
/// # Errors
///
/// Returns [`ParseError::AtLine`] wrapping the first failing line.
pub fn parse_document(input: &str) -> Result<Vec<CityRecord>, ParseError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            parse_line(line).map_err(|source| ParseError::AtLine {
                line: index.saturating_add(1),
                source: Box::new(source),
            })
        })
        .collect()
}

/// Parse a JSON map: an array of [`CityRecord`] objects.
///
/// # Errors
///
/// Returns [`WorldError::Json`] if the document is not valid JSON of the
/// expected shape, or [`WorldError::Parse`] wrapping
/// [`ParseError::AtRecord`] for the first record that fails validation.
pub fn parse_json(input: &str) -> Result<Vec<CityRecord>, WorldError> {
    let records: Vec<CityRecord> = serde_json::from_str(input)?;
    for (index, record) in records.iter().enumerate() {
        record.validate().map_err(|source| ParseError::AtRecord {
            index,
            source: Box::new(source),
        })?;
    }
    Ok(records)
}

/// Encode records as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`WorldError::Json`] if serialization fails.
pub fn records_to_json(records: &[CityRecord]) -> Result<String, WorldError> {
    Ok(serde_json::to_string_pretty(records)?)
}
