use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use signal_control_core::{CellPlacement, GridDimensions, LevelDescriptor};
use thiserror::Error;

const TRANSFER_DOMAIN: &str = "signal";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
pub(crate) const TRANSFER_HEADER: &str = "signal:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes the level into a single-line string suitable for sharing.
pub(crate) fn encode(level: &LevelDescriptor) -> Result<String, LevelTransferError> {
    let payload = SerializableLevel {
        action_limit: level.action_limit,
        cells: level.cells.clone(),
        tutorial: level.tutorial.clone(),
        hint: level.hint.clone(),
    };
    let json = serde_json::to_vec(&payload).map_err(LevelTransferError::Serialize)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{TRANSFER_HEADER}{FIELD_DELIMITER}{}x{}{FIELD_DELIMITER}{encoded}",
        level.columns, level.rows
    ))
}

/// Decodes a level from the provided string representation.
pub(crate) fn decode(value: &str) -> Result<LevelDescriptor, LevelTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LevelTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LevelTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LevelTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LevelTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LevelTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(LevelTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(LevelTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (columns, rows) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LevelTransferError::InvalidEncoding)?;
    let decoded: SerializableLevel =
        serde_json::from_slice(&bytes).map_err(LevelTransferError::InvalidPayload)?;

    Ok(LevelDescriptor {
        columns,
        rows,
        action_limit: decoded.action_limit,
        cells: decoded.cells,
        tutorial: decoded.tutorial,
        hint: decoded.hint,
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableLevel {
    action_limit: u32,
    cells: Vec<CellPlacement>,
    tutorial: Option<String>,
    hint: String,
}

/// Errors that can occur while encoding or decoding level transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LevelTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("transfer string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded level.
    #[error("transfer string is missing the prefix")]
    MissingPrefix,
    /// The encoded level did not contain a version segment.
    #[error("transfer string is missing the version")]
    MissingVersion,
    /// The encoded level did not include grid dimensions.
    #[error("transfer string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded level did not include the payload segment.
    #[error("transfer string is missing the payload")]
    MissingPayload,
    /// The encoded level used an unexpected prefix segment.
    #[error("transfer prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded level used an unsupported version identifier.
    #[error("transfer version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded level.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode level payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse level payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The level could not be serialised.
    #[error("could not serialise level payload: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LevelTransferError> {
    let invalid = || LevelTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    let grid = GridDimensions::new(columns, rows);
    if !grid.has_area() || !grid.within_cell_limit() {
        return Err(invalid());
    }

    Ok((columns, rows))
}
