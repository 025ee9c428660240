//! Single-line transfer encoding for custom maps.
//!
//! A map snapshot travels as `hunt:v1:<n>x<n>:<base64 payload>` where the
//! payload is a JSON document carrying the cell array and the teleport
//! pairs. The format is strict on decode: every field is validated into
//! typed values and malformed input surfaces as a specific
//! [`MapTransferError`]. Map strings are data, never evaluated.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wumpus_hunt_core::{CellCoord, CellKind};
use wumpus_hunt_world::{Grid, TeleportMap};

const SNAPSHOT_DOMAIN: &str = "hunt";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "hunt:v1";

/// Delimiter separating the prefix, grid dimensions, and payload.
const FIELD_DELIMITER: char = ':';

#[derive(Serialize, Deserialize)]
struct SerializableSnapshot {
    cells: Vec<CellKind>,
    teleports: Vec<(CellCoord, CellCoord)>,
}

/// Encodes the grid and its teleport pairing as a transferable line.
pub(crate) fn encode(grid: &Grid, teleports: &TeleportMap) -> String {
    let payload = SerializableSnapshot {
        cells: grid.cells().to_vec(),
        teleports: teleports.pairs().collect(),
    };
    let json = serde_json::to_vec(&payload).expect("map snapshot serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    let size = grid.size();
    format!("{SNAPSHOT_HEADER}{FIELD_DELIMITER}{size}x{size}{FIELD_DELIMITER}{encoded}")
}

/// Decodes a transfer line back into a grid and teleport map.
pub(crate) fn decode(value: &str) -> Result<(Grid, TeleportMap), MapTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MapTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(MapTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(MapTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(MapTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(MapTransferError::MissingPayload)?;

    if domain != SNAPSHOT_DOMAIN {
        return Err(MapTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != SNAPSHOT_VERSION {
        return Err(MapTransferError::UnsupportedVersion(version.to_owned()));
    }

    let size = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
    let decoded: SerializableSnapshot = serde_json::from_slice(&bytes)?;

    let expected = usize::try_from(u64::from(size) * u64::from(size)).unwrap_or(usize::MAX);
    if decoded.cells.len() != expected {
        return Err(MapTransferError::CellCountMismatch {
            expected,
            found: decoded.cells.len(),
        });
    }

    let mut grid = Grid::new(size);
    for (index, kind) in decoded.cells.iter().enumerate() {
        let row = u32::try_from(index / size as usize).unwrap_or(u32::MAX);
        let column = u32::try_from(index % size as usize).unwrap_or(u32::MAX);
        grid.set(CellCoord::new(row, column), *kind)
            .map_err(|_| MapTransferError::CellCountMismatch {
                expected,
                found: decoded.cells.len(),
            })?;
    }

    let mut teleports = TeleportMap::new();
    for (first, second) in decoded.teleports {
        for endpoint in [first, second] {
            if grid.get(endpoint) != Ok(CellKind::Teleport) {
                return Err(MapTransferError::MisplacedTeleport(endpoint));
            }
        }
        if !teleports.link(first, second) {
            return Err(MapTransferError::ConflictingTeleportPair(first));
        }
    }

    Ok((grid, teleports))
}

/// Parses the `<n>x<n>` dimension field into the square grid size.
fn parse_dimensions(value: &str) -> Result<u32, MapTransferError> {
    let invalid = || MapTransferError::InvalidDimensions(value.to_owned());
    let (columns, rows) = value.split_once('x').ok_or_else(invalid)?;
    let columns: u32 = columns.parse().map_err(|_| invalid())?;
    let rows: u32 = rows.parse().map_err(|_| invalid())?;
    if columns != rows || columns == 0 {
        return Err(invalid());
    }
    Ok(columns)
}

/// Failures raised while decoding a map transfer line.
#[derive(Debug, Error)]
pub(crate) enum MapTransferError {
    /// The input was empty or whitespace.
    #[error("map string is empty")]
    EmptyPayload,
    /// The domain prefix was absent.
    #[error("map string is missing the `{SNAPSHOT_DOMAIN}` prefix")]
    MissingPrefix,
    /// The version field was absent.
    #[error("map string is missing the format version")]
    MissingVersion,
    /// The dimension field was absent.
    #[error("map string is missing the grid dimensions")]
    MissingDimensions,
    /// The payload field was absent.
    #[error("map string is missing the payload")]
    MissingPayload,
    /// The domain prefix did not match.
    #[error("unrecognized map prefix `{0}`")]
    InvalidPrefix(String),
    /// The version is not one this build understands.
    #[error("unsupported map version `{0}`")]
    UnsupportedVersion(String),
    /// The dimension field did not parse as a square size.
    #[error("invalid grid dimensions `{0}`")]
    InvalidDimensions(String),
    /// The payload was not valid base64.
    #[error("payload is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The payload JSON did not parse.
    #[error("payload is not a valid map snapshot: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    /// The cell array does not fill the declared dimensions.
    #[error("cell array holds {found} cells but the dimensions require {expected}")]
    CellCountMismatch {
        /// Cells required by the declared dimensions.
        expected: usize,
        /// Cells present in the payload.
        found: usize,
    },
    /// A teleport pair endpoint does not sit on a teleport cell.
    #[error("teleport pair endpoint ({}, {}) is not a teleport cell", .0.row(), .0.column())]
    MisplacedTeleport(CellCoord),
    /// A teleport cell appeared in more than one pair or linked to itself.
    #[error("teleport cell ({}, {}) is paired more than once", .0.row(), .0.column())]
    ConflictingTeleportPair(CellCoord),
}
