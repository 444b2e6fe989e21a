#![allow(clippy::missing_errors_doc)]

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use tanabata_core::{Command, OreVeinPlacement, TowerPlacement};
use tanabata_world::{query, World, MAX_MAP_RADIUS};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "tanabata";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "tanabata:v1";
/// Delimiter used to separate the prefix, map radius and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of the towers and ore veins placed on a map.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LayoutSnapshot {
    /// Radius of the hexagonal map hosting the layout.
    pub(crate) radius: u32,
    /// Towers composing the layout.
    pub(crate) towers: Vec<TowerPlacement>,
    /// Ore veins composing the layout.
    pub(crate) veins: Vec<OreVeinPlacement>,
}

impl LayoutSnapshot {
    /// Captures the layout currently standing in the world.
    pub(crate) fn capture(world: &World) -> Self {
        Self {
            radius: query::map(world).radius(),
            towers: query::tower_view(world)
                .iter()
                .map(|tower| TowerPlacement {
                    kind: tower.kind,
                    hex: tower.hex,
                })
                .collect(),
            veins: query::ore_view(world)
                .iter()
                .map(|vein| OreVeinPlacement {
                    hex: vein.hex,
                    power: vein.power,
                })
                .collect(),
        }
    }

    /// Commands that rebuild the layout inside a world.
    pub(crate) fn into_commands(self) -> Vec<Command> {
        vec![
            Command::ConfigureMap {
                radius: self.radius,
            },
            Command::LoadLayout {
                towers: self.towers,
                veins: self.veins,
            },
        ]
    }

    /// Encodes the snapshot into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = SerializableSnapshot {
            towers: self.towers.clone(),
            veins: self.veins.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::Serialize)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!("{SNAPSHOT_HEADER}:{}:{encoded}", self.radius))
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let radius = parts.next().ok_or(LayoutTransferError::MissingRadius)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let radius = parse_radius(radius)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: SerializableSnapshot =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            radius,
            towers: decoded.towers,
            veins: decoded.veins,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSnapshot {
    #[serde(default)]
    towers: Vec<TowerPlacement>,
    #[serde(default)]
    veins: Vec<OreVeinPlacement>,
}

/// Errors that can occur while encoding or decoding layout transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout payload was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include the map radius.
    #[error("layout string is missing the map radius")]
    MissingRadius,
    /// The encoded snapshot did not include the payload segment.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The map radius was malformed or outside the supported range.
    #[error("map radius '{0}' is not a number between 1 and {max}", max = MAX_MAP_RADIUS)]
    InvalidRadius(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The layout could not be serialised.
    #[error("could not serialise layout: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn parse_radius(radius: &str) -> Result<u32, LayoutTransferError> {
    match radius.trim().parse::<u32>() {
        Ok(value) if (1..=MAX_MAP_RADIUS).contains(&value) => Ok(value),
        _ => Err(LayoutTransferError::InvalidRadius(radius.to_owned())),
    }
}
