//! Persistence of events, rounds and card packs.
//!
//! Two formats are supported:
//! - a versioned binary save that captures the full state, and
//! - a JSON/YAML export limited to the prize configuration.

pub mod binary;
pub mod documents;
pub mod errors;
pub mod save_version;

use serde::{Serialize, de::DeserializeOwned};
use std::io::{Read, Write};

pub use errors::{Result, SerializationError};
pub use save_version::{Layout, SaveVersion};

use crate::game::entities::Number;

/// Capability shared by everything that can be saved.
///
/// `read` decodes the layout of `version` and replaces `self` only once the
/// whole record decoded. `write` always emits the current layout.
pub trait Serializable {
    /// Serde shape used by the JSON and YAML exports.
    type Document: Serialize + DeserializeOwned;

    fn read<R: Read>(&mut self, reader: &mut R, version: SaveVersion) -> Result<()>;

    fn write<W: Write>(&self, writer: &mut W) -> Result<()>;

    fn to_document(&self) -> Self::Document;

    fn apply_document(&mut self, document: Self::Document) -> Result<()>;

    fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.to_document())?)
    }

    fn from_json(&mut self, value: serde_json::Value) -> Result<()> {
        let document = serde_json::from_value(value)?;
        self.apply_document(document)
    }

    fn to_yaml(&self) -> Result<serde_yaml::Value> {
        Ok(serde_yaml::to_value(self.to_document())?)
    }

    fn from_yaml(&mut self, value: serde_yaml::Value) -> Result<()> {
        let document = serde_yaml::from_value(value)?;
        self.apply_document(document)
    }
}

/// Spreads draws that old saves stored once per round over the round's
/// sub-rounds: consecutive chunks of equal size, the last one possibly
/// shorter. Returns `parts` lists.
#[must_use]
pub fn split_legacy_draws(draws: &[Number], parts: usize) -> Vec<Vec<Number>> {
    if parts == 0 {
        return Vec::new();
    }
    let chunk = draws.len().div_ceil(parts).max(1);
    let mut split: Vec<Vec<Number>> = draws.chunks(chunk).map(<[Number]>::to_vec).collect();
    split.resize(parts, Vec::new());
    split
}
