//! Document shapes for the JSON and YAML exports.
//!
//! These only carry the prize configuration of an event. Identity fields,
//! statuses and timestamps are not part of the export.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct EventDocument {
    #[serde(default)]
    pub rounds: Vec<RoundDocument>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RoundDocument {
    /// Localized round type name, e.g. `"normale"`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "Id", default)]
    pub id: i32,
    #[serde(rename = "subGames", default)]
    pub sub_games: Vec<SubRoundDocument>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SubRoundDocument {
    /// Localized sub-round type name, e.g. `"carton plein"`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub prices: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub winner: String,
    #[serde(default)]
    pub draws: Vec<u8>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CardPackDocument {
    #[serde(default)]
    pub name: String,
    /// Cards in their `;`-separated text form.
    #[serde(default)]
    pub cards: Vec<String>,
}
