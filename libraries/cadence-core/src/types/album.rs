//! Album types

use serde::{Deserialize, Serialize};

/// An album as listed by the catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(rename = "bgColour", default)]
    pub bg_colour: Option<String>,
    #[serde(default)]
    pub image: String,
}
