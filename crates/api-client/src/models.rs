//! Wire models for the Spaces API
//!
//! Field names follow the server's camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spaces_core::validation::{ValidationResult, Validator};
use spaces_geo::Location;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Largest radius a space may cover, in meters
pub const MAX_SPACE_RADIUS_M: f64 = 100.0;

/// Longest allowed space name, in characters
pub const MAX_SPACE_NAME_CHARS: usize = 40;

/// Firebase-style user identifier
pub type UserUid = String;

/// A geofenced space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: Uuid,
    pub name: String,
    pub theme_color_hexa_code: String,
    /// Radius in meters
    pub radius: f64,
    pub location: Location,
    pub admin_id: UserUid,
    pub created_at: DateTime<Utc>,
    /// Distance from the query location in meters, present on nearby results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// Payload for creating a space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSpace {
    pub name: String,
    pub theme_color_hexa_code: String,
    pub radius: f64,
    pub location: Location,
}

impl NewSpace {
    /// Checks every field, collecting all violations.
    pub fn validate(&self) -> ValidationResult {
        Validator::new()
            .required("name", &self.name)
            .max_chars("name", &self.name, MAX_SPACE_NAME_CHARS)
            .hex_color("themeColorHexaCode", &self.theme_color_hexa_code)
            .range("radius", self.radius, 0.0, MAX_SPACE_RADIUS_M)
            .range("location.latitude", self.location.latitude, -90.0, 90.0)
            .range("location.longitude", self.location.longitude, -180.0, 180.0)
            .validate()
    }
}

/// Reverse-geocoded address of a location
///
/// Every field is optional; unrecognised fields are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_hash: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Address {
    /// Best single-line rendering available
    pub fn display_line(&self) -> Option<String> {
        if let Some(formatted) = &self.formatted_address {
            return Some(formatted.clone());
        }
        let parts: Vec<&str> = [&self.street, &self.city, &self.country]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

/// Thread ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sorting {
    #[default]
    Recent,
    Popularity,
}

impl fmt::Display for Sorting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recent => f.write_str("recent"),
            Self::Popularity => f.write_str("popularity"),
        }
    }
}

/// A message inside a thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub thread_id: Uuid,
    pub sender_id: UserUid,
    pub content: String,
    #[serde(rename = "type", default = "default_message_type")]
    pub kind: String,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_thread_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

fn default_message_type() -> String {
    "text".to_string()
}

/// A thread, optionally carrying a page of its messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: Uuid,
    pub space_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_message: Option<Message>,
    #[serde(default)]
    pub messages_count: u32,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

/// A user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserUid,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Paging for thread listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadPage {
    pub sort: Sorting,
    pub offset: u32,
    pub count: u32,
}

impl Default for ThreadPage {
    fn default() -> Self {
        Self {
            sort: Sorting::Recent,
            offset: 0,
            count: 10,
        }
    }
}

/// Text message body sent when creating threads and messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextContent {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl TextContent {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: "text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSpace {
    pub space_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedToplevelThread {
    pub thread_id: Uuid,
    pub first_message_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedThread {
    pub thread_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedMessage {
    pub message_id: Uuid,
}
