//! JSON shapes exchanged with the ShiiruMax API

use std::fmt;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use crate::error::ProbeResult;

/// Identifier of a resource created by the service.
///
/// The service may hand ids back as strings or as numbers; both are kept in
/// their string form, which is what path interpolation needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct ResourceId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for ResourceId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => ResourceId(s),
            RawId::Number(n) => ResourceId(n.to_string()),
        }
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        ResourceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Request bodies

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewGame {
    pub name: String,
    #[serde(rename = "type")]
    pub game_type: String,
    pub logo_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMatch {
    pub game_id: ResourceId,
    pub team1_name: String,
    pub team2_name: String,
    /// ISO-8601 local timestamp
    pub match_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBet {
    pub match_id: ResourceId,
    pub odds_team1: f64,
    pub odds_team2: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OddsUpdate {
    pub odds_team1: f64,
    pub odds_team2: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaceBetRequest {
    pub team_selected: String,
    pub amount_ecus: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub winner: String,
}

// Response bodies; only the fields the battery reads are modelled

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSummary {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub balance_ecus: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: f64,
    #[serde(default)]
    pub total_matches: f64,
    #[serde(default)]
    pub total_bets: f64,
    #[serde(default)]
    pub total_ecus_circulation: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedGame {
    pub id: ResourceId,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedMatch {
    pub id: ResourceId,
    #[serde(default)]
    pub team1_name: String,
    #[serde(default)]
    pub team2_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedBet {
    pub id: ResourceId,
    #[serde(default)]
    pub odds_team1: f64,
    #[serde(default)]
    pub odds_team2: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacedBet {
    pub user_bet: UserBetSummary,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserBetSummary {
    pub id: ResourceId,
    #[serde(default)]
    pub potential_win: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub balance_ecus: Option<f64>,
}

/// Decode a payload into `T`, or `None` if required fields are missing
pub fn decode<T: DeserializeOwned>(payload: &Value) -> Option<T> {
    T::deserialize(payload).ok()
}

/// Length of a JSON array payload, 0 for anything else
pub fn listing_len(payload: &Value) -> usize {
    payload.as_array().map_or(0, Vec::len)
}

/// Serialize a request body; these types contain only plain fields
pub fn to_body<T: Serialize>(body: &T) -> ProbeResult<Value> {
    Ok(serde_json::to_value(body)?)
}
