use std::fmt;

use eyre::WrapErr;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub mod config;

/// Every dashboard payload of interest is wrapped in `{"data": ...}`.
#[derive(Debug, Clone, Deserialize)]
struct Envelope<T> {
    data: T,
}

fn data_of<T: DeserializeOwned>(value: &Value) -> serde_json::Result<T> {
    serde_json::from_value::<Envelope<T>>(value.clone()).map(|envelope| envelope.data)
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Login API response, stored verbatim in the token cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub data: LoginData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AchievementId {
    Number(i64),
    Text(String),
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    pub is_claimed: bool,
    /// `None` marks a tracker that did not have the expected shape.
    #[serde(default, deserialize_with = "lenient_progresses")]
    pub progresses: Vec<Option<Progress>>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_progresses<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Option<Progress>>, D::Error> {
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).ok())
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Progress {
    pub current_progress: f64,
    pub total_progress: f64,
}

impl Achievement {
    /// Unclaimed and either fully progressed on its first tracker, or carrying
    /// no usable progress data at all.
    pub fn is_claimable(&self) -> bool {
        if self.is_claimed {
            return false;
        }
        match self.progresses.first() {
            Some(Some(progress)) => progress.current_progress == progress.total_progress,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AchievementsResponse {
    /// Entries that did not parse are left out of `achievements` and counted.
    List {
        achievements: Vec<Achievement>,
        skipped: usize,
    },
    /// No list, but the API explained itself; usually an expired token.
    Rejected { message: String },
    Malformed,
}

impl AchievementsResponse {
    pub fn from_value(value: &Value) -> Self {
        if let Ok(entries) = data_of::<Vec<Value>>(value) {
            let total = entries.len();
            let achievements: Vec<Achievement> = entries
                .into_iter()
                .filter_map(|entry| serde_json::from_value(entry).ok())
                .collect();
            return Self::List {
                skipped: total - achievements.len(),
                achievements,
            };
        }
        match value.get("message") {
            Some(Value::String(message)) => Self::Rejected {
                message: message.clone(),
            },
            Some(other) => Self::Rejected {
                message: other.to_string(),
            },
            None => Self::Malformed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PotWinning {
    /// `None` until today's pot has been claimed.
    #[serde(default)]
    pub winning_credits: Option<f64>,
}

impl PotWinning {
    pub fn from_value(value: &Value) -> eyre::Result<Self> {
        data_of(value).wrap_err_with(|| format!("unexpected pot response: {value}"))
    }

    pub fn is_unclaimed(&self) -> bool {
        self.winning_credits.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PotClaim {
    Claimed { credits: f64 },
    /// Not enough traffic shared yet today.
    InsufficientTraffic,
}

#[derive(Debug, Deserialize)]
struct ClaimedCredits {
    credits: f64,
}

impl PotClaim {
    pub const INSUFFICIENT_TRAFFIC_TYPE: i64 = 400;

    pub fn from_value(value: &Value) -> eyre::Result<Self> {
        if value.get("type").and_then(Value::as_i64) == Some(Self::INSUFFICIENT_TRAFFIC_TYPE) {
            return Ok(Self::InsufficientTraffic);
        }
        let claimed: ClaimedCredits =
            data_of(value).wrap_err_with(|| format!("unexpected pot claim response: {value}"))?;
        Ok(Self::Claimed {
            credits: claimed.credits,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BalanceCheck {
    Unauthorized,
    Balance { credits: f64 },
    Unrecognized(Value),
}

#[derive(Debug, Deserialize)]
struct BalanceData {
    payout: Payout,
}

#[derive(Debug, Deserialize)]
struct Payout {
    credits: f64,
}

impl BalanceCheck {
    pub const UNAUTHORIZED_CODE: i64 = 401;

    pub fn from_value(value: &Value) -> Self {
        if value.get("code").and_then(Value::as_i64) == Some(Self::UNAUTHORIZED_CODE) {
            return Self::Unauthorized;
        }
        match data_of::<BalanceData>(value) {
            Ok(balance) => Self::Balance {
                credits: balance.payout.credits,
            },
            Err(_) => Self::Unrecognized(value.clone()),
        }
    }
}
