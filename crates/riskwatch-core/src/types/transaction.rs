//! Transaction record supplied by the ingestion source

use super::value::Value;
use crate::error::CoreError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single financial transaction.
///
/// Immutable once created; the engine only reads the fields its
/// conditions reference. The timestamp is kept both parsed, for time
/// arithmetic, and as the ISO-8601 text it arrived with, which is what
/// conditions see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransactionRecord", into = "TransactionRecord")]
pub struct Transaction {
    /// Transaction ID
    pub id: String,

    /// Account that initiated the transaction
    pub user_id: String,

    /// Non-negative amount
    pub amount: f64,

    /// Country code (e.g. "US")
    pub country: String,

    timestamp: DateTime<Utc>,
    raw_timestamp: String,
}

/// Wire shape of a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRecord {
    id: String,
    user_id: String,
    amount: f64,
    country: String,
    timestamp: String,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        amount: f64,
        country: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            amount,
            country: country.into(),
            raw_timestamp: timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            timestamp,
        }
    }

    /// Event time, normalized to UTC
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Event time exactly as ingested
    pub fn raw_timestamp(&self) -> &str {
        &self.raw_timestamp
    }

    /// Look up a field by the name a condition uses.
    ///
    /// Both the wire spelling (`userId`) and the snake_case spelling
    /// (`user_id`) resolve. Unknown fields return `None`.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::String(self.id.clone())),
            "userId" | "user_id" => Some(Value::String(self.user_id.clone())),
            "amount" => Some(Value::Number(self.amount)),
            "country" => Some(Value::String(self.country.clone())),
            "timestamp" => Some(Value::String(self.raw_timestamp.clone())),
            _ => None,
        }
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = CoreError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let timestamp = DateTime::parse_from_rfc3339(&record.timestamp)
            .map_err(|e| {
                CoreError::TypeError(format!(
                    "timestamp {:?} is not an ISO-8601 date-time: {}",
                    record.timestamp, e
                ))
            })?
            .with_timezone(&Utc);

        Ok(Self {
            id: record.id,
            user_id: record.user_id,
            amount: record.amount,
            country: record.country,
            timestamp,
            raw_timestamp: record.timestamp,
        })
    }
}

impl From<Transaction> for TransactionRecord {
    fn from(txn: Transaction) -> Self {
        Self {
            id: txn.id,
            user_id: txn.user_id,
            amount: txn.amount,
            country: txn.country,
            timestamp: txn.raw_timestamp,
        }
    }
}
