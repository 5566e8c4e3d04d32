/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::Error;

pub type JsonValue = Value;
pub type JsonObject = serde_json::Map<String, Value>;

uniffi::custom_type!(JsonValue, String, {
    remote,
    try_lift: |val| Ok(serde_json::from_str(&val)?),
    lower: |obj| obj.to_string(),
});

uniffi::custom_type!(JsonObject, String, {
    remote,
    try_lift: |val| {
        match serde_json::from_str(&val)? {
            Value::Object(obj) => Ok(obj),
            _ => Err(uniffi::deps::anyhow::anyhow!("Expected a JSON object")),
        }
    },
    lower: |obj| Value::Object(obj).to_string(),
});

/// The two kinds of event the push provider SDK delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum EventKind {
    /// A push arrived, possibly while the app is in the background.
    Received,
    /// The user tapped a notification.
    Selected,
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EventKind::Received => "received",
                EventKind::Selected => "selected",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum NotificationType {
    ReportAction,
    ReportComment,
    Transaction,
}

impl NotificationType {
    pub const ALL: [NotificationType; 3] = [
        NotificationType::ReportAction,
        NotificationType::ReportComment,
        NotificationType::Transaction,
    ];
}

impl Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                NotificationType::ReportAction => "report_action",
                NotificationType::ReportComment => "report_comment",
                NotificationType::Transaction => "transaction",
            }
        )
    }
}

impl FromStr for NotificationType {
    type Err = String;

    // Older servers send the camelCase spelling.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "report_action" | "reportAction" => NotificationType::ReportAction,
            "report_comment" | "reportComment" => NotificationType::ReportComment,
            "transaction" => NotificationType::Transaction,
            _ => return Err(format!("Unknown notification type '{}'", s)),
        })
    }
}

/// Envelope delivered by the push provider for a single event.
#[derive(Debug, Clone, Default, PartialEq, uniffi::Record)]
pub struct RawNotificationPayload {
    pub notification_id: String,
    pub alert: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    /// Provider extras. The app data lives under `payload`.
    pub extras: JsonObject,
}

impl RawNotificationPayload {
    pub fn encoded_payload(&self) -> Option<&JsonValue> {
        self.extras.get("payload")
    }
}

/// The decoded app data carried by a notification.
///
/// Only `type` decides whether a notification is dispatched. Every other field is read
/// leniently: a value of an unexpected shape is treated as absent rather than failing the
/// whole record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, uniffi::Record)]
pub struct NotificationData {
    #[serde(rename = "type", default, deserialize_with = "notification_type")]
    pub notification_type: Option<NotificationType>,
    #[serde(rename = "reportID", default, deserialize_with = "string_or_number")]
    pub report_id: Option<String>,
    #[serde(rename = "lastUpdateID", default, deserialize_with = "lenient_i64")]
    pub last_update_id: Option<i64>,
    #[serde(rename = "previousUpdateID", default, deserialize_with = "lenient_i64")]
    pub previous_update_id: Option<i64>,
    #[serde(rename = "hasPendingOnyxUpdates", default, deserialize_with = "lenient_bool")]
    pub has_pending_onyx_updates: bool,
    #[serde(rename = "onyxData", default, deserialize_with = "lenient_array")]
    pub onyx_data: Option<Vec<JsonValue>>,
}

impl NotificationData {
    pub fn from_object(obj: JsonObject) -> crate::error::Result<Self> {
        serde_json::from_value(Value::Object(obj)).map_err(Error::Json)
    }
}

fn ignored<T>(field: &str, value: &Value) -> Option<T> {
    log::debug!("Ignoring unexpected {} value {}", field, value);
    None
}

fn notification_type<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<NotificationType>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => match s.parse() {
            Ok(t) => Some(t),
            Err(e) => {
                log::debug!("{}", e);
                None
            }
        },
        Some(Value::Null) | None => None,
        Some(other) => ignored("type", &other),
    })
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Null) | None => None,
        Some(other) => ignored("reportID", &other),
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::Null) | None => None,
        Some(other) => ignored("update ID", &other),
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        Some(Value::Null) | None => false,
        Some(other) => ignored("hasPendingOnyxUpdates", &other).unwrap_or(false),
    })
}

fn lenient_array<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(items),
        Some(Value::Null) | None => None,
        Some(other) => ignored("onyxData", &other),
    })
}
