/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Access to persisted application state.
//!
//! A push can wake the app in a headless context where none of the usual startup code has run,
//! so everything we need is read from the store when it's needed rather than cached.

use serde_json::Value;

use crate::error::{ApiResult, Error, Result};
use crate::types::JsonValue;

/// The notification ID this device should be registered under.
pub const PUSH_NOTIFICATION_ID_KEY: &str = "private_pushNotificationID";
/// The last reliable update ID this client has applied.
pub const LAST_UPDATE_ID_APPLIED_KEY: &str = "onyxUpdatesLastUpdateIDAppliedToClient";
/// Set while the hybrid app is running its own entry flow.
pub const SINGLE_NEW_DOT_ENTRY_KEY: &str = "hybridApp_isSingleNewDotEntry";
pub const LAST_VISITED_PATH_KEY: &str = "lastVisitedPath";

/// Key-value store for application state. Values are JSON.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait PersistedState: Send + Sync {
    /// Read `key`, `None` if it has never been set.
    async fn get(&self, key: String) -> ApiResult<Option<JsonValue>>;

    async fn set(&self, key: String, value: JsonValue) -> ApiResult<()>;
}

async fn read(store: &dyn PersistedState, key: &str) -> Result<Option<Value>> {
    store.get(key.to_string()).await.map_err(Error::Storage)
}

/// The desired notification ID, as a string. Numeric IDs are stringified.
pub(crate) async fn read_notification_id(store: &dyn PersistedState) -> Result<Option<String>> {
    Ok(match read(store, PUSH_NOTIFICATION_ID_KEY).await? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

pub(crate) async fn read_last_update_id_applied(store: &dyn PersistedState) -> Result<Option<i64>> {
    Ok(match read(store, LAST_UPDATE_ID_APPLIED_KEY).await? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    })
}

pub(crate) async fn read_single_new_dot_entry(store: &dyn PersistedState) -> Result<bool> {
    Ok(matches!(
        read(store, SINGLE_NEW_DOT_ENTRY_KEY).await?,
        Some(Value::Bool(true))
    ))
}

pub(crate) async fn write_last_visited_path(store: &dyn PersistedState, path: &str) -> Result<()> {
    store
        .set(
            LAST_VISITED_PATH_KEY.to_string(),
            Value::String(path.to_string()),
        )
        .await
        .map_err(Error::Storage)
}
