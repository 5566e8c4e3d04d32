/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Applies the reliable updates carried by a notification.
//!
//! A notification either carries an inline batch of updates (`onyxData`, bracketed by
//! `previousUpdateID` and `lastUpdateID`) or just says there are pending updates up to
//! `lastUpdateID` which the client should fetch. Either way the request goes to the
//! [`ReliableUpdates`] collaborator together with the last update ID this client applied, so
//! gaps and duplicates can be detected there.
//!
//! Whatever happens, the host is told to finish background processing exactly once per call.

use std::future::Future;
use std::sync::Arc;

use futures::future::{self, Either};
use futures_timer::Delay;

use crate::config::GatewayConfig;
use crate::dispatch::NotificationHandler;
use crate::error::{handle_error, ApiResult, Error, Result};
use crate::store::{self, PersistedState};
use crate::types::{JsonValue, NotificationData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum UpdateSource {
    Airship,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct UpdateBatch {
    pub event_type: String,
    pub data: Vec<JsonValue>,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct UpdateRequest {
    pub source: UpdateSource,
    pub last_update_id: i64,
    pub previous_update_id: Option<i64>,
    pub should_fetch_pending_updates: bool,
    pub updates: Vec<UpdateBatch>,
}

impl UpdateRequest {
    pub fn from_notification(data: &NotificationData) -> Result<Self> {
        let last_update_id = data
            .last_update_id
            .ok_or(Error::MissingField("lastUpdateID"))?;
        if data.has_pending_onyx_updates {
            return Ok(Self {
                source: UpdateSource::Airship,
                last_update_id,
                previous_update_id: None,
                should_fetch_pending_updates: true,
                updates: Vec::new(),
            });
        }
        let previous_update_id = data
            .previous_update_id
            .ok_or(Error::MissingField("previousUpdateID"))?;
        let onyx_data = data
            .onyx_data
            .clone()
            .ok_or(Error::MissingField("onyxData"))?;
        Ok(Self {
            source: UpdateSource::Airship,
            last_update_id,
            previous_update_id: Some(previous_update_id),
            should_fetch_pending_updates: false,
            updates: vec![UpdateBatch {
                event_type: String::new(),
                data: onyx_data,
            }],
        })
    }
}

/// Applies update requests in order, fetching any that are missing.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait ReliableUpdates: Send + Sync {
    async fn apply(
        &self,
        request: UpdateRequest,
        client_last_update_id: Option<i64>,
    ) -> ApiResult<()>;
}

/// The host's hook for ending a background task started by a push.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait BackgroundTaskBridge: Send + Sync {
    async fn finish_background_processing(&self) -> ApiResult<()>;
}

#[derive(uniffi::Object)]
pub struct UpdateApplier {
    updates: Arc<dyn ReliableUpdates>,
    store: Arc<dyn PersistedState>,
    bridge: Option<Arc<dyn BackgroundTaskBridge>>,
    config: GatewayConfig,
}

#[uniffi::export]
impl UpdateApplier {
    /// `bridge` is `None` in environments without a background task bridge.
    #[uniffi::constructor]
    pub fn new(
        config: GatewayConfig,
        updates: Arc<dyn ReliableUpdates>,
        store: Arc<dyn PersistedState>,
        bridge: Option<Arc<dyn BackgroundTaskBridge>>,
    ) -> Self {
        Self {
            updates,
            store,
            bridge,
            config,
        }
    }

    pub async fn apply(&self, data: NotificationData) {
        log::info!(
            "[PushNotification] Applying onyx data in the background, reportID={:?} lastUpdateID={:?} previousUpdateID={:?}",
            data.report_id,
            data.last_update_id,
            data.previous_update_id
        );
        if let Err(e) = self.apply_reliably(&data).await {
            handle_error(e);
        }
        self.finish_background_processing().await;
    }
}

impl UpdateApplier {
    async fn apply_reliably(&self, data: &NotificationData) -> Result<()> {
        let request = UpdateRequest::from_notification(data)?;
        let client_last_update_id = self.client_last_update_id().await;
        log::debug!(
            "Applying update {} with client at {:?}",
            request.last_update_id,
            client_last_update_id
        );
        match with_deadline(
            Delay::new(self.config.update_timeout()),
            self.updates.apply(request, client_last_update_id),
        )
        .await
        {
            Some(result) => result.map_err(Error::UpdateApplication),
            None => Err(Error::UpdateTimeout(self.config.update_timeout_ms)),
        }
    }

    // Nothing else may have loaded this yet when we're running headless.
    async fn client_last_update_id(&self) -> Option<i64> {
        store::read_last_update_id_applied(self.store.as_ref())
            .await
            .unwrap_or_else(|e| {
                handle_error(e);
                None
            })
    }

    async fn finish_background_processing(&self) {
        match &self.bridge {
            Some(bridge) => {
                if let Err(e) = bridge.finish_background_processing().await {
                    handle_error(Error::BackgroundBridge(e));
                }
            }
            None => log::debug!("No background task bridge, nothing to finish"),
        }
    }
}

#[async_trait::async_trait]
impl NotificationHandler for UpdateApplier {
    async fn handle(&self, data: NotificationData) {
        self.apply(data).await
    }
}

/// Resolve to `fut`'s output, or `None` if `timer` fires first. Whichever loses is dropped
/// before returning, so a pending timer is cancelled as soon as `fut` settles.
async fn with_deadline<F, T>(timer: T, fut: F) -> Option<F::Output>
where
    F: Future,
    T: Future<Output = ()>,
{
    futures::pin_mut!(fut, timer);
    match future::select(fut, timer).await {
        Either::Left((output, _)) => Some(output),
        Either::Right(_) => None,
    }
}
