/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Entry point for events delivered by the push provider SDK.
//!
//! The host forwards each SDK event to [`NotificationGateway::on_push_received`] or
//! [`NotificationGateway::on_notification_response`] and awaits the result. The call only
//! resolves once the bound handler has finished, which is what lets a background process know
//! it's safe to be suspended.

use std::sync::Arc;

use crate::dispatch::DispatchTable;
use crate::error::handle_error;
use crate::payload::decode_payload;
use crate::types::{EventKind, NotificationData, RawNotificationPayload};

#[derive(uniffi::Object)]
pub struct NotificationGateway {
    table: Arc<DispatchTable>,
}

#[uniffi::export]
impl NotificationGateway {
    #[uniffi::constructor]
    pub fn new(table: Arc<DispatchTable>) -> Self {
        Self { table }
    }

    /// A push notification was received.
    pub async fn on_push_received(&self, payload: RawNotificationPayload) -> bool {
        self.dispatch(EventKind::Received, payload).await
    }

    /// The user selected a notification.
    pub async fn on_notification_response(&self, payload: RawNotificationPayload) -> bool {
        self.dispatch(EventKind::Selected, payload).await
    }

    /// Decode `payload` and run the handler bound for its type, if any.
    ///
    /// Returns `true` if a handler ran to completion, `false` if the event was ignored.
    pub async fn dispatch(&self, kind: EventKind, payload: RawNotificationPayload) -> bool {
        log::debug!(
            "Push {}: id={} alert={:?} title={:?}",
            kind,
            payload.notification_id,
            payload.alert,
            payload.title
        );

        let Some(obj) = decode_payload(payload.encoded_payload()) else {
            log::info!("[PushNotification] No data in notification {}", payload.notification_id);
            return false;
        };
        let data = match NotificationData::from_object(obj) {
            Ok(data) => data,
            Err(e) => {
                handle_error(e);
                return false;
            }
        };
        let Some(notification_type) = data.notification_type else {
            log::info!("[PushNotification] Notification data has no type");
            return false;
        };
        let Some(handler) = self.table.handler(kind, notification_type) else {
            log::debug!("No {} handler bound for {}", kind, notification_type);
            return false;
        };

        log::info!("[PushNotification] Handling {} {} notification", kind, notification_type);
        handler.handle(data).await;
        true
    }
}
