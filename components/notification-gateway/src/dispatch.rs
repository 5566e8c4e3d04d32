/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Handler table mapping (event kind, notification type) to a single handler.
//!
//! The table is filled once at startup and then only read while dispatching. Binding the
//! same pair again replaces the previous handler.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::types::{EventKind, NotificationData, NotificationType};

/// Something which reacts to a decoded notification.
///
/// `handle` must not resolve until the work is complete: when the push woke a background
/// process, the host is free to suspend it as soon as this returns.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait NotificationHandler: Send + Sync {
    async fn handle(&self, data: NotificationData);
}

#[derive(Default, uniffi::Object)]
pub struct DispatchTable {
    handlers: RwLock<HashMap<(EventKind, NotificationType), Arc<dyn NotificationHandler>>>,
}

#[uniffi::export]
impl DispatchTable {
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` for `kind` events of type `notification_type`, replacing any
    /// handler already bound to that pair.
    pub fn bind(
        &self,
        kind: EventKind,
        notification_type: NotificationType,
        handler: Arc<dyn NotificationHandler>,
    ) {
        if self
            .handlers
            .write()
            .insert((kind, notification_type), handler)
            .is_some()
        {
            log::debug!("Rebound {} handler for {}", kind, notification_type);
        }
    }

    pub fn is_bound(&self, kind: EventKind, notification_type: NotificationType) -> bool {
        self.handlers.read().contains_key(&(kind, notification_type))
    }
}

impl DispatchTable {
    pub fn handler(
        &self,
        kind: EventKind,
        notification_type: NotificationType,
    ) -> Option<Arc<dyn NotificationHandler>> {
        self.handlers.read().get(&(kind, notification_type)).cloned()
    }
}
