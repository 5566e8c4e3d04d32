/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Keeps the push provider's registered identity in line with the notification ID this
//! device should receive pushes for.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::{self, Either};
use parking_lot::Mutex;

use crate::error::{handle_error, ApiResult, Error};
use crate::store::{self, PersistedState};
use crate::types::EventKind;

/// The subset of the push provider SDK we drive.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait PushSdk: Send + Sync {
    /// The named user the device is currently registered as, if any.
    async fn named_user_id(&self) -> ApiResult<Option<String>>;

    async fn identify(&self, named_user_id: String) -> ApiResult<()>;

    /// Ask the user to allow visible notifications. Returns whether they're enabled.
    async fn enable_user_notifications(&self) -> ApiResult<bool>;

    /// Forget the registered identity.
    async fn reset_contact(&self) -> ApiResult<()>;

    /// Start forwarding `kind` events to the gateway.
    async fn add_listener(&self, kind: EventKind) -> ApiResult<()>;

    async fn remove_all_listeners(&self, kind: EventKind) -> ApiResult<()>;

    /// Turn off any platform override which always shows notifications in the foreground.
    async fn disable_foreground_presentation(&self) -> ApiResult<()>;
}

#[derive(uniffi::Object)]
pub struct RegistrationManager {
    sdk: Arc<dyn PushSdk>,
    store: Arc<dyn PersistedState>,
    listening: Mutex<HashSet<EventKind>>,
}

#[uniffi::export]
impl RegistrationManager {
    #[uniffi::constructor]
    pub fn new(sdk: Arc<dyn PushSdk>, store: Arc<dyn PersistedState>) -> Self {
        Self {
            sdk,
            store,
            listening: Mutex::new(HashSet::new()),
        }
    }

    /// Install SDK listeners for both event kinds. Listeners already installed by this
    /// process are left alone.
    pub async fn init(&self) {
        for kind in [EventKind::Received, EventKind::Selected] {
            let installed = self.listening.lock().contains(&kind);
            if installed {
                continue;
            }
            match self.sdk.add_listener(kind).await {
                Ok(()) => {
                    self.listening.lock().insert(kind);
                }
                Err(e) => handle_error(Error::Sdk(e)),
            }
        }
    }

    /// Register this device under `notification_id`, unless it already is.
    ///
    /// Visible notification permission is requested alongside, but never gates the
    /// registration: the device must get silent pushes even if the user says no. Once the
    /// identity is registered this resolves without waiting for the permission prompt, whose
    /// outcome is then not logged.
    pub async fn register(&self, notification_id: String) {
        let current = match self.sdk.named_user_id().await {
            Ok(current) => current,
            Err(e) => {
                log::warn!("[PushNotification] Couldn't read registered identity, not registering");
                handle_error(Error::Sdk(e));
                return;
            }
        };
        if current.as_deref() == Some(notification_id.as_str()) {
            log::debug!("[PushNotification] Already registered for push notifications");
            return;
        }

        log::info!("[PushNotification] Subscribing to notifications");
        let permission = async {
            match self.sdk.enable_user_notifications().await {
                Ok(true) => log::info!("[PushNotification] User notifications enabled"),
                Ok(false) => log::info!(
                    "[PushNotification] User notifications disabled, only silent pushes will arrive"
                ),
                Err(e) => handle_error(Error::Sdk(e)),
            }
        };
        let identify = async {
            match self.sdk.identify(notification_id.clone()).await {
                Ok(()) => log::debug!("[PushNotification] Registered identity"),
                Err(e) => handle_error(Error::Sdk(e)),
            }
        };
        futures::pin_mut!(permission, identify);
        match future::select(permission, identify).await {
            Either::Left(((), identify)) => identify.await,
            Either::Right(((), _)) => {
                log::debug!("[PushNotification] Not waiting for the permission prompt")
            }
        }
    }

    /// Register under the notification ID found in persisted state, if there is one.
    pub async fn sync_registration(&self) {
        match store::read_notification_id(self.store.as_ref()).await {
            Ok(Some(notification_id)) => self.register(notification_id).await,
            Ok(None) => log::debug!("[PushNotification] No notification ID to register"),
            Err(e) => handle_error(e),
        }
    }

    /// Forget the registered identity and stop listening for events. Safe to call repeatedly.
    pub async fn deregister(&self) {
        log::info!("[PushNotification] Unsubscribing from push notifications");
        if let Err(e) = self.sdk.reset_contact().await {
            handle_error(Error::Sdk(e));
        }
        for kind in [EventKind::Received, EventKind::Selected] {
            if let Err(e) = self.sdk.remove_all_listeners(kind).await {
                handle_error(Error::Sdk(e));
            }
        }
        self.listening.lock().clear();
        if let Err(e) = self.sdk.disable_foreground_presentation().await {
            handle_error(Error::Sdk(e));
        }
    }

    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listening.lock().contains(&kind)
    }
}
