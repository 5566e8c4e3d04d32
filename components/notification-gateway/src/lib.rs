/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

#![allow(unknown_lints)]
#![warn(rust_2018_idioms)]
//! # Notification Gateway Component
//!
//! This component sits between the push provider SDK on the device and the rest of the app. It
//! decodes the data a push carries, routes it to whichever handler is bound for the kind of
//! event and notification type, and keeps the device registered with the provider under the
//! right notification ID.
//!
//! ## Events
//!
//! The SDK delivers two kinds of event: a push was *received* (often waking the app in the
//! background, with nothing else initialized) or the user *selected* a notification. The host
//! forwards both to a [`NotificationGateway`] and must await the result: the call resolves
//! only once the bound handler has finished, and the host should only end its background task
//! after that.
//!
//! The app data lives in the `payload` extra, either as a JSON object, a JSON string, or a
//! base64 string of gzip compressed JSON.
//!
//! ## Handlers
//!
//! Handlers are bound in a [`DispatchTable`] at startup, one per (event kind, notification
//! type). [`subscribe_to_report_notifications`] binds the standard set:
//!
//! * [`UpdateApplier`] for received notifications, which hands the updates carried by the
//!   notification to the app's reliable update machinery and then tells the host to finish
//!   background processing.
//! * [`ReportNavigator`] for selected notifications, which opens the report.
//!
//! ## Registration
//!
//! [`RegistrationManager`] reconciles the identity registered with the SDK against the
//! notification ID the app wants, installs the SDK listeners, and tears all of that down on
//! sign out.
//!
//! ## Collaborators
//!
//! Everything outside this component is reached through a trait the app implements, in Rust or
//! in Kotlin/Swift: [`PushSdk`], [`PersistedState`], [`ReliableUpdates`],
//! [`BackgroundTaskBridge`] and [`Navigator`].
//!
//! None of the public entry points return errors. Failures are logged (see `handling.rs`) and
//! the operation resolves, because an error escaping into an SDK callback can kill a
//! background process.

mod config;
mod dispatch;
mod error;
mod gateway;
mod handling;
mod navigation;
mod payload;
mod registration;
mod store;
mod subscriptions;
mod types;
mod updates;

#[cfg(test)]
mod test_utils;

uniffi::setup_scaffolding!("notification_gateway");

pub use config::GatewayConfig;
pub use dispatch::{DispatchTable, NotificationHandler};
pub use error::{ApiResult, Error, NotificationGatewayApiError, Result};
pub use gateway::NotificationGateway;
pub use navigation::{Navigator, ReportNavigator};
pub use payload::decode_payload;
pub use registration::{PushSdk, RegistrationManager};
pub use store::{
    PersistedState, LAST_UPDATE_ID_APPLIED_KEY, LAST_VISITED_PATH_KEY, PUSH_NOTIFICATION_ID_KEY,
    SINGLE_NEW_DOT_ENTRY_KEY,
};
pub use subscriptions::subscribe_to_report_notifications;
pub use types::{
    EventKind, JsonObject, JsonValue, NotificationData, NotificationType,
    RawNotificationPayload,
};
pub use updates::{
    BackgroundTaskBridge, ReliableUpdates, UpdateApplier, UpdateBatch, UpdateRequest,
    UpdateSource,
};
