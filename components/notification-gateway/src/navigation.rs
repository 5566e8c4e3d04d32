/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Opens the report a selected notification points at.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::dispatch::NotificationHandler;
use crate::error::{handle_error, ApiResult, Error, Result};
use crate::store::{self, PersistedState};
use crate::types::NotificationData;

/// The app's navigation layer.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait Navigator: Send + Sync {
    /// Resolves once the navigation routes are mounted and can be navigated.
    async fn wait_until_ready(&self);

    fn active_route(&self) -> String;

    fn is_active_route(&self, route: String) -> bool;

    /// Whether the screen shown while the app transitions between flows is on top.
    fn is_transition_on_top(&self) -> bool;

    fn pop_transition(&self) -> ApiResult<()>;

    fn navigate(&self, route: String, back_to: Option<String>) -> ApiResult<()>;

    fn go_back(&self) -> ApiResult<()>;

    /// Close any open modal or overlay and hold the modal layer.
    fn close_overlays(&self);

    /// Release the modal layer held by `close_overlays`.
    fn release_overlays(&self);
}

/// Holds the modal layer while navigating, releasing it however we leave.
struct OverlayGuard<'a> {
    navigator: &'a dyn Navigator,
}

impl<'a> OverlayGuard<'a> {
    fn acquire(navigator: &'a dyn Navigator) -> Self {
        navigator.close_overlays();
        Self { navigator }
    }
}

impl Drop for OverlayGuard<'_> {
    fn drop(&mut self) {
        self.navigator.release_overlays();
    }
}

fn normalize(route: &str) -> &str {
    route.trim_start_matches('/')
}

#[derive(uniffi::Object)]
pub struct ReportNavigator {
    config: GatewayConfig,
    navigator: Arc<dyn Navigator>,
    store: Arc<dyn PersistedState>,
}

#[uniffi::export]
impl ReportNavigator {
    #[uniffi::constructor]
    pub fn new(
        config: GatewayConfig,
        navigator: Arc<dyn Navigator>,
        store: Arc<dyn PersistedState>,
    ) -> Self {
        Self {
            config,
            navigator,
            store,
        }
    }

    pub async fn navigate_to_report(&self, data: NotificationData) {
        let Some(report_id) = data.report_id else {
            handle_error(Error::MissingField("reportID"));
            return;
        };
        log::info!("[PushNotification] Navigating to report {}", report_id);

        self.navigator.wait_until_ready().await;
        let _overlays = OverlayGuard::acquire(self.navigator.as_ref());

        // The hybrid app's own entry flow is already taking the user somewhere.
        if self.single_new_dot_entry().await {
            log::info!("[PushNotification] Entry flow in progress, not navigating");
            return;
        }
        if let Err(e) = self.open_report(&report_id).await {
            handle_error(e);
        }
    }
}

impl ReportNavigator {
    async fn single_new_dot_entry(&self) -> bool {
        store::read_single_new_dot_entry(self.store.as_ref())
            .await
            .unwrap_or_else(|e| {
                handle_error(e);
                false
            })
    }

    async fn open_report(&self, report_id: &str) -> Result<()> {
        if self.navigator.is_transition_on_top() {
            self.navigator.pop_transition().map_err(Error::Navigation)?;
        }

        let target = self.config.report_route(report_id);
        let active = self.navigator.active_route();
        let active = normalize(&active);
        if self.config.is_report_route(active) && active != target {
            log::debug!("Leaving {} before opening {}", active, target);
            self.navigator.go_back().map_err(Error::Navigation)?;
        }

        let back_to = if self.navigator.is_active_route(target.clone()) {
            None
        } else {
            Some(self.navigator.active_route())
        };
        self.navigator
            .navigate(target.clone(), back_to)
            .map_err(Error::Navigation)?;

        store::write_last_visited_path(self.store.as_ref(), &target).await
    }
}

#[async_trait::async_trait]
impl NotificationHandler for ReportNavigator {
    async fn handle(&self, data: NotificationData) {
        self.navigate_to_report(data).await
    }
}
