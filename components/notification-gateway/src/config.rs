/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Provides configuration for the update applier and report navigator.

use std::time::Duration;

/// Hosts suspend a background push handler after roughly 30 seconds, so give up a little
/// before that and still report completion.
const DEFAULT_UPDATE_TIMEOUT_MS: u64 = 25_000;

const DEFAULT_REPORT_ROUTE_PREFIX: &str = "r/";

#[derive(Clone, Debug, PartialEq, Eq, uniffi::Record)]
pub struct GatewayConfig {
    /// How long to wait for the reliable update collaborator before finishing background
    /// processing anyway.
    pub update_timeout_ms: u64,

    /// Route prefix of report screens, e.g. `r/` gives `r/1234`.
    pub report_route_prefix: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            update_timeout_ms: DEFAULT_UPDATE_TIMEOUT_MS,
            report_route_prefix: DEFAULT_REPORT_ROUTE_PREFIX.to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn update_timeout(&self) -> Duration {
        Duration::from_millis(self.update_timeout_ms)
    }

    pub fn report_route(&self, report_id: &str) -> String {
        format!("{}{}", self.report_route_prefix, report_id)
    }

    pub fn is_report_route(&self, route: &str) -> bool {
        route.starts_with(&self.report_route_prefix)
    }
}
