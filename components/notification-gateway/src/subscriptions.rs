/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::sync::Arc;

use crate::dispatch::{DispatchTable, NotificationHandler};
use crate::navigation::ReportNavigator;
use crate::types::{EventKind, NotificationType};
use crate::updates::UpdateApplier;

/// Bind the standard handlers: received notifications of every type apply their updates,
/// selected ones open their report.
#[uniffi::export]
pub fn subscribe_to_report_notifications(
    table: Arc<DispatchTable>,
    applier: Arc<UpdateApplier>,
    navigator: Arc<ReportNavigator>,
) {
    let applier: Arc<dyn NotificationHandler> = applier;
    let navigator: Arc<dyn NotificationHandler> = navigator;
    for notification_type in NotificationType::ALL {
        table.bind(EventKind::Received, notification_type, applier.clone());
        table.bind(EventKind::Selected, notification_type, navigator.clone());
    }
}
