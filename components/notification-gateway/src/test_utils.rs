/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Recording fakes of the collaborator traits.

use std::collections::HashMap;
use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::task::{Context, Poll};

use base64::{engine::general_purpose::STANDARD, Engine};
use flate2::{write::GzEncoder, Compression};
use parking_lot::Mutex;
use serde_json::Value;

use crate::dispatch::NotificationHandler;
use crate::error::{ApiResult, NotificationGatewayApiError};
use crate::navigation::Navigator;
use crate::registration::PushSdk;
use crate::store::PersistedState;
use crate::types::{EventKind, JsonObject, NotificationData, RawNotificationPayload};
use crate::updates::{BackgroundTaskBridge, ReliableUpdates, UpdateRequest};

pub fn gzip_base64(json: &str) -> String {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(json.as_bytes()).unwrap();
    STANDARD.encode(encoder.finish().unwrap())
}

pub fn raw_payload(payload: Value) -> RawNotificationPayload {
    let mut extras = JsonObject::new();
    extras.insert("payload".to_string(), payload);
    RawNotificationPayload {
        notification_id: "test-notification".to_string(),
        alert: Some("New message".to_string()),
        extras,
        ..Default::default()
    }
}

struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// Give other futures on the same task a chance to run, `times` times.
pub async fn yield_now(times: usize) {
    for _ in 0..times {
        YieldNow(false).await
    }
}

#[derive(Default)]
pub struct RecordingHandler {
    calls: Mutex<Vec<NotificationData>>,
    yields: AtomicUsize,
    completed: AtomicUsize,
}

impl RecordingHandler {
    pub fn calls(&self) -> Vec<NotificationData> {
        self.calls.lock().clone()
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn yield_before_completing(&self, times: usize) {
        self.yields.store(times, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl NotificationHandler for RecordingHandler {
    async fn handle(&self, data: NotificationData) {
        self.calls.lock().push(data);
        yield_now(self.yields.load(Ordering::SeqCst)).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct FakeStore {
    values: Mutex<HashMap<String, Value>>,
    fail_reads: AtomicBool,
}

impl FakeStore {
    pub fn put(&self, key: &str, value: Value) {
        self.values.lock().insert(key.to_string(), value);
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.values.lock().get(key).cloned()
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl PersistedState for FakeStore {
    async fn get(&self, key: String) -> ApiResult<Option<Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(NotificationGatewayApiError::Storage {
                reason: "store unavailable".to_string(),
            });
        }
        Ok(self.value(&key))
    }

    async fn set(&self, key: String, value: Value) -> ApiResult<()> {
        self.values.lock().insert(key, value);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCall {
    NamedUserId,
    Identify(String),
    EnableUserNotifications,
    PermissionSettled,
    ResetContact,
    AddListener(EventKind),
    RemoveAllListeners(EventKind),
    DisableForegroundPresentation,
}

pub struct FakeSdk {
    named_user: Mutex<Option<String>>,
    fail_named_user: AtomicBool,
    permission: Mutex<ApiResult<bool>>,
    hold_permission: AtomicBool,
    calls: Mutex<Vec<SdkCall>>,
}

impl FakeSdk {
    pub fn with_named_user(named_user: Option<&str>) -> Self {
        Self {
            named_user: Mutex::new(named_user.map(ToString::to_string)),
            fail_named_user: AtomicBool::new(false),
            permission: Mutex::new(Ok(true)),
            hold_permission: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SdkCall> {
        self.calls.lock().clone()
    }

    pub fn named_user(&self) -> Option<String> {
        self.named_user.lock().clone()
    }

    pub fn fail_named_user(&self) {
        self.fail_named_user.store(true, Ordering::SeqCst);
    }

    pub fn set_permission(&self, result: ApiResult<bool>) {
        *self.permission.lock() = result;
    }

    /// The permission prompt is never answered.
    pub fn hold_permission(&self) {
        self.hold_permission.store(true, Ordering::SeqCst);
    }

    fn record(&self, call: SdkCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait::async_trait]
impl PushSdk for FakeSdk {
    async fn named_user_id(&self) -> ApiResult<Option<String>> {
        self.record(SdkCall::NamedUserId);
        if self.fail_named_user.load(Ordering::SeqCst) {
            return Err(NotificationGatewayApiError::Sdk {
                reason: "offline".to_string(),
            });
        }
        Ok(self.named_user())
    }

    async fn identify(&self, named_user_id: String) -> ApiResult<()> {
        self.record(SdkCall::Identify(named_user_id.clone()));
        *self.named_user.lock() = Some(named_user_id);
        Ok(())
    }

    async fn enable_user_notifications(&self) -> ApiResult<bool> {
        self.record(SdkCall::EnableUserNotifications);
        if self.hold_permission.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }
        self.record(SdkCall::PermissionSettled);
        self.permission.lock().clone()
    }

    async fn reset_contact(&self) -> ApiResult<()> {
        self.record(SdkCall::ResetContact);
        *self.named_user.lock() = None;
        Ok(())
    }

    async fn add_listener(&self, kind: EventKind) -> ApiResult<()> {
        self.record(SdkCall::AddListener(kind));
        Ok(())
    }

    async fn remove_all_listeners(&self, kind: EventKind) -> ApiResult<()> {
        self.record(SdkCall::RemoveAllListeners(kind));
        Ok(())
    }

    async fn disable_foreground_presentation(&self) -> ApiResult<()> {
        self.record(SdkCall::DisableForegroundPresentation);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeUpdates {
    requests: Mutex<Vec<(UpdateRequest, Option<i64>)>>,
    failure: Mutex<Option<NotificationGatewayApiError>>,
    never_settle: AtomicBool,
}

impl FakeUpdates {
    pub fn requests(&self) -> Vec<(UpdateRequest, Option<i64>)> {
        self.requests.lock().clone()
    }

    pub fn fail_with(&self, error: NotificationGatewayApiError) {
        *self.failure.lock() = Some(error);
    }

    pub fn never_settle(&self) {
        self.never_settle.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl ReliableUpdates for FakeUpdates {
    async fn apply(
        &self,
        request: UpdateRequest,
        client_last_update_id: Option<i64>,
    ) -> ApiResult<()> {
        self.requests.lock().push((request, client_last_update_id));
        if self.never_settle.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }
        match self.failure.lock().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct FakeBridge {
    finished: AtomicUsize,
    fail: AtomicBool,
}

impl FakeBridge {
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl BackgroundTaskBridge for FakeBridge {
    async fn finish_background_processing(&self) -> ApiResult<()> {
        self.finished.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotificationGatewayApiError::Other {
                reason: "bridge unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCall {
    WaitUntilReady,
    CloseOverlays,
    ReleaseOverlays,
    PopTransition,
    GoBack,
    Navigate(String, Option<String>),
}

pub struct FakeNavigator {
    route: Mutex<String>,
    back_route: Mutex<String>,
    transition_on_top: AtomicBool,
    fail_navigation: AtomicBool,
    calls: Mutex<Vec<NavCall>>,
}

impl FakeNavigator {
    pub fn at(route: &str) -> Self {
        Self {
            route: Mutex::new(route.to_string()),
            back_route: Mutex::new("home".to_string()),
            transition_on_top: AtomicBool::new(false),
            fail_navigation: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<NavCall> {
        self.calls.lock().clone()
    }

    pub fn set_back_route(&self, route: &str) {
        *self.back_route.lock() = route.to_string();
    }

    pub fn set_transition_on_top(&self) {
        self.transition_on_top.store(true, Ordering::SeqCst);
    }

    pub fn fail_navigation(&self) {
        self.fail_navigation.store(true, Ordering::SeqCst);
    }

    fn record(&self, call: NavCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait::async_trait]
impl Navigator for FakeNavigator {
    async fn wait_until_ready(&self) {
        self.record(NavCall::WaitUntilReady);
    }

    fn active_route(&self) -> String {
        self.route.lock().clone()
    }

    fn is_active_route(&self, route: String) -> bool {
        self.route.lock().trim_start_matches('/') == route.trim_start_matches('/')
    }

    fn is_transition_on_top(&self) -> bool {
        self.transition_on_top.load(Ordering::SeqCst)
    }

    fn pop_transition(&self) -> ApiResult<()> {
        self.record(NavCall::PopTransition);
        self.transition_on_top.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn navigate(&self, route: String, back_to: Option<String>) -> ApiResult<()> {
        self.record(NavCall::Navigate(route.clone(), back_to));
        if self.fail_navigation.load(Ordering::SeqCst) {
            return Err(NotificationGatewayApiError::Other {
                reason: "navigation not mounted".to_string(),
            });
        }
        *self.route.lock() = route;
        Ok(())
    }

    fn go_back(&self) -> ApiResult<()> {
        self.record(NavCall::GoBack);
        *self.route.lock() = self.back_route.lock().clone();
        Ok(())
    }

    fn close_overlays(&self) {
        self.record(NavCall::CloseOverlays);
    }

    fn release_overlays(&self) {
        self.record(NavCall::ReleaseOverlays);
    }
}
