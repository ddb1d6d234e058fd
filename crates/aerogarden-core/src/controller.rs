// ── Controller abstraction ──
//
// Lifecycle of one garden account: login, cache refresh, throttled
// refresh, light toggle with read-after-write refetch, and the optional
// background poller.

use std::sync::Arc;
use std::time::Duration;

use aerogarden_api::{Credentials, DeviceConfigUpdate, DeviceQuery, GardenClient, Session};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::convert::gardens_from_devices;
use crate::error::CoreError;
use crate::model::{Garden, GardenKey, GardenMap, fields};
use crate::store::GardenStore;
use crate::stream::GardenStream;
use crate::throttle::Throttle;

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Owns the session client
/// and the garden cache; every cache write goes through
/// [`fetch_data`](Self::fetch_data).
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    credentials: Credentials,
    client: GardenClient,
    store: GardenStore,
    throttle: Throttle,
    /// Serializes login and refresh so only one request mutates state.
    refresh_lock: Mutex<()>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Create a controller. Does NOT contact the service; the first
    /// refresh logs in on demand.
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        let client = GardenClient::new(config.host.clone(), &config.transport())?;
        let credentials = config.credentials();
        let throttle = Throttle::new(config.throttle);

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                credentials,
                client,
                store: GardenStore::new(),
                throttle,
                refresh_lock: Mutex::new(()),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Access the controller configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    /// Access the underlying store.
    pub fn store(&self) -> &GardenStore {
        &self.inner.store
    }

    // ── Session ──────────────────────────────────────────────────

    /// Log in unconditionally, replacing any held session.
    pub async fn login(&self) -> Result<(), CoreError> {
        let _guard = self.inner.refresh_lock.lock().await;
        self.inner
            .client
            .login(&self.inner.credentials)
            .await
            .map_err(|e| self.record(self.api_error(e)))?;
        info!(username = %self.inner.config.username, "logged in");
        Ok(())
    }

    /// `true` once a login has produced a session.
    pub fn is_valid_login(&self) -> bool {
        self.inner.client.is_valid_login()
    }

    /// Last diagnostic message, already scrubbed of the password.
    pub fn error(&self) -> Option<String> {
        self.inner.client.error()
    }

    pub fn session(&self) -> Session {
        self.inner.client.session()
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Fetch every garden and replace the cache.
    ///
    /// Logs in first when no session is held. A `Message` reply or a
    /// device that fails to decode leaves the previous cache in place.
    pub async fn fetch_data(&self) -> Result<Arc<GardenMap>, CoreError> {
        let _guard = self.inner.refresh_lock.lock().await;
        match self.refresh_locked().await {
            Ok(gardens) => Ok(gardens),
            Err(e) => {
                warn!(error = %e, "garden refresh failed");
                Err(self.record(e))
            }
        }
    }

    /// [`fetch_data`](Self::fetch_data) with the outcome folded to a flag.
    /// The failure reason is available from [`error`](Self::error).
    pub async fn update(&self) -> bool {
        self.fetch_data().await.is_ok()
    }

    /// Like [`update`](Self::update), but at most once per throttle
    /// window. Returns `None` without any I/O when throttled.
    pub async fn throttled_update(&self) -> Option<bool> {
        if !self.inner.throttle.try_acquire() {
            debug!(
                remaining_ms = self.inner.throttle.remaining().as_millis(),
                "refresh throttled"
            );
            return None;
        }
        Some(self.update().await)
    }

    async fn refresh_locked(&self) -> Result<Arc<GardenMap>, CoreError> {
        self.ensure_login().await?;

        let query = self
            .inner
            .client
            .query_user_devices()
            .await
            .map_err(|e| self.api_error(e))?;

        let devices = match query {
            DeviceQuery::Devices(devices) => devices,
            DeviceQuery::Rejected { message } => {
                return Err(CoreError::Application {
                    message: format!("Couldn't get data for garden: {message}"),
                });
            }
        };

        let gardens = self.inner.store.replace(gardens_from_devices(devices)?);
        debug!(gardens = gardens.len(), "garden refresh complete");
        Ok(gardens)
    }

    /// Caller must hold `refresh_lock`.
    async fn ensure_login(&self) -> Result<(), CoreError> {
        if self.inner.client.is_valid_login() {
            return Ok(());
        }
        self.inner
            .client
            .login(&self.inner.credentials)
            .await
            .map_err(|e| self.api_error(e))?;
        info!(username = %self.inner.config.username, "logged in");
        Ok(())
    }

    // ── Light control ────────────────────────────────────────────

    /// Advance a garden's light one step and refetch the cache.
    ///
    /// The firmware only cycles bright → dimmed → off, so the resulting
    /// state is read back rather than guessed. Unknown keys fail before
    /// any request. A rejected update is not followed by a refetch. A
    /// failed refetch after an accepted update is logged, not returned.
    pub async fn toggle_light(&self, key: &str) -> Result<(), CoreError> {
        let Some(garden) = self.inner.store.get(key) else {
            debug!(garden = key, "light toggle for unknown garden");
            return Err(self.record(CoreError::GardenNotFound { key: key.to_owned() }));
        };

        let update = DeviceConfigUpdate {
            air_guid: garden.key.to_string(),
            choose_garden: garden
                .field(fields::CHOOSE_GARDEN)
                .cloned()
                .unwrap_or(Value::Null),
            light_temp: garden
                .field(fields::LIGHT_TEMP)
                .cloned()
                .unwrap_or(Value::Null),
        };

        // Held through the POST; the body carries the session's user id.
        let guard = self.inner.refresh_lock.lock().await;
        self.ensure_login().await.map_err(|e| self.record(e))?;
        let response = self
            .inner
            .client
            .update_device_config(&update)
            .await
            .map_err(|e| self.record(self.api_error(e)))?;
        drop(guard);

        if !response.is_success() {
            let msg = response.msg.as_deref().unwrap_or("no message");
            let err = CoreError::ToggleRejected {
                message: format!("Didn't get code 1 from update API call: {msg}"),
            };
            warn!(garden = key, error = %err, "light toggle rejected");
            return Err(self.record(err));
        }

        info!(garden = key, "light toggled");
        if let Err(e) = self.fetch_data().await {
            warn!(garden = key, error = %e, "refresh after light toggle failed");
        }
        Ok(())
    }

    /// [`toggle_light`](Self::toggle_light) with the outcome folded to a flag.
    pub async fn light_toggle(&self, key: &str) -> bool {
        self.toggle_light(key).await.is_ok()
    }

    // ── Cache queries ────────────────────────────────────────────

    /// Raw field value for a garden. Never fails.
    pub fn garden_property(&self, key: &str, field: &str) -> Option<Value> {
        self.inner.store.property(key, field)
    }

    /// Display name for a garden (see [`Garden::display_name`]).
    pub fn garden_name(&self, key: &str) -> Option<String> {
        self.inner.store.get(key)?.display_name()
    }

    pub fn garden(&self, key: &str) -> Option<Arc<Garden>> {
        self.inner.store.get(key)
    }

    /// Cached keys in response order.
    pub fn gardens(&self) -> Vec<GardenKey> {
        self.inner.store.keys()
    }

    pub fn snapshot(&self) -> Arc<GardenMap> {
        self.inner.store.snapshot()
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to cache replacements.
    pub fn subscribe(&self) -> GardenStream {
        self.inner.store.subscribe()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.inner.store.last_refresh()
    }

    // ── Background polling ───────────────────────────────────────

    /// Spawn the background poller if `poll_interval` is non-zero.
    pub async fn start_polling(&self) {
        let interval = self.inner.config.poll_interval;
        if interval.is_zero() {
            debug!("polling disabled");
            return;
        }
        let ctrl = self.clone();
        let cancel = self.inner.cancel.clone();
        self.inner
            .task_handles
            .lock()
            .await
            .push(tokio::spawn(poll_task(ctrl, interval, cancel)));
    }

    /// Cancel background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("controller shut down");
    }

    // ── Error plumbing ───────────────────────────────────────────

    /// Translate an API error, filling in the host for connection failures.
    fn api_error(&self, err: aerogarden_api::Error) -> CoreError {
        match CoreError::from(err) {
            CoreError::ConnectionFailed { url, reason } if url.is_empty() => {
                CoreError::ConnectionFailed {
                    url: self.inner.config.host.to_string(),
                    reason,
                }
            }
            other => other,
        }
    }

    /// Store the redacted message as the last error and hand `err` back.
    fn record(&self, err: CoreError) -> CoreError {
        let message = self.inner.credentials.redact(&err.to_string());
        self.inner.client.record_error(message);
        err
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Refresh the cache every `interval` until cancelled. Failures are
/// logged and the loop keeps going.
async fn poll_task(controller: Controller, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(e) = controller.fetch_data().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}
