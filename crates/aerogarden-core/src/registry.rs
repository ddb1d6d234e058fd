// ── Account registry ──
//
// Explicit context object holding one controller per configured account.
// Host adapters look controllers up here by entry id instead of through
// global state.

use indexmap::IndexMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::ControllerConfig;
use crate::controller::Controller;
use crate::error::CoreError;

/// Configured accounts, in setup order.
#[derive(Default)]
pub struct GardenRegistry {
    entries: Mutex<IndexMap<String, Controller>>,
}

impl GardenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account.
    ///
    /// Rejects a username that is already configured (compared without
    /// case) or a reused entry id. The first refresh must succeed before
    /// the controller is stored; the background poller starts after it.
    /// The registry stays readable while that refresh is in flight.
    pub async fn setup(
        &self,
        entry_id: impl Into<String>,
        config: ControllerConfig,
    ) -> Result<Controller, CoreError> {
        let entry_id = entry_id.into();
        if is_duplicate(&*self.entries.lock().await, &entry_id, &config.username) {
            return Err(CoreError::AlreadyConfigured {
                username: config.username,
            });
        }

        let controller = Controller::new(config)?;
        controller.fetch_data().await?;

        let mut entries = self.entries.lock().await;
        let username = &controller.config().username;
        if is_duplicate(&entries, &entry_id, username) {
            debug!(entry = %entry_id, "account registered while first refresh ran");
            return Err(CoreError::AlreadyConfigured {
                username: username.clone(),
            });
        }
        controller.start_polling().await;

        info!(
            entry = %entry_id,
            gardens = controller.gardens().len(),
            "garden account set up"
        );
        entries.insert(entry_id, controller.clone());
        Ok(controller)
    }

    /// Stop the poller and drop the controller. Returns `false` for an
    /// unknown entry id.
    pub async fn teardown(&self, entry_id: &str) -> bool {
        let removed = self.entries.lock().await.shift_remove(entry_id);
        match removed {
            Some(controller) => {
                controller.shutdown().await;
                debug!(entry = entry_id, "garden account removed");
                true
            }
            None => false,
        }
    }

    pub async fn get(&self, entry_id: &str) -> Option<Controller> {
        self.entries.lock().await.get(entry_id).cloned()
    }

    pub async fn entry_ids(&self) -> Vec<String> {
        self.entries.lock().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Tear down every account.
    pub async fn shutdown(&self) {
        let drained: Vec<Controller> = self.entries.lock().await.drain(..).map(|(_, c)| c).collect();
        for controller in drained {
            controller.shutdown().await;
        }
    }
}

fn is_duplicate(entries: &IndexMap<String, Controller>, entry_id: &str, username: &str) -> bool {
    entries.contains_key(entry_id)
        || entries
            .values()
            .any(|c| c.config().username.eq_ignore_ascii_case(username))
}

/// Single login attempt for configuration flows.
///
/// `Err(AuthenticationFailed)` means the service refused the credentials;
/// connection errors mean it could not be asked.
pub async fn validate_credentials(config: ControllerConfig) -> Result<(), CoreError> {
    let controller = Controller::new(config)?;
    controller.login().await
}
