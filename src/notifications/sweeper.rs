//! Background sweep for due notifications.
//!
//! The sweep is an injectable scheduled task with an explicit start/stop
//! lifecycle owned by the host process, not a global singleton. Its only
//! contract with the rest of the core is "poll due notifications, mark
//! sent": it is fully decoupled from booking, its failures are logged and
//! never retried, and nothing it does rolls back booking state.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::NotificationDispatcher;
use crate::config::BookingConfig;
use crate::db::repository::{FullRepository, RepositoryResult};

/// Periodically polls the notification queue and dispatches due entries.
pub struct ReminderSweeper {
    repo: Arc<dyn FullRepository>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    interval: Duration,
}

impl ReminderSweeper {
    pub fn new(
        repo: Arc<dyn FullRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        config: &BookingConfig,
    ) -> Self {
        Self {
            repo,
            dispatcher,
            interval: Duration::from_secs(config.sweep_interval_secs),
        }
    }

    /// Override the poll interval. Tests shrink it to milliseconds.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run one sweep: dispatch every due notification and mark it sent.
    ///
    /// A notification is marked sent even when delivery fails; there is no
    /// retry. Returns the number of notifications processed.
    pub async fn sweep_once(&self) -> RepositoryResult<usize> {
        let now = Utc::now();
        let due = self.repo.due_notifications(now).await?;
        let mut processed = 0;

        for notification in due {
            match self.repo.get_appointment(notification.appointment_id).await {
                Ok(appointment) => {
                    if let Err(err) = self
                        .dispatcher
                        .deliver(&appointment, notification.kind)
                        .await
                    {
                        error!(
                            notification_id = %notification.id,
                            appointment_id = %notification.appointment_id,
                            error = %err,
                            "notification delivery failed"
                        );
                    }
                }
                Err(err) => {
                    error!(
                        notification_id = %notification.id,
                        error = %err,
                        "due notification references a missing appointment"
                    );
                }
            }

            self.repo
                .mark_notification_sent(notification.id, now)
                .await?;
            processed += 1;
        }

        if processed > 0 {
            debug!(processed, "notification sweep finished");
        }
        Ok(processed)
    }

    /// Spawn the sweep loop. The first poll runs immediately, then every
    /// configured interval until [`SweeperHandle::stop`] is called.
    pub fn start(self) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let interval = self.interval;

        let task = tokio::spawn(async move {
            info!(interval_secs = interval.as_secs_f64(), "reminder sweep started");
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(err) = self.sweep_once().await {
                            error!(error = %err, "notification sweep failed");
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        info!("reminder sweep stopped");
                        break;
                    }
                }
            }
        });

        SweeperHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Handle to a running sweep loop.
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the loop to exit and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}
