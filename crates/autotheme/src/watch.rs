//! Appearance change subscriptions.
//!
//! [`watch`] polls an [`AppearanceSource`] on a background thread and calls
//! back whenever the snapshot changes. The returned [`Subscription`] owns
//! the thread: stopping or dropping it ends the polling loop.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use autotheme::{watch, SystemAppearance};
//!
//! let sub = watch(
//!     Arc::new(SystemAppearance::new()),
//!     Duration::from_secs(1),
//!     |appearance| println!("now {}", appearance.mode),
//! )?;
//! // ...
//! sub.stop();
//! # Ok::<(), autotheme::ThemeError>(())
//! ```

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, trace};

use crate::error::ThemeError;
use crate::mode::{Appearance, AppearanceSource};

const THREAD_NAME: &str = "autotheme-watch";

/// Starts polling `source` every `interval`.
///
/// The first snapshot is taken before this function returns; `on_change`
/// only fires for later snapshots that differ from the previous one.
///
/// # Errors
///
/// Returns [`ThemeError::Watch`] if the polling thread cannot be spawned.
pub fn watch<F>(
    source: Arc<dyn AppearanceSource>,
    interval: Duration,
    mut on_change: F,
) -> Result<Subscription, ThemeError>
where
    F: FnMut(Appearance) + Send + 'static,
{
    let mut last = source.appearance();
    debug!(initial = ?last, "watching appearance");
    poll(source, interval, move |current| {
        if current != last {
            debug!(from = ?last, to = ?current, "appearance changed");
            last = current;
            on_change(current);
        }
    })
}

/// Calls `on_poll` with every snapshot, changed or not.
///
/// Callers that cannot always act right away (for example when a lock is
/// busy) use this to retry on the next tick instead of blocking the thread.
pub(crate) fn poll<F>(
    source: Arc<dyn AppearanceSource>,
    interval: Duration,
    mut on_poll: F,
) -> Result<Subscription, ThemeError>
where
    F: FnMut(Appearance) + Send + 'static,
{
    let (stop_tx, stop_rx) = mpsc::channel::<()>();

    let handle = thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || {
            debug!(?interval, "appearance watcher started");
            // Any message or a dropped sender means stop.
            while let Err(RecvTimeoutError::Timeout) = stop_rx.recv_timeout(interval) {
                let current = source.appearance();
                trace!(?current, "polled appearance");
                on_poll(current);
            }
            debug!("appearance watcher stopped");
        })
        .map_err(ThemeError::Watch)?;

    Ok(Subscription {
        stop: Some(stop_tx),
        handle: Some(handle),
    })
}

/// Handle to a running appearance watcher.
///
/// Dropping the handle stops the watcher and waits for its thread to exit.
/// That wait lasts at most one poll, provided the callback never blocks on
/// state the stopping thread holds.
#[derive(Debug)]
#[must_use = "dropping a Subscription stops the watcher immediately"]
pub struct Subscription {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Stops the watcher and waits for its thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    /// Returns true while the polling thread is running.
    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            // A callback that drops its own subscription cannot join itself.
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}
