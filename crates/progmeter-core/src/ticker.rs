//! Summary Ticker - cancellable periodic callback
//!
//! A dedicated thread waits on a channel with a timeout. Every timeout runs
//! the tick callback; a shutdown message (or the sender going away) ends the
//! loop. The callback is responsible for taking whatever lock guards the
//! output, the ticker itself holds none.

use crate::error::ProgressError;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Events that can be sent to the ticker thread
#[derive(Debug)]
enum TickerEvent {
    /// Stop ticking
    Shutdown,
}

/// Handle to a running ticker thread
#[derive(Debug)]
pub struct Ticker {
    sender: mpsc::Sender<TickerEvent>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a thread that calls `on_tick` every `interval` until stopped.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::TickerSpawn`] if the OS refuses the thread.
    pub fn spawn<F>(interval: Duration, mut on_tick: F) -> Result<Self, ProgressError>
    where
        F: FnMut() + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("progmeter-ticker".to_string())
            .spawn(move || {
                loop {
                    match receiver.recv_timeout(interval) {
                        Err(mpsc::RecvTimeoutError::Timeout) => on_tick(),
                        Ok(TickerEvent::Shutdown) | Err(mpsc::RecvTimeoutError::Disconnected) => {
                            break;
                        }
                    }
                }
            })
            .map_err(ProgressError::TickerSpawn)?;

        tracing::trace!(?interval, "summary ticker started");
        Ok(Self {
            sender,
            handle: Some(handle),
        })
    }

    /// Stop ticking and wait for an in-flight tick to complete.
    ///
    /// Must not be called while holding a lock the tick callback takes.
    pub fn stop(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        // Ignore errors if the thread already exited
        let _ = self.sender.send(TickerEvent::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("summary ticker panicked");
            }
            tracing::trace!("summary ticker stopped");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}
