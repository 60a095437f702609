//! Cooperative shutdown signal shared by every task.
//!
//! A [`ShutdownHandle`] is held by whoever decides the process is done
//! (Ctrl-C handler, the shell's `quit` command); each task holds a
//! [`Shutdown`] receiver and checks it at iteration boundaries and inside
//! every timed wait. Dropping the handle counts as a trigger, so tasks can
//! never outlive the coordinator.

use std::time::Duration;

use tokio::sync::watch;

/// Create a linked trigger/receiver pair.
pub fn channel() -> (ShutdownHandle, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, Shutdown { rx })
}

/// Sending side: flips the flag exactly once; idempotent.
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    /// Signal every receiver. Safe to call more than once.
    pub fn trigger(&self) {
        // send only fails when every receiver is gone, which is fine.
        let _ = self.tx.send(true);
    }

    /// A fresh receiver for another task.
    pub fn subscribe(&self) -> Shutdown {
        Shutdown {
            rx: self.tx.subscribe(),
        }
    }
}

/// Receiving side, one clone per task.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// `true` once shutdown has been triggered.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve when shutdown is triggered (or the handle is dropped).
    pub async fn triggered(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Sleep for `duration` unless shutdown interrupts.
    ///
    /// Returns `true` when the full duration elapsed, `false` when the
    /// sleep was cut short by shutdown.
    pub async fn sleep(&mut self, duration: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = self.triggered() => false,
        }
    }
}
