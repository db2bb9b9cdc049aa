//! Cancellation for in-flight gateway calls. A `CancelHandle` is held by whoever
//! owns the screen or command; every `CancelSignal` cloned from it resolves once
//! `cancel` is called or the handle is dropped.

use tokio::sync::watch;

#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

#[derive(Clone, Debug)]
pub struct CancelSignal {
    receiver: watch::Receiver<bool>,
}

impl CancelHandle {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    #[must_use]
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelSignal {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves when the paired handle cancels or goes away.
    pub async fn cancelled(&mut self) {
        // An Err means the handle was dropped, which counts as navigating away.
        let _ = self.receiver.wait_for(|cancelled| *cancelled).await;
    }
}
