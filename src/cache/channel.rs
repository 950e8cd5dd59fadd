//! Typed channel between the page context (the TUI) and the cache worker.
//!
//! The upgrade protocol carries exactly two signals: the page may request
//! an immediate takeover (skip-waiting), and the worker notifies the page
//! when a new version is ready and when it has taken control (reload).
//! Asset requests travel on a separate query channel with a oneshot reply,
//! suspending the request until routing resolves.

use tokio::sync::{mpsc, oneshot};

use super::fetch::AssetRequest;
use super::manager::Intercept;

/// Buffer size for the worker message channels.
/// 32 matches typical burst sizes (a screenful of asset requests) with headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Page-to-worker control messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMessage {
    /// Ask the waiting version to take over immediately.
    SkipWaiting,
}

/// Worker-to-page notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerMessage {
    /// A new version finished installing while an old one is in control.
    UpdateReady,
    /// The new version took control; the page should reload state once.
    ReloadPage,
}

/// An asset request awaiting a routing decision.
pub struct AssetQuery {
    pub request: AssetRequest,
    pub reply: oneshot::Sender<Intercept>,
}

/// Page-side endpoint.
pub struct PageHandle {
    msg_tx: mpsc::Sender<PageMessage>,
    event_rx: mpsc::Receiver<WorkerMessage>,
    query_tx: mpsc::Sender<AssetQuery>,
}

impl PageHandle {
    /// Route a request through the cache manager, suspending until the
    /// lookup and/or network fetch resolves. A gone worker answers
    /// `PassThrough`.
    pub async fn fetch(&self, request: AssetRequest) -> Intercept {
        let (reply, rx) = oneshot::channel();
        if self.query_tx.send(AssetQuery { request, reply }).await.is_err() {
            return Intercept::PassThrough;
        }
        rx.await.unwrap_or(Intercept::PassThrough)
    }

    pub async fn request_skip_waiting(&self) {
        let _ = self.msg_tx.send(PageMessage::SkipWaiting).await;
    }

    /// Non-blocking poll for worker notifications (main loop tick).
    pub fn try_event(&mut self) -> Option<WorkerMessage> {
        self.event_rx.try_recv().ok()
    }

    /// Await the next worker notification.
    pub async fn event(&mut self) -> Option<WorkerMessage> {
        self.event_rx.recv().await
    }
}

/// Worker-side endpoint.
pub struct WorkerChannel {
    pub msg_rx: mpsc::Receiver<PageMessage>,
    pub query_rx: mpsc::Receiver<AssetQuery>,
    event_tx: mpsc::Sender<WorkerMessage>,
}

impl WorkerChannel {
    /// Notify all page instances, best effort.
    pub fn notify(&self, message: WorkerMessage) {
        let _ = self.event_tx.try_send(message);
    }
}

/// Create a connected page/worker endpoint pair.
pub fn channel() -> (PageHandle, WorkerChannel) {
    let (msg_tx, msg_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
    let (event_tx, event_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
    let (query_tx, query_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

    (
        PageHandle {
            msg_tx,
            event_rx,
            query_tx,
        },
        WorkerChannel {
            msg_rx,
            query_rx,
            event_tx,
        },
    )
}
