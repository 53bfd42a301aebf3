//! UseCase: 周期ブロードキャストループ
//!
//! Idle / Running の 2 状態を持つ状態機械。レジストリが空でなくなると
//! 周期タスクを 1 つだけ起動し、空になると停止する。状態遷移の判定は
//! すべて [`BroadcastLoop::sync`] に集約され、ループ自身の Mutex の下で
//! レジストリのカウントを読むため、接続・切断が並行しても「起動し損ね」
//! や「停止し損ね」は起きない。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use crate::domain::{BroadcastState, ConnectionRegistry, MessagePusher, PulseFrame};
use crate::infrastructure::dto::websocket::{MessageType, PulseMessage};

/// Period between broadcast ticks (twice per second)
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

/// The currently scheduled broadcast task, if any
struct LoopTask {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

/// Everything the loop mutates, behind one lock.
///
/// Invariant: `state.is_running()` is true iff `task` is `Some`.
struct LoopInner {
    state: BroadcastState,
    task: Option<LoopTask>,
}

/// The periodic broadcast loop.
///
/// Exactly one broadcast task may be active at a time; asking the loop to
/// start while it is already Running is a no-op. Stopping cancels the
/// pending tick; a tick already fanning out runs to completion but schedules
/// no successor.
pub struct BroadcastLoop {
    registry: Arc<dyn ConnectionRegistry>,
    pusher: Arc<dyn MessagePusher>,
    period: Duration,
    inner: Arc<Mutex<LoopInner>>,
}

impl BroadcastLoop {
    /// Create a loop with the default 500 ms tick period
    pub fn new(registry: Arc<dyn ConnectionRegistry>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self::with_period(registry, pusher, DEFAULT_TICK_INTERVAL)
    }

    /// Create a loop with a custom tick period
    pub fn with_period(
        registry: Arc<dyn ConnectionRegistry>,
        pusher: Arc<dyn MessagePusher>,
        period: Duration,
    ) -> Self {
        Self {
            registry,
            pusher,
            period,
            inner: Arc::new(Mutex::new(LoopInner {
                state: BroadcastState::new(),
                task: None,
            })),
        }
    }

    /// Reconcile the loop with the registry.
    ///
    /// Called after every register and unregister. Reads the connection
    /// count under the loop's own lock, so two interleaved connects cannot
    /// both miss the 0→1 transition, and a stale disconnect cannot stop a
    /// loop that a newer connect just started.
    pub async fn sync(&self) {
        let mut inner = self.inner.lock().await;
        let clients = self.registry.count().await;

        if clients > 0 && inner.task.is_none() {
            inner.state.set_running(true);
            let cancel = CancellationToken::new();
            let handle = self.spawn_tick_task(cancel.clone());
            inner.task = Some(LoopTask { handle, cancel });
            tracing::info!(clients, "Broadcast loop started");
        } else if clients == 0 && inner.task.is_some() {
            inner.state.set_running(false);
            if let Some(task) = inner.task.take() {
                task.cancel.cancel();
            }
            tracing::info!("Broadcast loop stopped: no clients connected");
        }
    }

    /// Whether a broadcast task is currently scheduled
    pub async fn is_running(&self) -> bool {
        let inner = self.inner.lock().await;
        inner.state.is_running()
    }

    /// Build a one-off welcome frame from the current toggle value
    pub async fn welcome_frame(&self) -> PulseFrame {
        let inner = self.inner.lock().await;
        inner.state.welcome_frame(&mut rand::rng())
    }

    /// Stop the loop and wait for its task to finish.
    ///
    /// Used on server shutdown; unlike [`sync`](Self::sync) it does not
    /// consult the registry.
    pub async fn shutdown(&self) {
        let task = {
            let mut inner = self.inner.lock().await;
            inner.state.set_running(false);
            inner.task.take()
        };
        if let Some(task) = task {
            task.cancel.cancel();
            if let Err(e) = task.handle.await {
                tracing::warn!(error = %e, "Broadcast task did not shut down cleanly");
            }
            tracing::info!("Broadcast loop shut down");
        }
    }

    fn spawn_tick_task(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let pusher = self.pusher.clone();
        let inner = self.inner.clone();
        let period = self.period;

        tokio::spawn(async move {
            let mut tick = interval(period);

            loop {
                tokio::select! {
                    biased;

                    _ = cancel.cancelled() => break,

                    _ = tick.tick() => {
                        let frame = {
                            let mut guard = inner.lock().await;
                            if !guard.state.is_running() {
                                break;
                            }
                            guard.state.next_frame(&mut rand::rng())
                        };

                        let json = serde_json::to_string(&PulseMessage {
                            r#type: MessageType::Message,
                            random_number: frame.random_number,
                            boolean: frame.boolean,
                        })
                        .unwrap();

                        let delivered = pusher.broadcast_all(&json).await;
                        tracing::debug!(
                            random_number = frame.random_number,
                            boolean = frame.boolean,
                            delivered,
                            "Broadcast tick"
                        );
                    }
                }
            }

            tracing::debug!("Broadcast task completed");
        })
    }
}
