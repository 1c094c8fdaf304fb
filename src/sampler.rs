//! Sampler actor - polls the metric source and fans readings out.
//!
//! The sampler owns the authoritative "current load" value. It polls the
//! metric source on a fixed interval and delivers every new reading to every
//! registered subscriber over that subscriber's own unbounded channel, so a
//! slow or absent subscriber can never stall the poll loop or its peers.
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → fetch load → store under write lock → fan out → [subscribers]
//!     ↑
//!     └─── Commands (PollNow, Shutdown)
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock, mpsc, oneshot};
use tokio::time::interval;
use tracing::{debug, error, instrument, trace, warn};

use crate::feed::MetricSource;

/// A single load reading, fanned out to every subscriber.
#[derive(Debug, Clone)]
pub struct LoadEvent {
    /// Aggregate load percentage (may exceed 100 under hyperthread saturation)
    pub load: u64,

    /// When the reading was taken
    pub timestamp: DateTime<Utc>,
}

/// Commands that can be sent to a running sampler
#[derive(Debug)]
enum SamplerCommand {
    /// Trigger an immediate poll (bypassing the interval timer) and report the
    /// polled load back.
    PollNow { respond_to: oneshot::Sender<u64> },

    /// Gracefully shut down the sampler
    Shutdown,
}

/// State shared between the actor and its handles.
struct Shared {
    /// Last known load; readers may run concurrently with a poll write.
    current_load: RwLock<u64>,

    /// Registry of subscriber endpoints. Senders whose receiver has been
    /// dropped are pruned on the next poll.
    subscribers: Mutex<Vec<mpsc::UnboundedSender<LoadEvent>>>,
}

/// Actor that polls the metric source at a fixed interval.
struct SamplerActor {
    source: Arc<dyn MetricSource>,
    shared: Arc<Shared>,
    command_rx: mpsc::Receiver<SamplerCommand>,
    interval_duration: Duration,
}

impl SamplerActor {
    /// Run the actor's main loop.
    ///
    /// The first tick fires immediately, so a reading is taken at startup.
    /// Runs until a Shutdown command arrives or every handle is dropped.
    #[instrument(skip(self))]
    async fn run(mut self) {
        debug!(
            "starting sampler with interval {:?}",
            self.interval_duration
        );

        let mut ticker = interval(self.interval_duration);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_once().await;
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(SamplerCommand::PollNow { respond_to }) => {
                            debug!("received PollNow command");
                            let load = self.poll_once().await;
                            let _ = respond_to.send(load);
                        }

                        Some(SamplerCommand::Shutdown) => {
                            debug!("received shutdown command");
                            break;
                        }

                        None => {
                            warn!("all handles dropped, shutting down");
                            break;
                        }
                    }
                }
            }
        }

        // Drop the registry so subscribers observe end-of-stream.
        self.shared.subscribers.lock().await.clear();

        debug!("sampler stopped");
    }

    /// Fetch one reading, store it, and fan it out.
    ///
    /// A failed fetch degrades to load 0; subscribers cannot distinguish an
    /// idle cluster from an unreachable feed.
    async fn poll_once(&self) -> u64 {
        let load = match self.source.fetch_load().await {
            Ok(load) => load,
            Err(e) => {
                error!("failed to fetch load, treating as idle: {e:#}");
                0
            }
        };

        *self.shared.current_load.write().await = load;

        let event = LoadEvent {
            load,
            timestamp: Utc::now(),
        };

        // Unbounded sends never block, so fan-out cannot stall on a slow
        // subscriber. Sends issue in poll order from this single task, which
        // gives each subscriber FIFO delivery. Closed endpoints are pruned.
        let mut subscribers = self.shared.subscribers.lock().await;
        let before = subscribers.len();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());

        let pruned = before - subscribers.len();
        if pruned > 0 {
            debug!("pruned {pruned} closed subscriber(s)");
        }

        trace!("delivered load {load}% to {} subscriber(s)", subscribers.len());

        load
    }
}

/// Handle for a running sampler.
///
/// Cloneable; all clones talk to the same actor and share the same current
/// load value and subscriber registry.
#[derive(Clone)]
pub struct SamplerHandle {
    sender: mpsc::Sender<SamplerCommand>,
    shared: Arc<Shared>,
}

impl SamplerHandle {
    /// Spawn a sampler polling `source` every `interval`.
    pub fn spawn(source: Arc<dyn MetricSource>, interval: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let shared = Arc::new(Shared {
            current_load: RwLock::new(0),
            subscribers: Mutex::new(Vec::new()),
        });

        let actor = SamplerActor {
            source,
            shared: Arc::clone(&shared),
            command_rx: cmd_rx,
            interval_duration: interval,
        };

        tokio::spawn(actor.run());

        Self {
            sender: cmd_tx,
            shared,
        }
    }

    /// Register a new subscriber endpoint.
    ///
    /// The receiver sees every reading taken after registration, in poll
    /// order. May be called at any time.
    pub async fn subscribe(&self) -> mpsc::UnboundedReceiver<LoadEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.shared.subscribers.lock().await.push(tx);
        rx
    }

    /// Trigger an immediate poll and return the reading it produced.
    ///
    /// By the time this returns, the reading has been stored and handed to
    /// every subscriber channel.
    pub async fn poll_now(&self) -> Result<u64> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SamplerCommand::PollNow { respond_to: tx })
            .await
            .context("failed to send PollNow command")?;

        rx.await.context("failed to receive polled load")
    }

    /// Last known load. Never touches the network.
    pub async fn current_load(&self) -> u64 {
        *self.shared.current_load.read().await
    }

    /// Gracefully shut down the sampler.
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(SamplerCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")?;
        Ok(())
    }
}
