use crate::sdk::geo::Coordinate;
use crate::sdk::map::MapView;
use crate::sdk::orchestrator::{NavigationContext, RouteOrchestrator, SeedOutcome, TurnReport};
use crate::sdk::shell::DisplaySurface;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};

/// One unit of work for the navigation state.
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    Utterance(String),
    /// Result of the startup location lookup.
    SeedOrigin(Option<Coordinate>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnResult {
    Utterance(TurnReport),
    Seed(SeedOutcome),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Turn queue is closed")]
    Closed,

    #[error("Utterance is empty")]
    EmptyUtterance,
}

struct Job {
    turn: Turn,
    done: oneshot::Sender<TurnResult>,
}

/// Completion handle for a submitted turn. Dropping it does not cancel the turn.
#[derive(Debug)]
pub struct TurnHandle(oneshot::Receiver<TurnResult>);

impl TurnHandle {
    /// Waits for the turn to finish. `None` if the queue shut down first.
    pub async fn finished(self) -> Option<TurnResult> {
        self.0.await.ok()
    }
}

/// Cloneable entry point into a `TurnQueue`.
#[derive(Clone)]
pub struct TurnSubmitter {
    tx: mpsc::UnboundedSender<Job>,
}

impl TurnSubmitter {
    /// Queues a turn. Blank utterances are refused here and never reach
    /// the worker.
    pub fn submit(&self, turn: Turn) -> Result<TurnHandle, SubmitError> {
        if let Turn::Utterance(text) = &turn {
            if text.trim().is_empty() {
                return Err(SubmitError::EmptyUtterance);
            }
        }
        let (done, rx) = oneshot::channel();
        self.tx
            .send(Job { turn, done })
            .map_err(|_| SubmitError::Closed)?;
        Ok(TurnHandle(rx))
    }
}

/// Serializes all turns through one task, which is the only writer of the
/// route state and the map. Turns run in submission order, one at a time.
pub struct TurnQueue<M> {
    submitter: TurnSubmitter,
    worker: JoinHandle<NavigationContext<M>>,
}

impl<M: MapView + 'static> TurnQueue<M> {
    pub fn spawn<D>(orchestrator: RouteOrchestrator, ctx: NavigationContext<M>, display: D) -> Self
    where
        D: DisplaySurface + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(drain(orchestrator, ctx, display, rx));
        Self {
            submitter: TurnSubmitter { tx },
            worker,
        }
    }

    pub fn submit(&self, turn: Turn) -> Result<TurnHandle, SubmitError> {
        self.submitter.submit(turn)
    }

    pub fn submitter(&self) -> TurnSubmitter {
        self.submitter.clone()
    }

    /// Stops accepting turns from this handle, lets the queued ones finish and
    /// hands back the final navigation state. Waits for outstanding
    /// `TurnSubmitter` clones to be dropped.
    pub async fn shutdown(self) -> Result<NavigationContext<M>, JoinError> {
        drop(self.submitter);
        self.worker.await
    }
}

async fn drain<M, D>(
    orchestrator: RouteOrchestrator,
    mut ctx: NavigationContext<M>,
    mut display: D,
    mut rx: mpsc::UnboundedReceiver<Job>,
) -> NavigationContext<M>
where
    M: MapView,
    D: DisplaySurface,
{
    while let Some(job) = rx.recv().await {
        let result = match job.turn {
            Turn::Utterance(text) => {
                let report = orchestrator.handle_utterance(&mut ctx, &text).await;
                display.show(&report.display);
                TurnResult::Utterance(report)
            }
            Turn::SeedOrigin(fix) => TurnResult::Seed(orchestrator.seed_origin(&mut ctx, fix)),
        };
        // Submitter may not be waiting
        let _ = job.done.send(result);
    }
    log::debug!("Turn queue drained");
    ctx
}
