//! Session engine: drives one [`Session`] on a tokio task.
//!
//! The task is the session's event queue. UI events arrive over a channel,
//! clock ticks come from an interval owned by the same task, and handlers
//! never run concurrently. The task ends on the submitted transition and
//! drops the interval with it.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::access::AccessGrant;
use crate::error::SessionError;
use crate::model::Quiz;
use crate::session::{
    Outcome, Session, SessionSnapshot, SessionStatus, Submission, SubmissionCause, TickOutcome,
};

/// Configuration for the session engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Wall-clock length of one countdown second.
    pub tick: Duration,
    /// Remaining seconds at or below which the observer is warned once.
    pub low_time_warning_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            low_time_warning_secs: 300,
        }
    }
}

/// Progress reporting trait.
pub trait SessionObserver: Send + Sync {
    fn on_tick(&self, remaining_secs: u64);
    fn on_low_time(&self, remaining_secs: u64);
    fn on_answer(&self, index: usize, label: &str, outcome: &Result<Outcome, SessionError>);
    fn on_submitted(&self, submission: &Submission);
}

/// No-op observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_tick(&self, _: u64) {}
    fn on_low_time(&self, _: u64) {}
    fn on_answer(&self, _: usize, _: &str, _: &Result<Outcome, SessionError>) {}
    fn on_submitted(&self, _: &Submission) {}
}

type Reply = oneshot::Sender<Result<Outcome, SessionError>>;

enum Command {
    RecordAnswer {
        index: usize,
        label: String,
        reply: Reply,
    },
    Submit {
        reply: Reply,
    },
}

/// Entry point for running sessions.
pub struct SessionEngine;

impl SessionEngine {
    /// Start a session for `quiz` and run it on a new task.
    ///
    /// # Errors
    ///
    /// Returns the session's start error; no task is spawned in that case.
    pub fn start(
        quiz: Arc<Quiz>,
        grant: &AccessGrant,
        config: EngineConfig,
        observer: Arc<dyn SessionObserver>,
    ) -> Result<SessionHandle, SessionError> {
        let mut session = Session::new(quiz);
        session.start(grant)?;

        let (commands, rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshots) = watch::channel(session.snapshot());
        let task = tokio::spawn(run(session, rx, snapshot_tx, config, observer));

        Ok(SessionHandle {
            commands,
            snapshots,
            task,
        })
    }
}

async fn run(
    mut session: Session,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<SessionSnapshot>,
    config: EngineConfig,
    observer: Arc<dyn SessionObserver>,
) -> Session {
    let mut clock = time::interval_at(Instant::now() + config.tick, config.tick);
    clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut warned = false;

    while session.status() == SessionStatus::InProgress {
        tokio::select! {
            biased;
            Some(command) = commands.recv() => match command {
                Command::RecordAnswer { index, label, reply } => {
                    let outcome = session.record_answer(index, &label);
                    observer.on_answer(index, &label, &outcome);
                    let _ = reply.send(outcome);
                }
                Command::Submit { reply } => {
                    let _ = reply.send(session.submit(SubmissionCause::Manual));
                }
            },
            _ = clock.tick() => {
                if let TickOutcome::Running { remaining_secs } = session.tick() {
                    observer.on_tick(remaining_secs);
                    if !warned && remaining_secs <= config.low_time_warning_secs {
                        warned = true;
                        observer.on_low_time(remaining_secs);
                    }
                }
            }
        }
        snapshots.send_replace(session.snapshot());
    }

    drop(clock);
    if let Some(submission) = session.submission() {
        observer.on_submitted(submission);
    }
    snapshots.send_replace(session.snapshot());
    session
}

/// Caller-side handle to a running session.
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
    task: JoinHandle<Session>,
}

impl SessionHandle {
    /// Record an answer. After submission this is a silent no-op.
    pub async fn record_answer(
        &self,
        index: usize,
        label: impl Into<String>,
    ) -> Result<Outcome, SessionError> {
        let (reply, rx) = oneshot::channel();
        let command = Command::RecordAnswer {
            index,
            label: label.into(),
            reply,
        };
        self.send(command, rx).await
    }

    /// Submit manually. After submission this is a silent no-op.
    pub async fn submit(&self) -> Result<Outcome, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Submit { reply }, rx).await
    }

    async fn send(
        &self,
        command: Command,
        rx: oneshot::Receiver<Result<Outcome, SessionError>>,
    ) -> Result<Outcome, SessionError> {
        if self.commands.send(command).is_err() {
            return Ok(Outcome::Ignored);
        }
        rx.await.unwrap_or(Ok(Outcome::Ignored))
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that sees every tick and state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until the session is submitted and return the final snapshot.
    pub async fn submitted(&self) -> SessionSnapshot {
        let mut rx = self.snapshots.clone();
        if let Ok(snapshot) = rx.wait_for(SessionSnapshot::is_submitted).await {
            return snapshot.clone();
        }
        let last = rx.borrow().clone();
        last
    }

    /// Stop sending events and wait for the session to end.
    ///
    /// An in-progress session keeps running until its clock expires.
    pub async fn finish(self) -> Result<Session> {
        drop(self.commands);
        self.task.await.context("session task failed")
    }
}
