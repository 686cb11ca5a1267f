//! The reply workflow state machine.
//!
//! ```text
//! Idle ──analyze──▶ Analyzing ──▶ Ready ──generate──▶ Generating ──▶ Presented
//!                                                                    │    ▲
//!                                                              deliver    │
//!                                                                    ▼    │
//!                                                                 Delivering
//! ```
//!
//! [`ReplyWorkflow`] owns the captured [`EmailContext`] and the draft reply.
//! State sits behind a `std::sync::Mutex` that is only locked for short,
//! synchronous sections and never across an `.await`. A single in-flight
//! flag rejects overlapping analyze/generate/deliver calls with
//! [`WorkflowError::Busy`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use replypane_host::{HostError, MailContextAdapter, WriteMode};
use replypane_llm::ReplyBackend;
use replypane_types::{EmailContext, GenerationRequest, Tone};
use tracing::{debug, info, warn};

use crate::activity_log::{ActivityLog, LogEntry};
use crate::error::{Result, WorkflowError};

/// Where the workflow is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Analyzing,
    Ready,
    Generating,
    Presented,
    Delivering,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Analyzing => "analyzing",
            Phase::Ready => "ready",
            Phase::Generating => "generating",
            Phase::Presented => "presented",
            Phase::Delivering => "delivering",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default)]
struct WorkflowState {
    phase: Phase,
    context: Option<EmailContext>,
    draft: String,
}

/// Clears the in-flight flag when dropped.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

fn lock_state<R>(state: &Mutex<WorkflowState>, f: impl FnOnce(&mut WorkflowState) -> R) -> R {
    let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Holds the workflow in a transient phase. Dropping it without
/// [`settle`](PhaseGuard::settle) restores the phase it replaced, so a
/// cancelled operation never leaves the workflow stuck mid-flight.
struct PhaseGuard<'a> {
    state: &'a Mutex<WorkflowState>,
    prior: Phase,
    settled: bool,
}

impl<'a> PhaseGuard<'a> {
    fn enter(state: &'a Mutex<WorkflowState>, phase: Phase) -> Self {
        let prior = lock_state(state, |s| std::mem::replace(&mut s.phase, phase));
        if prior != phase {
            debug!(from = %prior, to = %phase, "phase change");
        }
        Self {
            state,
            prior,
            settled: false,
        }
    }

    /// Leave the transient phase; `f` must set the next phase.
    fn settle(mut self, f: impl FnOnce(&mut WorkflowState)) {
        self.settled = true;
        lock_state(self.state, f);
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let prior = self.prior;
            lock_state(self.state, |s| s.phase = prior);
        }
    }
}

/// Coordinates the mail host adapter and the reply backend.
pub struct ReplyWorkflow {
    adapter: Arc<dyn MailContextAdapter>,
    backend: Arc<dyn ReplyBackend>,
    state: Mutex<WorkflowState>,
    log: ActivityLog,
    in_flight: AtomicBool,
}

impl ReplyWorkflow {
    pub fn new(adapter: Arc<dyn MailContextAdapter>, backend: Arc<dyn ReplyBackend>) -> Self {
        Self {
            adapter,
            backend,
            state: Mutex::new(WorkflowState::default()),
            log: ActivityLog::new(),
            in_flight: AtomicBool::new(false),
        }
    }

    // ── accessors ───────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.with_state(|s| s.phase)
    }

    /// The captured email context, if analyze has succeeded.
    pub fn context(&self) -> Option<EmailContext> {
        self.with_state(|s| s.context.clone())
    }

    pub fn draft(&self) -> String {
        self.with_state(|s| s.draft.clone())
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.log.entries()
    }

    pub fn host_available(&self) -> bool {
        self.adapter.is_host_available()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// True while an analyze, generate or deliver call is pending.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    // ── operations ──────────────────────────────────────────────────────

    /// Capture the open item's context, replacing any previous one.
    ///
    /// The draft is left untouched. On failure the previous phase is
    /// restored.
    pub async fn analyze(&self) -> Result<EmailContext> {
        let _guard = self.begin("analyze")?;
        self.run_analyze().await
    }

    /// Generate a reply and present it as the new draft.
    ///
    /// Without a captured context, one analyze runs first. On failure the
    /// previous draft is kept.
    pub async fn generate(&self, intent: Option<String>, tone: Tone) -> Result<String> {
        let _guard = self.begin("generate")?;

        let context = match self.context() {
            Some(ctx) => ctx,
            None => {
                debug!("no context captured, analyzing first");
                self.run_analyze().await?
            }
        };

        let request = GenerationRequest::new(context, tone).with_intent(intent);
        let phase = PhaseGuard::enter(&self.state, Phase::Generating);
        self.log.append(format!(
            "Generating {tone} reply via {} backend...",
            self.backend.name()
        ));
        info!(backend = self.backend.name(), %tone, "generating reply");

        match self.backend.generate(&request).await {
            Ok(text) => {
                phase.settle(|s| {
                    s.draft = text.clone();
                    s.phase = Phase::Presented;
                });
                self.log.append("Received reply from backend.");
                Ok(text)
            }
            Err(err) => {
                phase.settle(|s| {
                    s.phase = if s.draft.is_empty() {
                        Phase::Ready
                    } else {
                        Phase::Presented
                    };
                });
                warn!(error = %err, "generation failed");
                self.log.append(format!("Error: {err}"));
                Err(err.into())
            }
        }
    }

    /// Replace the draft with user-edited text. Allowed in any phase.
    pub fn edit_draft(&self, text: impl Into<String>) {
        let text = text.into();
        debug!(chars = text.chars().count(), "draft edited");
        self.with_state(|s| s.draft = text);
    }

    /// Write the draft into the open item.
    ///
    /// An empty or whitespace-only draft is rejected before the adapter is
    /// touched.
    pub async fn deliver(&self, mode: WriteMode) -> Result<()> {
        let _guard = self.begin("deliver")?;

        let draft = self.draft();
        if draft.trim().is_empty() {
            self.log.append("No reply text to insert.");
            return Err(WorkflowError::EmptyDraft);
        }

        let phase = PhaseGuard::enter(&self.state, Phase::Delivering);
        info!(%mode, "delivering draft");
        let result = self.adapter.write_body(&draft, mode).await;
        drop(phase);

        match result {
            Ok(()) if self.adapter.is_host_available() => {
                self.log.append(format!("Reply inserted into draft ({mode})."));
                Ok(())
            }
            Ok(()) => {
                self.log
                    .append("Testing mode: reply would be inserted into draft.");
                Ok(())
            }
            Err(HostError::NotComposable) => {
                warn!("delivery rejected: item not in compose mode");
                self.log.append("Unable to insert - not in compose mode.");
                Err(HostError::NotComposable.into())
            }
            Err(err) => {
                warn!(error = %err, "delivery failed");
                self.log.append(format!("Error inserting reply: {err}"));
                Err(err.into())
            }
        }
    }

    // ── internals ───────────────────────────────────────────────────────

    fn with_state<R>(&self, f: impl FnOnce(&mut WorkflowState) -> R) -> R {
        lock_state(&self.state, f)
    }

    fn begin(&self, operation: &'static str) -> Result<InFlightGuard<'_>> {
        InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            warn!(operation, "rejected, another operation is pending");
            self.log
                .append(format!("Busy: {operation} ignored, another operation is in progress."));
            WorkflowError::Busy { operation }
        })
    }

    /// Analyze without taking the in-flight guard (the caller holds it).
    async fn run_analyze(&self) -> Result<EmailContext> {
        let phase = PhaseGuard::enter(&self.state, Phase::Analyzing);
        if self.adapter.is_host_available() {
            self.log.append("Reading email from mailbox...");
        } else {
            self.log.append("Testing mode: using mock email data.");
        }

        match self.adapter.extract_context().await {
            Ok(ctx) => {
                phase.settle(|s| {
                    s.context = Some(ctx.clone());
                    s.phase = Phase::Ready;
                });
                info!(subject = %ctx.subject, "email context captured");
                self.log
                    .append(format!("Captured email context: \"{}\"", ctx.subject));
                Ok(ctx)
            }
            Err(err) => {
                drop(phase);
                warn!(error = %err, "context extraction failed");
                self.log.append(format!("Error: {err}"));
                Err(err.into())
            }
        }
    }
}

impl fmt::Debug for ReplyWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyWorkflow")
            .field("phase", &self.phase())
            .field("backend", &self.backend.name())
            .field("host_available", &self.host_available())
            .field("busy", &self.is_busy())
            .finish()
    }
}
