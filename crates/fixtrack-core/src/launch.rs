//! Launch-once fixture coordination.
//!
//! Test suites reuse one fixture across many cases. A [`FixtureCoordinator`]
//! remembers the last operation it applied successfully and skips re-applying
//! an operation with the same content. It is an ordinary value: each test
//! worker owns its own coordinator alongside its own store.

use crate::dialect::Dialect;
use crate::errors::Result;
use crate::executor::{execute, ExecutionReport};
use crate::operation::Operation;
use crate::session::{SessionSource, StoreSession};
use fixtrack_core_types::schema::OP_FIXTURE_LAUNCH;

/// What a launch request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The operation ran
    Executed(ExecutionReport),
    /// The same operation was the last one applied; nothing ran
    AlreadyApplied,
    /// A pending skip request consumed this launch; nothing ran
    Skipped,
}

impl LaunchOutcome {
    pub fn executed(&self) -> bool {
        matches!(self, LaunchOutcome::Executed(_))
    }
}

/// Remembers the last applied fixture and a one-shot skip flag.
#[derive(Debug, Default)]
pub struct FixtureCoordinator {
    last_applied: Option<String>,
    skip_next: bool,
}

impl FixtureCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress exactly one subsequent launch.
    ///
    /// Used by tests that only read the fixture: the data is still valid, so
    /// the next test's launch need not re-seed it.
    pub fn skip_next_launch(&mut self) {
        self.skip_next = true;
    }

    /// Forget the remembered operation so the next launch executes.
    pub fn reset(&mut self) {
        self.last_applied = None;
    }

    pub fn last_applied_digest(&self) -> Option<&str> {
        self.last_applied.as_deref()
    }

    pub fn skip_pending(&self) -> bool {
        self.skip_next
    }

    /// Apply `op` unless it is already the applied fixture.
    ///
    /// A pending skip is consumed first and leaves the remembered operation
    /// unchanged. A failed execution leaves the remembered operation
    /// unchanged too, so the next launch retries from scratch.
    ///
    /// # Errors
    ///
    /// - see [`crate::executor::execute`]
    pub fn launch_if_necessary_on(
        &mut self,
        op: &Operation,
        session: &mut dyn StoreSession,
        dialect: &dyn Dialect,
    ) -> Result<LaunchOutcome> {
        self.launch(op, |op| execute(op, session, dialect))
    }

    /// Like [`Self::launch_if_necessary_on`], opening a session from `source`
    /// only when the operation actually has to run.
    ///
    /// # Errors
    ///
    /// - `Persistence` - the session could not be opened
    /// - see [`crate::executor::execute`]
    pub fn launch_if_necessary<S: SessionSource>(
        &mut self,
        op: &Operation,
        source: &S,
    ) -> Result<LaunchOutcome> {
        self.launch(op, |op| crate::executor::execute_with(op, source))
    }

    fn launch<F>(&mut self, op: &Operation, run: F) -> Result<LaunchOutcome>
    where
        F: FnOnce(&Operation) -> Result<ExecutionReport>,
    {
        if self.skip_next {
            self.skip_next = false;
            tracing::info!(op = OP_FIXTURE_LAUNCH, outcome = "skipped", "fixture launch skipped");
            return Ok(LaunchOutcome::Skipped);
        }

        let digest = op.digest()?;
        if self.last_applied.as_deref() == Some(digest.as_str()) {
            tracing::info!(
                op = OP_FIXTURE_LAUNCH,
                outcome = "already_applied",
                operation_digest = %digest,
                "fixture already applied"
            );
            return Ok(LaunchOutcome::AlreadyApplied);
        }

        let report = run(op)?;
        self.last_applied = Some(report.operation_digest.clone());
        tracing::info!(
            op = OP_FIXTURE_LAUNCH,
            outcome = "executed",
            operation_digest = %digest,
            statement_count = report.statements_executed,
            "fixture applied"
        );
        Ok(LaunchOutcome::Executed(report))
    }
}
