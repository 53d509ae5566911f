//! Closure service: checklist storage, step execution and period validation.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use ohada_shared::types::{ClosurePeriodId, ClosureStepId};
use ohada_shared::{ClosurePolicy, ClosureSettings};
use tracing::{debug, info, warn};

use super::error::ClosureError;
use super::evaluator::{AlwaysPass, ControlEvaluator};
use super::progress::compliance_score;
use super::types::{
    ClosureDocument, ClosurePeriod, ClosureStep, ControlSeverity, ControlStatus, OpenPeriodInput,
    PeriodStatus, StepExecution, StepStatus,
};
use crate::store::MemoryStore;

/// Service tracking closure periods and their checklists.
///
/// Under `ClosurePolicy::Lenient` step dependencies and approvals are only
/// reported; `ClosurePolicy::Strict` turns them into errors.
pub struct ClosureService {
    periods: MemoryStore<ClosurePeriodId, ClosurePeriod>,
    settings: ClosureSettings,
    evaluator: Arc<dyn ControlEvaluator>,
}

impl ClosureService {
    /// Creates a service whose controls always pass.
    #[must_use]
    pub fn new(settings: ClosureSettings) -> Self {
        Self::with_evaluator(settings, AlwaysPass)
    }

    /// Creates a service with a custom control evaluator.
    #[must_use]
    pub fn with_evaluator(settings: ClosureSettings, evaluator: impl ControlEvaluator + 'static) -> Self {
        Self {
            periods: MemoryStore::new(),
            settings,
            evaluator: Arc::new(evaluator),
        }
    }

    /// Guard policy in use.
    #[must_use]
    pub fn policy(&self) -> ClosurePolicy {
        self.settings.policy
    }

    /// Opens a closure period with its checklist.
    ///
    /// Steps are stored ordered by `order`.
    ///
    /// # Errors
    ///
    /// Returns `ClosureError::InvalidDateRange` if `end < start`,
    /// `ClosureError::DuplicateStep` if two steps share an id and
    /// `ClosureError::UnknownDependency` if a step depends on a step
    /// missing from the checklist.
    pub fn open_period(&self, input: OpenPeriodInput) -> Result<ClosurePeriod, ClosureError> {
        if input.end < input.start {
            return Err(ClosureError::InvalidDateRange);
        }

        let mut ids = HashSet::with_capacity(input.steps.len());
        for step in &input.steps {
            if !ids.insert(step.id) {
                return Err(ClosureError::DuplicateStep(step.id));
            }
        }
        for step in &input.steps {
            if let Some(dependency) = step.dependencies.iter().find(|d| !ids.contains(d)) {
                return Err(ClosureError::UnknownDependency {
                    step: step.id,
                    dependency: *dependency,
                });
            }
        }

        let mut steps = input.steps;
        steps.sort_by_key(|s| s.order);

        let period = ClosurePeriod {
            id: ClosurePeriodId::new(),
            name: input.name,
            kind: input.kind,
            start: input.start,
            end: input.end,
            status: PeriodStatus::Open,
            compliance_score: compliance_score(&steps),
            steps,
            required_approvals: input.required_approvals,
            received_approvals: Vec::new(),
            documents: Vec::new(),
            validated_at: None,
        };

        info!(
            period_id = %period.id,
            name = %period.name,
            steps = period.steps.len(),
            "Closure period opened"
        );
        self.periods.insert(period.id, period.clone());
        Ok(period)
    }

    /// Returns a period.
    pub fn period(&self, period_id: ClosurePeriodId) -> Result<ClosurePeriod, ClosureError> {
        self.periods
            .get(&period_id)
            .ok_or(ClosureError::PeriodNotFound(period_id))
    }

    /// Lists all periods, most recent first.
    #[must_use]
    pub fn list_periods(&self) -> Vec<ClosurePeriod> {
        let mut periods = self.periods.values();
        periods.sort_by(|a, b| b.start.cmp(&a.start));
        periods
    }

    /// Lists the steps of a period in checklist order.
    pub fn list_steps(&self, period_id: ClosurePeriodId) -> Result<Vec<ClosureStep>, ClosureError> {
        let mut steps = self.period(period_id)?.steps;
        steps.sort_by_key(|s| s.order);
        Ok(steps)
    }

    /// Executes a step: marks it in progress, waits the configured delay,
    /// evaluates its controls and records the outcome.
    ///
    /// A failed auto-correctable control is corrected and counts as passed.
    /// Otherwise a failed critical control puts the step in `Error`, a failed
    /// warning in `RequiresApproval`; failed info controls do not block.
    ///
    /// # Errors
    ///
    /// - `PeriodNotFound` / `StepNotFound`
    /// - `PeriodClosed` if the period is validated (before or during the run)
    /// - `StepChanged` if the step status was changed by hand during the run
    /// - `InvalidTransition` if the step cannot start (e.g. already completed)
    /// - `UnmetDependencies` under the strict policy
    pub async fn execute_step(
        &self,
        period_id: ClosurePeriodId,
        step_id: ClosureStepId,
    ) -> Result<StepExecution, ClosureError> {
        let policy = self.settings.policy;
        let started_at = Utc::now();

        self.periods
            .update(&period_id, |period| {
                Self::start_step(period, step_id, policy)
            })
            .ok_or(ClosureError::PeriodNotFound(period_id))??;

        debug!(%period_id, %step_id, "Closure step started");

        let delay = Duration::from_millis(self.settings.step_delay_ms);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let evaluator = self.evaluator.as_ref();
        let execution = self
            .periods
            .update(&period_id, |period| {
                Self::finish_step(period, step_id, evaluator, started_at)
            })
            .ok_or(ClosureError::PeriodNotFound(period_id))??;

        info!(
            %period_id,
            %step_id,
            status = %execution.status,
            passed = execution.controls_passed,
            failed = execution.controls_failed,
            "Closure step executed"
        );
        Ok(execution)
    }

    /// Moves a step to `status` by hand.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` for transitions outside the step state
    /// machine, `UnmetDependencies` when starting a step under the strict
    /// policy, and `PeriodClosed` once the period is validated.
    pub fn set_step_status(
        &self,
        period_id: ClosurePeriodId,
        step_id: ClosureStepId,
        status: StepStatus,
    ) -> Result<ClosureStep, ClosureError> {
        let policy = self.settings.policy;
        let step = self
            .periods
            .update(&period_id, |period| {
                if status == StepStatus::InProgress {
                    Self::start_step(period, step_id, policy)?;
                } else {
                    Self::ensure_open(period)?;
                    let idx = Self::step_index(period, step_id)?;
                    let current = period.steps[idx].status;
                    if !current.can_transition_to(status) {
                        return Err(ClosureError::InvalidTransition {
                            from: current,
                            to: status,
                        });
                    }
                    period.steps[idx].status = status;
                    Self::refresh_period_status(period);
                }
                let idx = Self::step_index(period, step_id)?;
                Ok(period.steps[idx].clone())
            })
            .ok_or(ClosureError::PeriodNotFound(period_id))??;

        info!(%period_id, %step_id, %status, "Closure step status changed");
        Ok(step)
    }

    /// Records an approval. Approving twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ApproverRequired` for a blank name and `PeriodClosed` once the
    /// period is validated.
    pub fn approve(
        &self,
        period_id: ClosurePeriodId,
        approver: &str,
    ) -> Result<ClosurePeriod, ClosureError> {
        let approver = approver.trim();
        if approver.is_empty() {
            return Err(ClosureError::ApproverRequired);
        }

        let period = self
            .periods
            .update(&period_id, |period| {
                Self::ensure_open(period)?;
                if !period.received_approvals.iter().any(|a| a == approver) {
                    period.received_approvals.push(approver.to_string());
                }
                Ok(period.clone())
            })
            .ok_or(ClosureError::PeriodNotFound(period_id))??;

        info!(%period_id, approver, "Closure approval recorded");
        Ok(period)
    }

    /// Attaches a document to the period.
    ///
    /// # Errors
    ///
    /// Returns `PeriodClosed` once the period is validated.
    pub fn attach_document(
        &self,
        period_id: ClosurePeriodId,
        name: impl Into<String>,
    ) -> Result<(), ClosureError> {
        let name = name.into();
        self.periods
            .update(&period_id, |period| {
                Self::ensure_open(period)?;
                period.documents.push(ClosureDocument {
                    name,
                    attached_at: Utc::now(),
                });
                Ok(())
            })
            .ok_or(ClosureError::PeriodNotFound(period_id))?
    }

    /// Validates (closes) a period. Validating a closed period returns it
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Under the strict policy, returns `MandatoryStepsIncomplete` or
    /// `MissingApprovals` when the checklist is not done.
    pub fn validate_period(&self, period_id: ClosurePeriodId) -> Result<ClosurePeriod, ClosureError> {
        let policy = self.settings.policy;
        let period = self
            .periods
            .update(&period_id, |period| {
                if period.status.is_closed() {
                    return Ok(period.clone());
                }

                let remaining = period.incomplete_mandatory_steps();
                let missing = period.missing_approvals();
                match policy {
                    ClosurePolicy::Strict => {
                        if !remaining.is_empty() {
                            return Err(ClosureError::MandatoryStepsIncomplete(remaining.len()));
                        }
                        if !missing.is_empty() {
                            return Err(ClosureError::MissingApprovals(missing));
                        }
                    }
                    ClosurePolicy::Lenient => {
                        if !remaining.is_empty() || !missing.is_empty() {
                            warn!(
                                period_id = %period.id,
                                incomplete_steps = remaining.len(),
                                missing_approvals = missing.len(),
                                "Validating closure period with open items"
                            );
                        }
                    }
                }

                period.status = PeriodStatus::Closed;
                period.validated_at = Some(Utc::now());
                Ok(period.clone())
            })
            .ok_or(ClosureError::PeriodNotFound(period_id))??;

        info!(%period_id, "Closure period validated");
        Ok(period)
    }

    fn ensure_open(period: &ClosurePeriod) -> Result<(), ClosureError> {
        if period.status.is_closed() {
            Err(ClosureError::PeriodClosed(period.id))
        } else {
            Ok(())
        }
    }

    fn step_index(period: &ClosurePeriod, step_id: ClosureStepId) -> Result<usize, ClosureError> {
        period
            .steps
            .iter()
            .position(|s| s.id == step_id)
            .ok_or(ClosureError::StepNotFound(step_id))
    }

    fn start_step(
        period: &mut ClosurePeriod,
        step_id: ClosureStepId,
        policy: ClosurePolicy,
    ) -> Result<(), ClosureError> {
        Self::ensure_open(period)?;
        let idx = Self::step_index(period, step_id)?;
        let step = &period.steps[idx];

        if !step.status.can_transition_to(StepStatus::InProgress) {
            return Err(ClosureError::InvalidTransition {
                from: step.status,
                to: StepStatus::InProgress,
            });
        }

        let pending = period.unmet_dependencies(step);
        if !pending.is_empty() {
            match policy {
                ClosurePolicy::Strict => {
                    return Err(ClosureError::UnmetDependencies {
                        step: step_id,
                        pending,
                    });
                }
                ClosurePolicy::Lenient => warn!(
                    %step_id,
                    unmet = pending.len(),
                    "Starting closure step with unmet dependencies"
                ),
            }
        }

        period.steps[idx].status = StepStatus::InProgress;
        Self::refresh_period_status(period);
        Ok(())
    }

    fn finish_step(
        period: &mut ClosurePeriod,
        step_id: ClosureStepId,
        evaluator: &dyn ControlEvaluator,
        started_at: DateTime<Utc>,
    ) -> Result<StepExecution, ClosureError> {
        Self::ensure_open(period)?;
        let idx = Self::step_index(period, step_id)?;
        let current = period.steps[idx].status;
        if current != StepStatus::InProgress {
            return Err(ClosureError::StepChanged {
                step: step_id,
                status: current,
            });
        }
        let snapshot = period.steps[idx].clone();

        let mut passed = 0;
        let mut failed = 0;
        let mut corrected = 0;
        let mut blocking: Option<ControlSeverity> = None;

        for control in &mut period.steps[idx].controls {
            match evaluator.evaluate(&snapshot, control) {
                ControlStatus::Failed if control.auto_correctable => {
                    control.status = ControlStatus::Passed;
                    corrected += 1;
                    passed += 1;
                }
                ControlStatus::Failed => {
                    control.status = ControlStatus::Failed;
                    failed += 1;
                    if control.severity > ControlSeverity::Info {
                        blocking = blocking.max(Some(control.severity));
                    }
                }
                ControlStatus::Passed => {
                    control.status = ControlStatus::Passed;
                    passed += 1;
                }
                ControlStatus::Pending => control.status = ControlStatus::Pending,
            }
        }

        let status = match blocking {
            Some(ControlSeverity::Critical) => StepStatus::Error,
            Some(_) => StepStatus::RequiresApproval,
            None => StepStatus::Completed,
        };
        period.steps[idx].status = status;
        period.compliance_score = compliance_score(&period.steps);
        Self::refresh_period_status(period);

        Ok(StepExecution {
            step_id,
            status,
            controls_passed: passed,
            controls_failed: failed,
            controls_corrected: corrected,
            started_at,
            finished_at: Utc::now(),
        })
    }

    fn refresh_period_status(period: &mut ClosurePeriod) {
        if period.status.is_closed() {
            return;
        }
        let started = period.steps.iter().any(|s| s.status != StepStatus::Pending);
        period.status = if !period.steps.is_empty() && period.incomplete_mandatory_steps().is_empty() {
            PeriodStatus::PendingApproval
        } else if started {
            PeriodStatus::InProgress
        } else {
            PeriodStatus::Open
        };
    }
}
