//! Closure workflow domain types.
//!
//! A closure period (monthly, quarterly or annual) is a checklist of steps.
//! Each step carries controls; statuses are closed enums with the same
//! wire strings the closing screens use.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use ohada_shared::types::{ClosurePeriodId, ClosureStepId, ControlId};
use serde::{Deserialize, Serialize};

/// Status of a closure step.
///
/// Valid transitions:
/// - Pending → InProgress
/// - InProgress → Completed | Error | RequiresApproval
/// - RequiresApproval → Completed | Error
/// - Error → InProgress (retry)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Not started.
    #[default]
    Pending,
    /// Running or being worked on.
    InProgress,
    /// Done.
    Completed,
    /// A blocking control failed.
    Error,
    /// Waiting for a reviewer's sign-off.
    RequiresApproval,
}

impl StepStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::RequiresApproval => "requires_approval",
        }
    }

    /// Parses a status, accepting the French labels of the annual closing
    /// checklist (`en_attente`, `en_cours`, `complete`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" | "en_attente" => Some(Self::Pending),
            "in_progress" | "en_cours" => Some(Self::InProgress),
            "completed" | "complete" | "termine" => Some(Self::Completed),
            "error" | "erreur" => Some(Self::Error),
            "requires_approval" | "validation_requise" => Some(Self::RequiresApproval),
            _ => None,
        }
    }

    /// Returns true if the step counts as done for progress figures.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Check if a status transition is valid.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending | Self::Error, Self::InProgress)
                | (
                    Self::InProgress,
                    Self::Completed | Self::Error | Self::RequiresApproval
                )
                | (Self::RequiresApproval, Self::Completed | Self::Error)
        )
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlStatus {
    /// Not evaluated yet.
    #[default]
    Pending,
    /// Check succeeded.
    Passed,
    /// Check failed.
    Failed,
}

/// How much a failed control matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlSeverity {
    /// Informational; never blocks.
    Info,
    /// Needs a reviewer's sign-off.
    Warning,
    /// Blocks the step.
    Critical,
}

/// Kind of check a control performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    /// Debit/credit equilibrium.
    Balance,
    /// Bank or third-party reconciliation.
    Reconciliation,
    /// All expected entries are present.
    Completeness,
    /// Conformity with SYSCOHADA rules.
    Compliance,
}

/// A leaf check attached to a closure step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosureControl {
    /// Unique identifier.
    #[serde(default)]
    pub id: ControlId,
    /// Control name.
    pub name: String,
    /// Control kind.
    #[serde(rename = "type")]
    pub control_type: ControlType,
    /// Current outcome.
    #[serde(default)]
    pub status: ControlStatus,
    /// Severity when failed.
    pub severity: ControlSeverity,
    /// Whether a failure can be corrected automatically.
    #[serde(default)]
    pub auto_correctable: bool,
}

impl ClosureControl {
    /// Creates a pending control.
    #[must_use]
    pub fn new(name: impl Into<String>, control_type: ControlType, severity: ControlSeverity) -> Self {
        Self {
            id: ControlId::new(),
            name: name.into(),
            control_type,
            status: ControlStatus::Pending,
            severity,
            auto_correctable: false,
        }
    }

    /// Marks the control as auto-correctable.
    #[must_use]
    pub fn auto_correctable(mut self) -> Self {
        self.auto_correctable = true;
        self
    }
}

/// Phase of the closing a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepCategory {
    /// Cut-off and preparatory work.
    Preparation,
    /// Physical inventory and valuation.
    Inventory,
    /// Accruals, depreciation, provisions.
    Adjustments,
    /// Reconciliations and consistency checks.
    Controls,
    /// Financial statements (bilan, compte de résultat, TAFIRE/notes).
    Statements,
    /// Sign-off and archiving.
    Validation,
}

impl StepCategory {
    /// All categories in closing order.
    pub const ALL: [Self; 6] = [
        Self::Preparation,
        Self::Inventory,
        Self::Adjustments,
        Self::Controls,
        Self::Statements,
        Self::Validation,
    ];
}

/// A step of a closure checklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosureStep {
    /// Unique identifier.
    #[serde(default)]
    pub id: ClosureStepId,
    /// Step name.
    pub name: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Current status.
    #[serde(default)]
    pub status: StepStatus,
    /// Position in the checklist.
    pub order: u32,
    /// Whether the step counts toward global progress and validation.
    #[serde(default = "mandatory_by_default")]
    pub mandatory: bool,
    /// Phase.
    pub category: StepCategory,
    /// Steps expected to be completed first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<ClosureStepId>,
    /// Checks run when the step executes.
    #[serde(default)]
    pub controls: Vec<ClosureControl>,
    /// SYSCOHADA article or chapter reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syscohada_reference: Option<String>,
}

fn mandatory_by_default() -> bool {
    true
}

impl ClosureStep {
    /// Creates a pending, mandatory step.
    #[must_use]
    pub fn new(name: impl Into<String>, category: StepCategory, order: u32) -> Self {
        Self {
            id: ClosureStepId::new(),
            name: name.into(),
            description: String::new(),
            status: StepStatus::Pending,
            order,
            mandatory: true,
            category,
            dependencies: Vec::new(),
            controls: Vec::new(),
            syscohada_reference: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the step optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.mandatory = false;
        self
    }

    /// Adds a dependency.
    #[must_use]
    pub fn depends_on(mut self, step: ClosureStepId) -> Self {
        self.dependencies.push(step);
        self
    }

    /// Adds a control.
    #[must_use]
    pub fn with_control(mut self, control: ClosureControl) -> Self {
        self.controls.push(control);
        self
    }

    /// Sets the SYSCOHADA reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.syscohada_reference = Some(reference.into());
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }
}

/// Closure frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosureKind {
    /// Month-end closing.
    Monthly,
    /// Quarter-end closing.
    Quarterly,
    /// Year-end closing (clôture annuelle).
    Annual,
}

/// Status of a closure period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// No step started.
    Open,
    /// Work under way.
    InProgress,
    /// All mandatory steps completed, waiting for approvals.
    PendingApproval,
    /// Validated; no further changes.
    Closed,
}

impl PeriodStatus {
    /// Returns true if the period no longer accepts changes.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// A document produced during the closing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosureDocument {
    /// Document name.
    pub name: String,
    /// When it was attached.
    pub attached_at: DateTime<Utc>,
}

/// A closure period and its checklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosurePeriod {
    /// Unique identifier.
    pub id: ClosurePeriodId,
    /// Display name (e.g. "Clôture 2025").
    pub name: String,
    /// Frequency.
    pub kind: ClosureKind,
    /// First day covered.
    pub start: NaiveDate,
    /// Last day covered.
    pub end: NaiveDate,
    /// Period status.
    pub status: PeriodStatus,
    /// Checklist.
    pub steps: Vec<ClosureStep>,
    /// Approver names expected before validation.
    pub required_approvals: Vec<String>,
    /// Approver names received so far.
    pub received_approvals: Vec<String>,
    /// Percentage of passed controls.
    pub compliance_score: u8,
    /// Attached documents.
    pub documents: Vec<ClosureDocument>,
    /// When the period was validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<DateTime<Utc>>,
}

impl ClosurePeriod {
    /// Finds a step by id.
    #[must_use]
    pub fn step(&self, id: ClosureStepId) -> Option<&ClosureStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Required approvals not yet received.
    #[must_use]
    pub fn missing_approvals(&self) -> Vec<String> {
        self.required_approvals
            .iter()
            .filter(|name| !self.received_approvals.contains(name))
            .cloned()
            .collect()
    }

    /// Mandatory steps not completed.
    #[must_use]
    pub fn incomplete_mandatory_steps(&self) -> Vec<ClosureStepId> {
        self.steps
            .iter()
            .filter(|s| s.mandatory && !s.status.is_completed())
            .map(|s| s.id)
            .collect()
    }

    /// Dependencies of `step` that are not completed.
    #[must_use]
    pub fn unmet_dependencies(&self, step: &ClosureStep) -> Vec<ClosureStepId> {
        step.dependencies
            .iter()
            .filter(|dep| {
                self.step(**dep)
                    .is_none_or(|s| !s.status.is_completed())
            })
            .copied()
            .collect()
    }
}

/// Input for opening a closure period.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenPeriodInput {
    /// Display name.
    pub name: String,
    /// Frequency.
    pub kind: ClosureKind,
    /// First day covered.
    pub start: NaiveDate,
    /// Last day covered.
    pub end: NaiveDate,
    /// Checklist.
    pub steps: Vec<ClosureStep>,
    /// Approver names expected before validation.
    #[serde(default)]
    pub required_approvals: Vec<String>,
}

/// Result of executing a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepExecution {
    /// Executed step.
    pub step_id: ClosureStepId,
    /// Status after execution.
    pub status: StepStatus,
    /// Controls that passed (auto-corrections included).
    pub controls_passed: usize,
    /// Controls that failed.
    pub controls_failed: usize,
    /// Failed controls fixed automatically.
    pub controls_corrected: usize,
    /// Execution start.
    pub started_at: DateTime<Utc>,
    /// Execution end.
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(StepStatus::Pending.as_str(), "pending");
        assert_eq!(StepStatus::InProgress.as_str(), "in_progress");
        assert_eq!(StepStatus::Completed.as_str(), "completed");
        assert_eq!(StepStatus::Error.as_str(), "error");
        assert_eq!(StepStatus::RequiresApproval.as_str(), "requires_approval");
    }

    #[test]
    fn test_status_parse_french_labels() {
        assert_eq!(StepStatus::parse("en_attente"), Some(StepStatus::Pending));
        assert_eq!(StepStatus::parse("EN_COURS"), Some(StepStatus::InProgress));
        assert_eq!(StepStatus::parse("complete"), Some(StepStatus::Completed));
        assert_eq!(StepStatus::parse("in_progress"), Some(StepStatus::InProgress));
        assert_eq!(StepStatus::parse("unknown"), None);
    }

    #[test]
    fn test_status_serde_matches_as_str() {
        let json = serde_json::to_string(&StepStatus::RequiresApproval).unwrap();
        assert_eq!(json, "\"requires_approval\"");
    }

    #[test]
    fn test_transitions() {
        assert!(StepStatus::Pending.can_transition_to(StepStatus::InProgress));
        assert!(StepStatus::InProgress.can_transition_to(StepStatus::Completed));
        assert!(StepStatus::Error.can_transition_to(StepStatus::InProgress));
        assert!(StepStatus::RequiresApproval.can_transition_to(StepStatus::Completed));

        assert!(!StepStatus::Pending.can_transition_to(StepStatus::Completed));
        assert!(!StepStatus::Completed.can_transition_to(StepStatus::InProgress));
        assert!(!StepStatus::Completed.can_transition_to(StepStatus::Pending));
    }

    #[test]
    fn test_missing_approvals_and_unmet_dependencies() {
        let first = ClosureStep::new("Inventaire", StepCategory::Inventory, 1);
        let second = ClosureStep::new("Amortissements", StepCategory::Adjustments, 2)
            .depends_on(first.id);
        let period = ClosurePeriod {
            id: ClosurePeriodId::new(),
            name: "Clôture 2025".to_string(),
            kind: ClosureKind::Annual,
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            status: PeriodStatus::Open,
            steps: vec![first.clone(), second.clone()],
            required_approvals: vec!["DAF".to_string(), "CAC".to_string()],
            received_approvals: vec!["DAF".to_string()],
            compliance_score: 0,
            documents: vec![],
            validated_at: None,
        };

        assert_eq!(period.missing_approvals(), vec!["CAC".to_string()]);
        assert_eq!(period.unmet_dependencies(&second), vec![first.id]);
        assert!(period.unmet_dependencies(&first).is_empty());
        assert_eq!(period.incomplete_mandatory_steps().len(), 2);
    }

    #[test]
    fn test_minimal_period_input_json() {
        let json = r#"{
            "name": "Clôture mars 2025",
            "kind": "monthly",
            "start": "2025-03-01",
            "end": "2025-03-31",
            "steps": [
                {
                    "name": "Rapprochement bancaire",
                    "order": 1,
                    "category": "controls",
                    "controls": [
                        { "name": "Solde 521", "type": "reconciliation", "severity": "critical" }
                    ]
                }
            ]
        }"#;
        let input: OpenPeriodInput = serde_json::from_str(json).unwrap();
        let step = &input.steps[0];
        assert_eq!(step.status, StepStatus::Pending);
        assert!(step.mandatory);
        assert_eq!(step.controls[0].status, ControlStatus::Pending);
        assert!(!step.controls[0].auto_correctable);
        assert!(input.required_approvals.is_empty());
    }
}
