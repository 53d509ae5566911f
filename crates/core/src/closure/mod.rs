//! Period closure workflow.
//!
//! - `types` - Periods, steps, controls and their statuses
//! - `service` - Step execution, approvals and period validation
//! - `progress` - Phase and global progress, compliance score
//! - `evaluator` - Control evaluation seam
//! - `error` - Closure error types

pub mod error;
pub mod evaluator;
pub mod progress;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::ClosureError;
pub use evaluator::{AlwaysPass, ControlEvaluator};
pub use progress::{compliance_score, global_progress, percent, phase_progress, progress_by_phase};
pub use service::ClosureService;
pub use types::{
    ClosureControl, ClosureDocument, ClosureKind, ClosurePeriod, ClosureStep, ControlSeverity,
    ControlStatus, ControlType, OpenPeriodInput, PeriodStatus, StepCategory, StepExecution,
    StepStatus,
};
