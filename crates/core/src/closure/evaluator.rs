//! Control evaluation seam.

use super::types::{ClosureControl, ClosureStep, ControlStatus};

/// Decides the outcome of a control when its step executes.
pub trait ControlEvaluator: Send + Sync {
    /// Evaluates one control of `step`.
    fn evaluate(&self, step: &ClosureStep, control: &ClosureControl) -> ControlStatus;
}

/// Evaluator that passes every control.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysPass;

impl ControlEvaluator for AlwaysPass {
    fn evaluate(&self, _step: &ClosureStep, _control: &ClosureControl) -> ControlStatus {
        ControlStatus::Passed
    }
}

impl<F> ControlEvaluator for F
where
    F: Fn(&ClosureStep, &ClosureControl) -> ControlStatus + Send + Sync,
{
    fn evaluate(&self, step: &ClosureStep, control: &ClosureControl) -> ControlStatus {
        self(step, control)
    }
}
