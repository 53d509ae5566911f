//! Progress and compliance figures for a closure checklist.

use super::types::{ClosureStep, ControlStatus, StepCategory};

/// `round(100 * done / total)` with halves rounded up, `0` when `total` is 0.
#[must_use]
pub fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = done.min(total);
    u8::try_from((200 * done + total) / (2 * total)).unwrap_or(100)
}

/// Share of completed steps in one phase.
#[must_use]
pub fn phase_progress(steps: &[ClosureStep], category: StepCategory) -> u8 {
    let in_phase = steps.iter().filter(|s| s.category == category);
    let (done, total) = in_phase.fold((0, 0), |(done, total), s| {
        (done + usize::from(s.status.is_completed()), total + 1)
    });
    percent(done, total)
}

/// Share of completed steps among mandatory steps.
#[must_use]
pub fn global_progress(steps: &[ClosureStep]) -> u8 {
    let mandatory = steps.iter().filter(|s| s.mandatory);
    let (done, total) = mandatory.fold((0, 0), |(done, total), s| {
        (done + usize::from(s.status.is_completed()), total + 1)
    });
    percent(done, total)
}

/// Progress of every phase that has at least one step, in closing order.
#[must_use]
pub fn progress_by_phase(steps: &[ClosureStep]) -> Vec<(StepCategory, u8)> {
    StepCategory::ALL
        .into_iter()
        .filter(|c| steps.iter().any(|s| s.category == *c))
        .map(|c| (c, phase_progress(steps, c)))
        .collect()
}

/// Share of passed controls across the checklist, `0` without controls.
#[must_use]
pub fn compliance_score(steps: &[ClosureStep]) -> u8 {
    let controls = steps.iter().flat_map(|s| s.controls.iter());
    let (passed, total) = controls.fold((0, 0), |(passed, total), c| {
        (passed + usize::from(c.status == ControlStatus::Passed), total + 1)
    });
    percent(passed, total)
}
