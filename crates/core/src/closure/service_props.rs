//! Property-based tests for the closure checklist.

use chrono::NaiveDate;
use ohada_shared::{ClosurePolicy, ClosureSettings};
use proptest::prelude::*;

use super::error::ClosureError;
use super::progress::{compliance_score, global_progress, percent};
use super::service::ClosureService;
use super::types::{
    ClosureControl, ClosureKind, ClosureStep, ControlSeverity, ControlType, OpenPeriodInput,
    PeriodStatus, StepCategory, StepStatus,
};

fn arb_status() -> impl Strategy<Value = StepStatus> {
    prop_oneof![
        Just(StepStatus::Pending),
        Just(StepStatus::InProgress),
        Just(StepStatus::Completed),
        Just(StepStatus::Error),
        Just(StepStatus::RequiresApproval),
    ]
}

fn service() -> ClosureService {
    ClosureService::new(ClosureSettings {
        step_delay_ms: 0,
        policy: ClosurePolicy::Lenient,
    })
}

fn input(steps: Vec<ClosureStep>) -> OpenPeriodInput {
    OpenPeriodInput {
        name: "Clôture mensuelle".to_string(),
        kind: ClosureKind::Monthly,
        start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        steps,
        required_approvals: Vec::new(),
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Percentages stay in 0..=100 and grow with `done`.
    #[test]
    fn prop_percent_bounded_and_monotonic(total in 1usize..500, a in 0usize..500, b in 0usize..500) {
        let (lo, hi) = (a.min(b).min(total), a.max(b).min(total));
        prop_assert!(percent(hi, total) <= 100);
        prop_assert!(percent(lo, total) <= percent(hi, total));
        prop_assert_eq!(percent(total, total), 100);
        prop_assert_eq!(percent(0, total), 0);
    }

    /// A manual transition is applied exactly when the state machine allows it;
    /// a rejected one leaves the step untouched.
    #[test]
    fn prop_manual_transitions_follow_state_machine(targets in prop::collection::vec(arb_status(), 1..20)) {
        let service = service();
        let step = ClosureStep::new("Rapprochement bancaire", StepCategory::Controls, 1);
        let step_id = step.id;
        let period = service.open_period(input(vec![step])).unwrap();

        let mut current = StepStatus::Pending;
        for target in targets {
            let result = service.set_step_status(period.id, step_id, target);
            if current.can_transition_to(target) {
                prop_assert_eq!(result.unwrap().status, target);
                current = target;
            } else {
                let is_invalid = matches!(result, Err(ClosureError::InvalidTransition { .. }));
                prop_assert!(is_invalid);
            }
            let stored = service.list_steps(period.id).unwrap();
            prop_assert_eq!(stored[0].status, current);
        }
    }

    /// Running every step with passing controls completes the checklist.
    #[test]
    fn prop_executing_all_steps_completes_checklist(
        controls in prop::collection::vec(0usize..4, 1..8),
    ) {
        let steps: Vec<ClosureStep> = controls
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let order = u32::try_from(i).unwrap() + 1;
                (0..*n).fold(
                    ClosureStep::new(format!("Étape {order}"), StepCategory::Adjustments, order),
                    |step, c| step.with_control(ClosureControl::new(
                        format!("Contrôle {c}"),
                        ControlType::Balance,
                        ControlSeverity::Warning,
                    )),
                )
            })
            .collect();
        let ids: Vec<_> = steps.iter().map(|s| s.id).collect();

        let service = service();
        let period = service.open_period(input(steps)).unwrap();

        runtime().block_on(async {
            for id in &ids {
                service.execute_step(period.id, *id).await.unwrap();
            }
        });

        let period = service.period(period.id).unwrap();
        prop_assert_eq!(period.status, PeriodStatus::PendingApproval);
        prop_assert_eq!(global_progress(&period.steps), 100);
        let has_controls = controls.iter().any(|n| *n > 0);
        prop_assert_eq!(compliance_score(&period.steps), if has_controls { 100 } else { 0 });
    }
}
