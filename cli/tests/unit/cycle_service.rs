//! Decision-cycle scenarios run against the stateful `FakeHost`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use lightcycle_cli::application::ports::Stage;
use lightcycle_cli::application::services::{
    ActionExecutor, CycleMode, CycleReport, DaySignalProvider, DecisionCycle, InfrastructureProbe,
};
use lightcycle_cli::domain::{Action, DaySignal, ObservedState, SignalError, Strategy};

use crate::mocks::{FakeHost, FixedClock, ProblemReporter, SunStub, amsterdam, utc};

const MIDDAY: &str = "2024-06-21T10:00:00Z";
const LATE_EVENING: &str = "2024-06-21T21:30:00Z";
const PROVISION: &str = "cd /srv/ansible && ansible-playbook -i inventory.ini playbook.yml";

async fn cycle(
    sun: &SunStub,
    now: &str,
    host: &FakeHost,
    strategy: Strategy,
    reporter: &ProblemReporter,
) -> Result<CycleReport, SignalError> {
    let clock = FixedClock(utc(now));
    let vm = strategy.uses_vm().then_some(host);
    let cycle = DecisionCycle::new(
        DaySignalProvider::new(sun, &clock, reporter),
        InfrastructureProbe::new(vm, host, None, reporter),
        ActionExecutor::new(vm, host, Some(PROVISION), reporter),
        strategy,
        reporter,
    );
    cycle.run(&amsterdam(), CycleMode::Apply).await
}

#[tokio::test]
async fn workday_start_converges_in_one_cycle() {
    let host = FakeHost::new(false, false);
    let sun = SunStub::solstice();
    let reporter = ProblemReporter::default();

    let first = cycle(&sun, MIDDAY, &host, Strategy::Vm, &reporter).await.unwrap();
    assert_eq!(first.signal, DaySignal::Off);
    assert_eq!(first.plan.actions(), &[Action::BringUpVm, Action::Provision]);
    assert!(first.failure().is_none());
    assert_eq!(host.take_calls(), ["up", "provision"]);

    let second = cycle(&sun, MIDDAY, &host, Strategy::Vm, &reporter).await.unwrap();
    assert_eq!(second.observed, ObservedState::VmUpAppUp);
    assert!(second.plan.is_empty());
    assert!(host.take_calls().is_empty(), "second cycle must be a no-op");
    assert_eq!(sun.calls.get(), 2, "one fetch per cycle, no caching");
}

#[tokio::test]
async fn workday_end_halts_once() {
    let host = FakeHost::new(true, true);
    let sun = SunStub::solstice();
    let reporter = ProblemReporter::default();

    let first = cycle(&sun, LATE_EVENING, &host, Strategy::Vm, &reporter)
        .await
        .unwrap();
    assert_eq!(first.signal, DaySignal::On);
    assert_eq!(first.plan.actions(), &[Action::HaltVm]);

    let second = cycle(&sun, LATE_EVENING, &host, Strategy::Vm, &reporter)
        .await
        .unwrap();
    assert!(second.plan.is_empty());
    assert_eq!(host.take_calls(), ["halt"]);
}

#[tokio::test]
async fn vm_up_without_app_only_provisions() {
    let host = FakeHost::new(true, false);
    let reporter = ProblemReporter::default();
    let report = cycle(&SunStub::solstice(), MIDDAY, &host, Strategy::Vm, &reporter)
        .await
        .unwrap();
    assert_eq!(report.observed, ObservedState::VmUp);
    assert_eq!(report.plan.actions(), &[Action::Provision]);
    assert_eq!(host.take_calls(), ["provision"]);
}

#[tokio::test]
async fn http_500_changes_nothing() {
    let host = FakeHost::new(true, true);
    let sun = SunStub::with(Err(SignalError::Fetch("sun API answered HTTP 500".into())));
    let reporter = ProblemReporter::default();

    let err = cycle(&sun, LATE_EVENING, &host, Strategy::Vm, &reporter)
        .await
        .unwrap_err();
    assert!(matches!(err, SignalError::Fetch(_)));
    assert!(host.take_calls().is_empty());
    assert!(host.vm_running.get(), "no default signal may be assumed");
    assert!(
        reporter
            .problems
            .borrow()
            .iter()
            .any(|(stage, msg)| *stage == Stage::Fetch && msg.contains("500"))
    );
}

#[tokio::test]
async fn failed_bring_up_is_retried_by_next_cycle() {
    let host = FakeHost::new(false, false);
    host.fail_up.set(true);
    let sun = SunStub::solstice();
    let reporter = ProblemReporter::default();

    let first = cycle(&sun, MIDDAY, &host, Strategy::Vm, &reporter).await.unwrap();
    let failure = first.failure().expect("bring-up failed");
    assert_eq!(failure.action, Action::BringUpVm);
    assert_eq!(first.skipped(), &[Action::Provision]);
    assert_eq!(host.take_calls(), ["up"], "no retry inside a cycle");

    host.fail_up.set(false);
    let second = cycle(&sun, MIDDAY, &host, Strategy::Vm, &reporter).await.unwrap();
    assert_eq!(second.plan.actions(), &[Action::BringUpVm, Action::Provision]);
    assert!(second.failure().is_none());
    assert!(host.app_running.get());
}

#[tokio::test]
async fn container_strategy_starts_and_stops_app() {
    let host = FakeHost::new(false, false);
    let sun = SunStub::solstice();
    let reporter = ProblemReporter::default();

    let day = cycle(&sun, MIDDAY, &host, Strategy::Container, &reporter)
        .await
        .unwrap();
    assert_eq!(day.plan.actions(), &[Action::StartApp]);

    let again = cycle(&sun, MIDDAY, &host, Strategy::Container, &reporter)
        .await
        .unwrap();
    assert!(again.plan.is_empty());

    let night = cycle(&sun, LATE_EVENING, &host, Strategy::Container, &reporter)
        .await
        .unwrap();
    assert_eq!(night.plan.actions(), &[Action::StopApp]);
    assert_eq!(host.take_calls(), ["start", "stop"]);
    assert!(!host.vm_running.get(), "container strategy never touches the VM");
}

#[tokio::test]
async fn invalid_coordinates_fail_before_fetch() {
    let sun = SunStub::solstice();
    let clock = FixedClock(utc(MIDDAY));
    let reporter = ProblemReporter::default();
    let provider = DaySignalProvider::new(&sun, &clock, &reporter);

    let mut location = amsterdam();
    location.latitude = 91.0;
    let err = provider.compute(&location).await.unwrap_err();
    assert!(matches!(err, SignalError::Data(_)));
    assert_eq!(sun.calls.get(), 0);
}
