//! BDD step definitions for the monitor lifecycle feature

use std::time::Duration;

use cucumber::{then, when};
use tokio_util::sync::CancellationToken;

use streamwatch::notifier::Notification;
use streamwatch::StreamwatchError;

use crate::world::StreamwatchWorld;

#[when("the monitor runs")]
async fn monitor_runs(world: &mut StreamwatchWorld) {
    let result = world.engine_mut().run().await;
    world.run_result = Some(result);
}

#[when("the monitor runs until stopped")]
async fn monitor_runs_until_stopped(world: &mut StreamwatchWorld) {
    let cancel = CancellationToken::new();
    let mut engine = world.new_engine(cancel.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
    });

    let result = tokio::time::timeout(Duration::from_secs(5), engine.run())
        .await
        .expect("engine did not stop after cancellation");
    canceller.await.expect("canceller task panicked");

    world.run_result = Some(result);
    world.engine = Some(engine);
}

#[then("the run fails with a configuration error")]
fn run_fails_with_config_error(world: &mut StreamwatchWorld) {
    let result = world.run_result.as_ref().expect("monitor did not run");
    assert!(
        matches!(result, Err(StreamwatchError::Config(_))),
        "Expected configuration error, got {:?}",
        result
    );
}

#[then("the run ends cleanly")]
fn run_ends_cleanly(world: &mut StreamwatchWorld) {
    let result = world.run_result.as_ref().expect("monitor did not run");
    assert!(result.is_ok(), "Expected clean shutdown, got {:?}", result);
}

#[then("status was never fetched")]
async fn never_fetched(world: &mut StreamwatchWorld) {
    assert_eq!(world.fetcher.call_count().await, 0);
}

#[then(expr = "status was fetched at least {int} times")]
async fn fetched_at_least(world: &mut StreamwatchWorld, expected: u32) {
    let calls = world.fetcher.call_count().await;
    assert!(calls >= expected, "Expected at least {} fetches, got {}", expected, calls);
}

#[then("the first notification is the startup notification")]
async fn first_is_startup(world: &mut StreamwatchWorld) {
    let sent = world.notifier.sent().await;
    assert_eq!(sent.first(), Some(&Notification::startup()));
}
