//! Integration tests for the periodic heartbeat recorder, driven by the
//! paused tokio clock so no real time passes.

mod helpers;

use helpers::manual_clock::ManualClock;
use helpers::mock_store::MockHeartbeatStore;
use helpers::reference_time;
use homebeat::recorder::HeartbeatRecorder;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

const INTERVAL: Duration = Duration::from_secs(60);

#[tokio::test(start_paused = true)]
async fn recorder_writes_once_per_interval_with_increasing_timestamps() {
    let store = Arc::new(MockHeartbeatStore::empty());
    let clock = Arc::new(ManualClock::new(reference_time()));
    let recorder = HeartbeatRecorder::new(store.clone(), clock.clone(), INTERVAL);

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let handle = tokio::spawn(recorder.run(shutdown_rx));

    // Let the task start and consume the interval's immediate first tick.
    tokio::task::yield_now().await;

    let elapsed_intervals = 3;
    for _ in 0..elapsed_intervals {
        clock.advance(chrono::Duration::seconds(60));
        tokio::time::sleep(INTERVAL).await;
        // Yield so the recorder processes this tick before the next advance.
        tokio::task::yield_now().await;
    }
    // Let the recorder drain the final tick before the shutdown signal wins
    // its biased select.
    tokio::task::yield_now().await;

    shutdown_tx.send(()).unwrap();
    handle.await.unwrap();

    let writes = store.writes();
    assert!(
        writes.len() >= elapsed_intervals,
        "expected at least {} writes over {} intervals, got {}",
        elapsed_intervals,
        elapsed_intervals,
        writes.len()
    );
    for pair in writes.windows(2) {
        assert!(
            pair[1] > pair[0],
            "each write must strictly increase the stored timestamp"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn failed_write_does_not_stop_the_schedule() {
    let store = Arc::new(MockHeartbeatStore::empty());
    store.fail_writes(true);
    let clock = Arc::new(ManualClock::new(reference_time()));
    let recorder = HeartbeatRecorder::new(store.clone(), clock.clone(), INTERVAL);

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let handle = tokio::spawn(recorder.run(shutdown_rx));
    tokio::task::yield_now().await;

    // First tick fails, the loop must carry on.
    clock.advance(chrono::Duration::seconds(60));
    tokio::time::sleep(INTERVAL).await;
    // Yield so the recorder processes the failing tick before the flag flips.
    tokio::task::yield_now().await;
    assert!(store.writes().is_empty());

    // Next scheduled tick is the retry.
    store.fail_writes(false);
    clock.advance(chrono::Duration::seconds(60));
    tokio::time::sleep(INTERVAL).await;
    tokio::task::yield_now().await;

    shutdown_tx.send(()).unwrap();
    handle.await.unwrap();

    assert_eq!(
        store.writes().len(),
        1,
        "the tick after a failed write must succeed"
    );
}

#[tokio::test(start_paused = true)]
async fn recorder_stops_on_shutdown_signal() {
    let store = Arc::new(MockHeartbeatStore::empty());
    let clock = Arc::new(ManualClock::new(reference_time()));
    let recorder = HeartbeatRecorder::new(store.clone(), clock, INTERVAL);

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let handle = tokio::spawn(recorder.run(shutdown_rx));
    tokio::task::yield_now().await;

    shutdown_tx.send(()).unwrap();
    handle.await.unwrap();

    assert!(
        store.writes().is_empty(),
        "no tick elapsed before shutdown, so no write should have happened"
    );
}
