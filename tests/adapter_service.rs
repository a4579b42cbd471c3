//! Integration tests for the adapter task: spawn `adapter_loop` over real
//! channels and drive it with tokio's paused clock, so repeat cadence can be
//! asserted in exact virtual milliseconds.

use std::time::Duration;
use tetropad::adapter::{adapter_loop, AdapterCommand};
use tetropad::keys::{ControlButton, KeyBindings, KeySignal, RepeatSettings, SignalKind, SourceId};
use tokio::sync::mpsc;
use tokio::time::{timeout, Instant};

const TIMEOUT_MS: u64 = 2_000;

fn spawn_adapter() -> (
    mpsc::UnboundedSender<AdapterCommand>,
    mpsc::UnboundedReceiver<KeySignal>,
    tokio::task::JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (sig_tx, sig_rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(adapter_loop(
        cmd_rx,
        sig_tx,
        KeyBindings::standard(),
        RepeatSettings::default(),
    ));

    (cmd_tx, sig_rx, task)
}

fn press(button: ControlButton, source: u32) -> AdapterCommand {
    AdapterCommand::Press {
        button,
        source: SourceId(source),
    }
}

fn release(button: ControlButton, source: u32) -> AdapterCommand {
    AdapterCommand::Release {
        button,
        source: SourceId(source),
    }
}

async fn next_signal(rx: &mut mpsc::UnboundedReceiver<KeySignal>) -> KeySignal {
    timeout(Duration::from_millis(TIMEOUT_MS), rx.recv())
        .await
        .expect("adapter signal timed out")
        .expect("adapter channel closed unexpectedly")
}

/// Let virtual time run; nothing may arrive.
async fn expect_silence(rx: &mut mpsc::UnboundedReceiver<KeySignal>, window: Duration) {
    if let Ok(signal) = timeout(window, rx.recv()).await {
        panic!("expected silence, got {signal:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn press_emits_immediate_keydown() {
    let (cmd, mut signals, _task) = spawn_adapter();
    let t0 = Instant::now();

    cmd.send(press(ControlButton::Left, 1)).unwrap();

    let signal = next_signal(&mut signals).await;
    assert_eq!(signal.kind, SignalKind::KeyDown);
    assert_eq!(signal.key, "ArrowLeft");
    assert_eq!(signal.key_code, 37);
    assert!(signal.bubbles && signal.cancelable);
    assert!(t0.elapsed() < Duration::from_millis(1));
}

#[tokio::test(start_paused = true)]
async fn horizontal_hold_repeats_on_cadence() {
    let (cmd, mut signals, _task) = spawn_adapter();
    let t0 = Instant::now();

    cmd.send(press(ControlButton::Left, 7)).unwrap();
    assert!(next_signal(&mut signals).await.is_down());

    // 200ms initial delay, then 100ms cadence: repeats at 300, 400, 500.
    for expected_ms in [300u64, 400, 500] {
        let signal = next_signal(&mut signals).await;
        assert!(signal.is_down());
        assert_eq!(signal.key, "ArrowLeft");
        let elapsed = t0.elapsed();
        assert!(
            elapsed >= Duration::from_millis(expected_ms)
                && elapsed < Duration::from_millis(expected_ms + 5),
            "repeat arrived at {elapsed:?}, expected ~{expected_ms}ms"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn soft_drop_repeats_faster_than_horizontal() {
    let (cmd, mut signals, _task) = spawn_adapter();
    let t0 = Instant::now();

    cmd.send(press(ControlButton::Down, 1)).unwrap();
    assert!(next_signal(&mut signals).await.is_down());

    // Held past initial_delay + 3 periods: at least four key-downs total.
    let mut repeat_times = Vec::new();
    for _ in 0..3 {
        let signal = next_signal(&mut signals).await;
        assert_eq!(signal.key, "ArrowDown");
        repeat_times.push(t0.elapsed());
    }

    // 200ms delay then 50ms cadence: 250, 300, 350.
    for (i, expected_ms) in [250u64, 300, 350].iter().enumerate() {
        assert!(
            repeat_times[i] >= Duration::from_millis(*expected_ms)
                && repeat_times[i] < Duration::from_millis(expected_ms + 5),
            "soft drop repeat {i} at {:?}, expected ~{expected_ms}ms",
            repeat_times[i]
        );
    }
}

#[tokio::test(start_paused = true)]
async fn up_and_rotate_never_repeat() {
    let (cmd, mut signals, _task) = spawn_adapter();

    cmd.send(press(ControlButton::Up, 1)).unwrap();
    cmd.send(press(ControlButton::Rotate, 2)).unwrap();

    let first = next_signal(&mut signals).await;
    assert_eq!((first.kind, first.key_code), (SignalKind::KeyDown, 38));
    let second = next_signal(&mut signals).await;
    assert_eq!((second.kind, second.key_code), (SignalKind::KeyDown, 88));

    // A long hold produces nothing further.
    expect_silence(&mut signals, Duration::from_millis(1_000)).await;

    cmd.send(release(ControlButton::Up, 1)).unwrap();
    cmd.send(release(ControlButton::Rotate, 2)).unwrap();

    let up = next_signal(&mut signals).await;
    assert_eq!((up.kind, up.key_code), (SignalKind::KeyUp, 38));
    let rotate_up = next_signal(&mut signals).await;
    assert_eq!((rotate_up.kind, rotate_up.key_code), (SignalKind::KeyUp, 88));

    expect_silence(&mut signals, Duration::from_millis(500)).await;
}

#[tokio::test(start_paused = true)]
async fn duplicate_activation_produces_one_keydown() {
    let (cmd, mut signals, _task) = spawn_adapter();

    cmd.send(press(ControlButton::Rotate, 1)).unwrap();
    assert!(next_signal(&mut signals).await.is_down());

    // Second source on the same button: absorbed, owner stays source 1.
    cmd.send(press(ControlButton::Rotate, 2)).unwrap();
    cmd.send(release(ControlButton::Rotate, 2)).unwrap();
    expect_silence(&mut signals, Duration::from_millis(500)).await;

    cmd.send(release(ControlButton::Rotate, 1)).unwrap();
    let signal = next_signal(&mut signals).await;
    assert_eq!(signal.kind, SignalKind::KeyUp);
}

#[tokio::test(start_paused = true)]
async fn release_from_wrong_source_is_ignored() {
    let (cmd, mut signals, _task) = spawn_adapter();

    cmd.send(press(ControlButton::Left, 1)).unwrap();
    assert!(next_signal(&mut signals).await.is_down());

    // Wrong source, then the owner: exactly one key-up results.
    cmd.send(release(ControlButton::Left, 2)).unwrap();
    cmd.send(release(ControlButton::Left, 1)).unwrap();

    let signal = next_signal(&mut signals).await;
    assert_eq!((signal.kind, signal.key), (SignalKind::KeyUp, "ArrowLeft"));
    expect_silence(&mut signals, Duration::from_millis(1_000)).await;
}

#[tokio::test(start_paused = true)]
async fn hold_left_release_at_350ms_scenario() {
    let (cmd, mut signals, _task) = spawn_adapter();
    let t0 = Instant::now();

    // t=0: press left with source 7 -> immediate ArrowLeft down.
    cmd.send(press(ControlButton::Left, 7)).unwrap();
    let down = next_signal(&mut signals).await;
    assert_eq!((down.kind, down.key), (SignalKind::KeyDown, "ArrowLeft"));

    // First (and only) repeat at t=300.
    let repeat = next_signal(&mut signals).await;
    assert!(repeat.is_down());
    assert!(t0.elapsed() >= Duration::from_millis(300));

    // t=350: release -> key-up, and the t=400 repeat never fires.
    tokio::time::advance(Duration::from_millis(50)).await;
    cmd.send(release(ControlButton::Left, 7)).unwrap();

    let up = next_signal(&mut signals).await;
    assert_eq!((up.kind, up.key), (SignalKind::KeyUp, "ArrowLeft"));
    expect_silence(&mut signals, Duration::from_millis(1_000)).await;
}

#[tokio::test(start_paused = true)]
async fn teardown_mid_hold_emits_nothing_further() {
    let (cmd, mut signals, task) = spawn_adapter();

    cmd.send(press(ControlButton::Left, 1)).unwrap();
    cmd.send(press(ControlButton::Down, 2)).unwrap();
    cmd.send(AdapterCommand::Teardown).unwrap();

    task.await.unwrap();

    // Only the two activation key-downs were ever sent; the channel then
    // closed with no key-ups and no repeats.
    let mut drained = Vec::new();
    while let Some(signal) = signals.recv().await {
        drained.push(signal);
    }
    assert_eq!(
        drained,
        vec![KeySignal::down(37), KeySignal::down(40)],
        "teardown must not emit releases or repeats"
    );
}

#[tokio::test(start_paused = true)]
async fn every_press_pairs_with_exactly_one_release() {
    let (cmd, mut signals, task) = spawn_adapter();

    let mut signals_seen = Vec::new();

    // Interleaved presses and releases across buttons and sources, with a
    // hold long enough for left to repeat in between.
    cmd.send(press(ControlButton::Left, 1)).unwrap();
    cmd.send(press(ControlButton::Rotate, 2)).unwrap();
    signals_seen.push(next_signal(&mut signals).await);
    signals_seen.push(next_signal(&mut signals).await);

    // One repeat from left at t=300.
    signals_seen.push(next_signal(&mut signals).await);
    assert!(signals_seen.iter().all(KeySignal::is_down));

    cmd.send(release(ControlButton::Left, 1)).unwrap();
    cmd.send(release(ControlButton::Rotate, 2)).unwrap();
    cmd.send(AdapterCommand::Teardown).unwrap();
    task.await.unwrap();

    while let Some(signal) = signals.recv().await {
        signals_seen.push(signal);
    }

    // Ignoring repeats, each key code saw exactly one down/up pair.
    for key_code in [37u16, 88] {
        let downs = signals_seen
            .iter()
            .filter(|s| s.key_code == key_code && s.is_down())
            .count();
        let ups = signals_seen
            .iter()
            .filter(|s| s.key_code == key_code && !s.is_down())
            .count();
        assert_eq!(ups, 1, "key {key_code} should see exactly one key-up");
        assert!(downs >= 1, "key {key_code} should see its activation down");
    }
}
