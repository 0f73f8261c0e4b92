use folio_terminal::{
    Cursor, Phase, PlaybackState, Script, TerminalFrame, TerminalTiming, TypewriterActor,
    TypewriterHandle, TypewriterMsg,
};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{sleep, Instant};

fn two_lines() -> Script {
    Script::new(["a", "bb"]).unwrap()
}

fn timing() -> TerminalTiming {
    TerminalTiming {
        tick: Duration::from_millis(80),
        reset_delay: Duration::from_millis(2000),
    }
}

async fn sleep_until_ms(start: Instant, ms: u64) {
    tokio::time::sleep_until(start + Duration::from_millis(ms)).await;
}

fn frame(handle: &TypewriterHandle) -> TerminalFrame {
    handle.frames.borrow().clone()
}

async fn toggle(handle: &TypewriterHandle) -> PlaybackState {
    let (tx, rx) = oneshot::channel();
    let sent = handle
        .addr
        .send(TypewriterMsg::TogglePlayback { reply: Some(tx) })
        .await;
    assert!(sent.is_ok(), "typewriter mailbox closed");
    rx.await.expect("toggle reply")
}

async fn shutdown(handle: TypewriterHandle) -> tokio::sync::watch::Receiver<TerminalFrame> {
    assert!(handle.addr.send(TypewriterMsg::Shutdown).await.is_ok());
    handle.task.await.unwrap().unwrap();
    handle.frames
}

#[tokio::test(start_paused = true)]
async fn types_the_script_then_loops_after_the_delay() {
    let start = Instant::now();
    let handle = TypewriterActor::spawn(two_lines(), timing());

    sleep_until_ms(start, 40).await;
    assert_eq!(frame(&handle).visible_text(), "");

    // ticks at 80, 160, 240, 320
    sleep_until_ms(start, 100).await;
    assert_eq!(frame(&handle).lines, vec!["a"]);
    sleep_until_ms(start, 180).await;
    assert_eq!(frame(&handle).lines, vec!["a", ""]);
    sleep_until_ms(start, 260).await;
    assert_eq!(frame(&handle).lines, vec!["a", "b"]);
    sleep_until_ms(start, 340).await;
    assert_eq!(frame(&handle).visible_text(), "a\nbb");

    // tick 5 at 400 arms the reset for 2400
    sleep_until_ms(start, 1200).await;
    let waiting = frame(&handle);
    assert_eq!(waiting.phase, Phase::WaitingToReset);
    assert_eq!(waiting.visible_text(), "a\nbb");
    assert_eq!(waiting.loops, 0);

    sleep_until_ms(start, 2440).await;
    let restarted = frame(&handle);
    assert_eq!(restarted.cursor, Cursor::START);
    assert_eq!(restarted.visible_text(), "");
    assert_eq!(restarted.loops, 1);

    // typing resumes one period after the reset
    sleep_until_ms(start, 2500).await;
    assert_eq!(frame(&handle).lines, vec!["a"]);

    shutdown(handle).await;
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_the_cursor_and_resume_is_exact() {
    let start = Instant::now();
    let handle = TypewriterActor::spawn(two_lines(), timing());

    sleep_until_ms(start, 260).await;
    assert_eq!(frame(&handle).cursor, Cursor { line: 1, ch: 1 });

    assert_eq!(toggle(&handle).await, PlaybackState::Paused);
    sleep(Duration::from_secs(30)).await;
    let paused = frame(&handle);
    assert_eq!(paused.cursor, Cursor { line: 1, ch: 1 });
    assert_eq!(paused.playback, PlaybackState::Paused);

    assert_eq!(toggle(&handle).await, PlaybackState::Playing);
    sleep(Duration::from_millis(100)).await;
    let resumed = frame(&handle);
    assert_eq!(resumed.cursor, Cursor { line: 1, ch: 2 });
    assert_eq!(resumed.visible_text(), "a\nbb");

    shutdown(handle).await;
}

#[tokio::test(start_paused = true)]
async fn double_toggle_leaves_cursor_alone() {
    let start = Instant::now();
    let handle = TypewriterActor::spawn(two_lines(), timing());
    sleep_until_ms(start, 100).await;
    let before = frame(&handle);

    toggle(&handle).await;
    toggle(&handle).await;

    let after = frame(&handle);
    assert_eq!(after.cursor, before.cursor);
    assert_eq!(after.playback, PlaybackState::Playing);

    shutdown(handle).await;
}

#[tokio::test(start_paused = true)]
async fn teardown_before_reset_stops_all_timers() {
    let start = Instant::now();
    let handle = TypewriterActor::spawn(two_lines(), timing());

    sleep_until_ms(start, 1000).await;
    assert_eq!(frame(&handle).phase, Phase::WaitingToReset);

    let mut frames = shutdown(handle).await;

    // Well past the point where the reset would have fired.
    sleep(Duration::from_secs(10)).await;
    assert!(frames.has_changed().is_err(), "frame feed should be closed");
    let last = frames.borrow_and_update().clone();
    assert_eq!(last.visible_text(), "a\nbb");
    assert_eq!(last.loops, 0);
    assert!(frames.changed().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn pausing_while_waiting_defers_the_reset() {
    let start = Instant::now();
    let handle = TypewriterActor::spawn(two_lines(), timing());

    sleep_until_ms(start, 1000).await;
    toggle(&handle).await;
    sleep(Duration::from_secs(60)).await;
    assert_eq!(frame(&handle).phase, Phase::Paused(folio_terminal::Resume::WaitingToReset));
    assert_eq!(frame(&handle).loops, 0);

    // Resuming restarts the full delay.
    toggle(&handle).await;
    sleep(Duration::from_millis(1900)).await;
    assert_eq!(frame(&handle).loops, 0);
    sleep(Duration::from_millis(200)).await;
    assert_eq!(frame(&handle).loops, 1);

    shutdown(handle).await;
}

#[tokio::test(start_paused = true)]
async fn long_scripts_complete_within_the_tick_bound() {
    let script = Script::new(["$ ls", "", "Cargo.toml  src", "$ _"]).unwrap();
    let bound = (script.len() * script.longest_line() + script.len()) as u64;
    let expected = script.lines().collect::<Vec<_>>().join("\n");

    let start = Instant::now();
    let slow_reset = TerminalTiming {
        reset_delay: Duration::from_secs(60),
        ..timing()
    };
    let handle = TypewriterActor::spawn(script, slow_reset);

    sleep_until_ms(start, bound * 80 + 40).await;
    let done = frame(&handle);
    assert_eq!(done.visible_text(), expected);
    assert_eq!(done.phase, Phase::WaitingToReset);

    sleep(Duration::from_secs(61)).await;
    assert_eq!(frame(&handle).loops, 1);

    shutdown(handle).await;
}
