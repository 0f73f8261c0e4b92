use crate::tui::{TuiActor, TuiMsg};
use folio_actors::actor::Addr;
use folio_actors::system::ShutdownHandle;
use crossterm::event::Event as CtEvent;
use std::io;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::{self, task::JoinHandle, time};

/// How long the input thread waits for an event before checking for shutdown.
const INPUT_POLL: Duration = Duration::from_millis(100);
/// Consecutive terminal read failures after which the input thread gives up.
const MAX_INPUT_FAILURES: u32 = 5;

fn read_event() -> io::Result<Option<CtEvent>> {
    if crossterm::event::poll(INPUT_POLL)? {
        crossterm::event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Forward terminal events until `stopped` reports shutdown, the mailbox
/// closes, or reads keep failing. Failures are reported and backed off.
fn pump_input(
    mut next: impl FnMut() -> io::Result<Option<CtEvent>>,
    mut send: impl FnMut(TuiMsg) -> bool,
    mut stopped: impl FnMut() -> bool,
    backoff: Duration,
) {
    let mut failures = 0;
    while !stopped() {
        let msg = match next() {
            Ok(None) => continue,
            Ok(Some(ev)) => {
                failures = 0;
                TuiMsg::InputEvent(ev)
            }
            Err(e) => {
                failures += 1;
                tracing::warn!(target = "folio-tui", failures, error = %e, "terminal read failed");
                TuiMsg::OpError(format!("input: {e}"))
            }
        };
        if !send(msg) {
            break;
        }
        if failures >= MAX_INPUT_FAILURES {
            tracing::error!(target = "folio-tui", "giving up on terminal input");
            break;
        }
        if failures > 0 {
            std::thread::sleep(backoff);
        }
    }
}

/// Start the terminal input reader and the frame ticker. Both stop on the
/// shutdown broadcast; the returned handles finish shortly after.
pub fn spawn_tui_feeders(
    tui: Addr<TuiActor>,
    shutdown: ShutdownHandle,
    frame_every: Duration,
) -> (JoinHandle<()>, JoinHandle<()>) {
    let tui_in = tui.clone();
    let mut shutdown_input = shutdown.subscribe();
    // One dedicated blocking thread polls crossterm so a keypress never
    // waits on a fresh task.
    let input = tokio::task::spawn_blocking(move || {
        pump_input(
            read_event,
            |msg| tui_in.blocking_send(msg).is_ok(),
            || !matches!(shutdown_input.try_recv(), Err(TryRecvError::Empty)),
            INPUT_POLL,
        );
        tracing::debug!(target = "folio-tui", "input feeder stopped");
    });

    let tui_tick = tui;
    let mut shutdown_tick = shutdown.subscribe();
    let ticker = tokio::spawn(async move {
        let mut interval = time::interval(frame_every);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = shutdown_tick.recv() => break,
                _ = interval.tick() => {
                    if tui_tick.is_closed() {
                        break;
                    }
                    let _ = tui_tick.try_send(TuiMsg::Tick);
                }
            }
        }
    });

    (input, ticker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent};

    #[test]
    fn failing_reads_are_reported_then_abandoned() {
        let mut errors = 0;
        pump_input(
            || Err(io::Error::other("tty gone")),
            |msg| {
                assert!(matches!(msg, TuiMsg::OpError(_)));
                errors += 1;
                true
            },
            || false,
            Duration::ZERO,
        );
        assert_eq!(errors, MAX_INPUT_FAILURES);
    }

    #[test]
    fn a_good_read_resets_the_failure_count() {
        let mut script = vec![
            Err(io::Error::other("blip")),
            Err(io::Error::other("blip")),
            Ok(Some(CtEvent::Key(KeyEvent::from(KeyCode::Char('j'))))),
        ]
        .into_iter();
        let mut events = 0;
        let mut errors = 0;
        pump_input(
            || script.next().unwrap_or_else(|| Err(io::Error::other("done"))),
            |msg| {
                match msg {
                    TuiMsg::InputEvent(_) => events += 1,
                    TuiMsg::OpError(_) => errors += 1,
                    _ => {}
                }
                true
            },
            || false,
            Duration::ZERO,
        );
        assert_eq!(events, 1);
        assert_eq!(errors, 2 + MAX_INPUT_FAILURES);
    }

    #[test]
    fn stops_on_shutdown_without_reading() {
        let mut reads = 0;
        pump_input(
            || {
                reads += 1;
                Ok(None)
            },
            |_| true,
            || true,
            Duration::ZERO,
        );
        assert_eq!(reads, 0);
    }
}
