use crate::{
    app::{App, AppSettings, Request},
    command::{command_for_key, command_for_mouse},
    content::Profile,
    view,
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event as CtEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use folio_actors::{
    actor::{Actor, Addr, Context},
    system::ShutdownHandle,
};
use folio_terminal::{PlaybackState, TerminalFrame, TypewriterActor, TypewriterMsg};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};
use tokio::sync::{oneshot, watch};

pub enum TuiMsg {
    InputEvent(CtEvent),
    /// Frame-rate tick from the feeder.
    Tick,
    PlaybackChanged(PlaybackState),
    OpError(String),
    Shutdown,
}

/// Leave raw mode and the alternate screen. Safe to call more than once,
/// including from a panic hook.
pub fn restore_terminal() {
    disable_raw_mode().ok();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

pub struct TuiActor<B: Backend = CrosstermBackend<Stdout>> {
    app: App,

    // deps
    typewriter: Addr<TypewriterActor>,
    frames: watch::Receiver<TerminalFrame>,

    // terminal
    term: Terminal<B>,
    redraw_every: Duration,
    last_draw: Instant,
    dirty: bool,
    /// Set once the real tty has been handed back (or was never taken).
    restored: bool,

    // shutdown coordination
    shutdown: ShutdownHandle,
}

impl TuiActor {
    pub fn new(
        profile: Profile,
        settings: AppSettings,
        typewriter: Addr<TypewriterActor>,
        frames: watch::Receiver<TerminalFrame>,
        shutdown: ShutdownHandle,
    ) -> Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let mut actor = Self::with_terminal(
            Terminal::new(CrosstermBackend::new(stdout))?,
            profile,
            settings,
            typewriter,
            frames,
            shutdown,
        );
        actor.restored = false;
        actor.term.clear()?;
        Ok(actor)
    }
}

impl<B: Backend + Send + 'static> TuiActor<B> {
    /// Build on an already prepared terminal. Raw mode is left alone.
    pub fn with_terminal(
        term: Terminal<B>,
        profile: Profile,
        settings: AppSettings,
        typewriter: Addr<TypewriterActor>,
        frames: watch::Receiver<TerminalFrame>,
        shutdown: ShutdownHandle,
    ) -> Self {
        let now = Instant::now();
        let first = frames.borrow().clone();
        // The caret blinks at its own pace; redraw at least that often.
        let redraw_every = settings.blink_period;
        Self {
            app: App::new(profile, settings, first, now),
            typewriter,
            frames,
            term,
            redraw_every,
            last_draw: now,
            dirty: true,
            restored: true,
            shutdown,
        }
    }

    fn draw(&mut self) -> Result<()> {
        let now = Instant::now();
        view::draw(&mut self.term, &mut self.app, now)?;
        self.last_draw = now;
        self.dirty = false;
        Ok(())
    }

    /// Pull the newest typewriter frame, if one was published since the last look.
    fn sync_frame(&mut self) {
        if self.frames.has_changed().unwrap_or(false) {
            let frame = self.frames.borrow_and_update().clone();
            self.app.set_frame(frame);
            self.dirty = true;
        }
    }

    fn request_toggle(&mut self, me: Addr<Self>) {
        let (tx, rx) = oneshot::channel::<PlaybackState>();
        if self
            .typewriter
            .try_send(TypewriterMsg::TogglePlayback { reply: Some(tx) })
            .is_err()
        {
            self.app.notice("Terminal is busy, try again", Instant::now());
            return;
        }
        tokio::spawn(async move {
            match rx.await {
                Ok(state) => {
                    let _ = me.send(TuiMsg::PlaybackChanged(state)).await;
                }
                Err(e) => {
                    let _ = me.send(TuiMsg::OpError(format!("toggle: {e}"))).await;
                }
            }
        });
    }

    fn handle_event(&mut self, ev: CtEvent) -> Option<Request> {
        let cmd = match ev {
            CtEvent::Key(k) => command_for_key(k),
            CtEvent::Mouse(m) => command_for_mouse(m),
            CtEvent::Resize(..) => {
                self.dirty = true;
                None
            }
            _ => None,
        }?;
        self.dirty = true;
        self.app.apply(cmd, Instant::now())
    }

    /// Stop the typewriter, give the terminal back and end the program.
    fn shut_down(&mut self, ctx: &mut Context<Self>) {
        tracing::info!(target = "folio-tui", "shutting down");
        let _ = self.typewriter.try_send(TypewriterMsg::Shutdown);
        self.teardown();
        self.shutdown.signal();
        ctx.stop();
    }
}

impl<B: Backend> TuiActor<B> {
    fn teardown(&mut self) {
        if !self.restored {
            restore_terminal();
            self.restored = true;
        }
    }
}

impl<B: Backend> Drop for TuiActor<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[async_trait]
impl<B: Backend + Send + 'static> Actor for TuiActor<B> {
    type Msg = TuiMsg;

    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            TuiMsg::InputEvent(ev) => match self.handle_event(ev) {
                Some(Request::TogglePlayback) => self.request_toggle(ctx.addr()),
                Some(Request::Quit) => self.shut_down(ctx),
                None => {}
            },
            TuiMsg::PlaybackChanged(state) => {
                tracing::debug!(target = "folio-tui", ?state, "playback changed");
                self.app.playback_changed(state, Instant::now());
                self.dirty = true;
            }
            TuiMsg::OpError(e) => {
                tracing::warn!(target = "folio-tui", error = %e, "operation failed");
                self.app.notice(format!("× {e}"), Instant::now());
                self.dirty = true;
            }
            TuiMsg::Tick => {
                self.sync_frame();
                self.app.advance(Instant::now());
                // Particles move every tick, so the frame is always stale while they run.
                if self.app.particles().is_some() {
                    self.dirty = true;
                }
                if self.dirty || self.last_draw.elapsed() >= self.redraw_every {
                    self.draw()?;
                }
            }
            TuiMsg::Shutdown => self.shut_down(ctx),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use folio_actors::actor::{ActorHandle, spawn_actor};
    use folio_actors::system::ActorSystem;
    use folio_terminal::{Script, TerminalTiming};
    use ratatui::backend::TestBackend;

    fn key(c: char) -> TuiMsg {
        TuiMsg::InputEvent(CtEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
    }

    #[tokio::test]
    async fn quit_key_shuts_everything_down_directly() {
        let typewriter = TypewriterActor::spawn(Script::default_session(), TerminalTiming::default());
        let sys = ActorSystem::new();
        let mut signalled = sys.shutdown_notifier();
        let tui = TuiActor::with_terminal(
            Terminal::new(TestBackend::new(100, 30)).unwrap(),
            Profile::builtin().unwrap(),
            AppSettings {
                particles: None,
                ..AppSettings::default()
            },
            typewriter.addr.clone(),
            typewriter.frames.clone(),
            sys.shutdown_handle(),
        );

        // A one-slot mailbox leaves no room for a queued follow-up message.
        let ActorHandle { addr, task } = spawn_actor(tui, 1);
        assert!(addr.send(TuiMsg::Tick).await.is_ok());
        assert!(addr.send(key('q')).await.is_ok());

        task.await.unwrap().unwrap();
        signalled.recv().await.unwrap();
        typewriter.task.await.unwrap().unwrap();
        assert!(addr.is_closed());
    }
}
