use crate::animator::{Animator, Cursor, Effect, Phase, PlaybackState};
use crate::script::Script;
use anyhow::Result;
use async_trait::async_trait;
use folio_actors::actor::{spawn_actor_reserved, Actor, Addr, Context};
use std::time::Duration;
use tokio::{
    sync::{oneshot, watch},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

/// Tick period and loop-reset delay for the hero terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalTiming {
    pub tick: Duration,
    pub reset_delay: Duration,
}

impl Default for TerminalTiming {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(80),
            reset_delay: Duration::from_millis(2000),
        }
    }
}

/// Snapshot of the animator handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalFrame {
    pub lines: Vec<String>,
    pub cursor: Cursor,
    pub phase: Phase,
    pub playback: PlaybackState,
    pub loops: u64,
}

impl TerminalFrame {
    pub fn capture(animator: &Animator) -> Self {
        Self {
            lines: animator.visible_lines().map(str::to_owned).collect(),
            cursor: animator.cursor(),
            phase: animator.phase(),
            playback: animator.playback(),
            loops: animator.loops_completed(),
        }
    }

    pub fn visible_text(&self) -> String {
        self.lines.join("\n")
    }
}

pub enum TypewriterMsg {
    /// Fired by the tick timer armed under `epoch`.
    Tick { epoch: u64 },
    /// Fired by the reset timer armed under `epoch`.
    ResetDue { epoch: u64 },
    TogglePlayback {
        reply: Option<oneshot::Sender<PlaybackState>>,
    },
    Snapshot {
        reply: oneshot::Sender<TerminalFrame>,
    },
    Shutdown,
}

struct ArmedTimer {
    epoch: u64,
    token: CancellationToken,
}

impl ArmedTimer {
    fn cancel(self) {
        self.token.cancel();
    }
}

/// Owns an [`Animator`] and drives it with two cancellable tokio timers.
///
/// Timer tasks only send messages; all state lives here. Each armed timer is
/// tagged with a fresh epoch and messages from any other epoch are dropped,
/// so a pause takes effect even when a tick is already queued. Dropping the
/// actor cancels the root token, which stops every timer it ever armed.
pub struct TypewriterActor {
    animator: Animator,
    timing: TerminalTiming,
    me: Addr<TypewriterActor>,
    root: CancellationToken,
    tick: Option<ArmedTimer>,
    reset: Option<ArmedTimer>,
    epoch: u64,
    frames: watch::Sender<TerminalFrame>,
}

/// Running typewriter: its mailbox, the frame feed and the actor task.
pub struct TypewriterHandle {
    pub addr: Addr<TypewriterActor>,
    pub frames: watch::Receiver<TerminalFrame>,
    pub task: JoinHandle<Result<()>>,
}

impl TypewriterActor {
    /// Build an unmounted actor; call [`mount`](Self::mount) before starting it.
    pub fn new(
        me: Addr<TypewriterActor>,
        script: Script,
        timing: TerminalTiming,
    ) -> (Self, watch::Receiver<TerminalFrame>) {
        let animator = Animator::new(script);
        let (frames, rx) = watch::channel(TerminalFrame::capture(&animator));
        let actor = Self {
            animator,
            timing,
            me,
            root: CancellationToken::new(),
            tick: None,
            reset: None,
            epoch: 0,
            frames,
        };
        (actor, rx)
    }

    /// Arm the initial timer. Must run inside a tokio runtime.
    pub fn mount(&mut self) {
        let effects = self.animator.start();
        self.apply(effects);
    }

    /// Reserve a mailbox, mount and start a standalone typewriter.
    pub fn spawn(script: Script, timing: TerminalTiming) -> TypewriterHandle {
        let reserved = spawn_actor_reserved::<TypewriterActor>("typewriter", 64);
        let (mut actor, frames) = TypewriterActor::new(reserved.addr(), script, timing);
        actor.mount();
        let handle = reserved.start(actor);
        TypewriterHandle {
            addr: handle.addr,
            frames,
            task: handle.task,
        }
    }

    fn next_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    fn apply(&mut self, effects: &[Effect]) {
        for effect in effects {
            tracing::trace!(target = "folio-terminal", ?effect, "apply");
            match effect {
                Effect::ArmTick => {
                    if let Some(old) = self.tick.take() {
                        old.cancel();
                    }
                    let epoch = self.next_epoch();
                    let token = self.root.child_token();
                    spawn_tick_timer(self.me.clone(), self.timing.tick, epoch, token.clone());
                    self.tick = Some(ArmedTimer { epoch, token });
                }
                Effect::CancelTick => {
                    if let Some(old) = self.tick.take() {
                        old.cancel();
                    }
                }
                Effect::ArmReset => {
                    if let Some(old) = self.reset.take() {
                        old.cancel();
                    }
                    let epoch = self.next_epoch();
                    let token = self.root.child_token();
                    spawn_reset_timer(
                        self.me.clone(),
                        self.timing.reset_delay,
                        epoch,
                        token.clone(),
                    );
                    self.reset = Some(ArmedTimer { epoch, token });
                }
                Effect::CancelReset => {
                    if let Some(old) = self.reset.take() {
                        old.cancel();
                    }
                }
            }
        }
    }

    fn publish(&self) {
        self.frames.send_replace(TerminalFrame::capture(&self.animator));
    }

    fn teardown(&mut self) {
        let effects = self.animator.teardown();
        self.apply(effects);
        self.root.cancel();
    }
}

impl Drop for TypewriterActor {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

fn spawn_tick_timer(
    me: Addr<TypewriterActor>,
    period: Duration,
    epoch: u64,
    token: CancellationToken,
) {
    tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = interval.tick() => {
                    if me.send(TypewriterMsg::Tick { epoch }).await.is_err() {
                        break;
                    }
                }
            }
        }
    });
}

fn spawn_reset_timer(
    me: Addr<TypewriterActor>,
    delay: Duration,
    epoch: u64,
    token: CancellationToken,
) {
    tokio::spawn(async move {
        tokio::select! {
            biased;
            _ = token.cancelled() => {}
            _ = time::sleep(delay) => {
                let _ = me.send(TypewriterMsg::ResetDue { epoch }).await;
            }
        }
    });
}

#[async_trait]
impl Actor for TypewriterActor {
    type Msg = TypewriterMsg;

    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            TypewriterMsg::Tick { epoch } => {
                if self.tick.as_ref().map(|t| t.epoch) != Some(epoch) {
                    tracing::trace!(target = "folio-terminal", epoch, "stale tick dropped");
                    return Ok(());
                }
                let effects = self.animator.tick();
                if !effects.is_empty() {
                    tracing::debug!(
                        target = "folio-terminal",
                        line = self.animator.cursor().line,
                        "script fully revealed; reset armed"
                    );
                }
                self.apply(effects);
                self.publish();
            }
            TypewriterMsg::ResetDue { epoch } => {
                if self.reset.as_ref().map(|t| t.epoch) != Some(epoch) {
                    tracing::trace!(target = "folio-terminal", epoch, "stale reset dropped");
                    return Ok(());
                }
                // The one-shot has fired; forget it before re-arming typing.
                self.reset = None;
                let effects = self.animator.reset_elapsed();
                self.apply(effects);
                tracing::debug!(
                    target = "folio-terminal",
                    loops = self.animator.loops_completed(),
                    "loop restarted"
                );
                self.publish();
            }
            TypewriterMsg::TogglePlayback { reply } => {
                let effects = self.animator.toggle_playback();
                self.apply(effects);
                let state = self.animator.playback();
                tracing::info!(target = "folio-terminal", ?state, "playback toggled");
                self.publish();
                if let Some(reply) = reply {
                    let _ = reply.send(state);
                }
            }
            TypewriterMsg::Snapshot { reply } => {
                let _ = reply.send(TerminalFrame::capture(&self.animator));
            }
            TypewriterMsg::Shutdown => {
                self.teardown();
                ctx.stop();
            }
        }
        Ok(())
    }
}
