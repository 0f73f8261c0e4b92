use anyhow::{Context, Result};
use folio_actors::{actor::Addr, builder::Builder};
use folio_config::FolioConfig;
use folio_terminal::{Script, TerminalTiming, TypewriterActor};
use folio_tui::{AppSettings, Profile, TuiActor, spawn_tui_feeders};
use std::time::Duration;

const TYPEWRITER: &str = "typewriter:hero";
const TUI: &str = "tui:main";

pub struct Launch {
    builder: Builder,
}

impl Launch {
    pub fn new() -> Self {
        Self {
            builder: Builder::new(),
        }
    }
    pub fn builder_mut(&mut self) -> &mut Builder {
        &mut self.builder
    }
    pub async fn run(self) -> Result<()> {
        self.builder.run_until_ctrl_c().await
    }
}

fn timing(cfg: &FolioConfig) -> TerminalTiming {
    TerminalTiming {
        tick: Duration::from_millis(cfg.terminal.tick_ms),
        reset_delay: Duration::from_millis(cfg.terminal.reset_delay_ms),
    }
}

pub fn build_from_config(
    l: &mut Launch,
    cfg: &FolioConfig,
    profile: Profile,
    script: Script,
) -> Result<()> {
    let b = l.builder_mut();
    let shutdown = b.shutdown_handle();

    // -------- PHASE 1: RESERVE EVERYTHING --------
    let r_typewriter = b.reserve::<TypewriterActor>(TYPEWRITER, 64);
    // ui (start last)
    let r_tui = b.reserve::<TuiActor>(TUI, 256);

    // -------- PHASE 2: START THE TYPEWRITER --------
    // Mounting arms the first tick, so frames flow before the TUI draws.
    let (mut typewriter, frames) = TypewriterActor::new(r_typewriter.addr(), script, timing(cfg));
    typewriter.mount();
    b.start_reserved(r_typewriter, typewriter);
    tracing::info!(
        target = "folio",
        tick_ms = cfg.terminal.tick_ms,
        reset_delay_ms = cfg.terminal.reset_delay_ms,
        "typewriter started"
    );

    // -------- PHASE 3: START TUI LAST --------
    let typewriter_addr: Addr<TypewriterActor> = b.addr(TYPEWRITER).context("typewriter addr")?;
    let tui = TuiActor::new(
        profile,
        AppSettings::from(cfg),
        typewriter_addr,
        frames,
        shutdown.clone(),
    )?;
    b.start_reserved(r_tui, tui);

    let tui_addr: Addr<TuiActor> = b.addr(TUI).context("tui addr")?;
    let (input, ticker) =
        spawn_tui_feeders(tui_addr, shutdown, Duration::from_millis(cfg.ui.frame_ms));
    b.track(async move {
        input.await?;
        Ok(())
    });
    b.track(async move {
        ticker.await?;
        Ok(())
    });

    Ok(())
}
