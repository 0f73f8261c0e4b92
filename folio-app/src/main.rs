use anyhow::Result;
use clap::Parser;
use folio_common::Theme;
use folio_common::observability::{LogConfig, LogFormat, init_logging};
use folio_config::{FolioConfig, FolioConfigLoader, default_config_paths};
use folio_terminal::Script;
use folio_tui::{Profile, restore_terminal};
use launch::{Launch, build_from_config};
use std::path::PathBuf;
mod launch;

/// A terminal portfolio with a typewriter hero terminal.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Config file; defaults to ./folio.yaml, then the user config dir.
    #[arg(long, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Colour theme: dark or light.
    #[arg(long)]
    theme: Option<Theme>,

    /// Typewriter tick period in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Pause after the script finishes before it loops, in milliseconds.
    #[arg(long)]
    reset_delay_ms: Option<u64>,

    /// Turn off the particle field.
    #[arg(long)]
    no_particles: bool,

    /// Write logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    /// Print the effective configuration as YAML and exit.
    #[arg(long)]
    dump_config: bool,
}

/// Config file, env overrides, then command-line flags.
fn effective_config(cli: &Cli) -> Result<FolioConfig> {
    let mut loader = FolioConfigLoader::new();
    let file = cli
        .config
        .clone()
        .or_else(|| default_config_paths().into_iter().find(|p| p.exists()));
    if let Some(path) = file {
        loader = loader.with_file(path);
    }
    let mut cfg = loader.load()?;

    if let Some(theme) = cli.theme {
        cfg.ui.theme = theme;
    }
    if let Some(ms) = cli.tick_ms {
        cfg.terminal.tick_ms = ms;
    }
    if let Some(ms) = cli.reset_delay_ms {
        cfg.terminal.reset_delay_ms = ms;
    }
    if cli.no_particles {
        cfg.particles.enabled = false;
    }
    if cli.log_json {
        cfg.log.format = LogFormat::Json;
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Restore the terminal before color-eyre prints a panic report, so the
/// report is not swallowed by the alternate screen.
fn install_panic_hook() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install()?;
    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        panic_hook(info);
    }));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = effective_config(&cli)?;

    if cli.dump_config {
        print!("{}", cfg.to_yaml()?);
        return Ok(());
    }

    let log_path = init_logging(LogConfig {
        log_dir: cfg.log.dir.clone(),
        format: cfg.log.format,
        default_filter: cfg.log.filter.clone(),
        ..LogConfig::default()
    })?;
    install_panic_hook()?;
    tracing::info!(target = "folio", log = %log_path.display(), "starting");

    let profile = match &cfg.profile_path {
        Some(path) => Profile::from_path(path)?,
        None => Profile::builtin()?,
    };
    let script = match &cfg.terminal.script {
        Some(lines) => Script::new(lines.iter().cloned())?,
        None => Script::default_session(),
    };

    let mut launch = Launch::new();
    build_from_config(&mut launch, &cfg, profile, script)?;
    launch.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("folio").chain(args.iter().copied())).unwrap()
    }

    fn config_file(yaml: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn flags_override_the_file() {
        let file = config_file("terminal:\n  tick_ms: 50\nui:\n  theme: light\n");
        let path = file.path().to_str().unwrap();
        let cfg = effective_config(&cli(&["--config", path])).unwrap();
        assert_eq!(cfg.terminal.tick_ms, 50);
        assert_eq!(cfg.ui.theme, Theme::Light);

        let cfg = effective_config(&cli(&[
            "--config",
            path,
            "--tick-ms",
            "120",
            "--theme",
            "dark",
            "--no-particles",
            "--log-json",
        ]))
        .unwrap();
        assert_eq!(cfg.terminal.tick_ms, 120);
        assert_eq!(cfg.ui.theme, Theme::Dark);
        assert!(!cfg.particles.enabled);
        assert_eq!(cfg.log.format, LogFormat::Json);
    }

    #[test]
    fn zero_delay_from_the_command_line_is_rejected() {
        let file = config_file("{}\n");
        let path = file.path().to_str().unwrap();
        let err = effective_config(&cli(&["--config", path, "--reset-delay-ms", "0"])).unwrap_err();
        assert!(err.to_string().contains("reset_delay_ms"), "{err}");
    }

    #[test]
    fn unknown_theme_is_a_usage_error() {
        assert!(Cli::try_parse_from(["folio", "--theme", "sepia"]).is_err());
    }

    #[test]
    fn dumped_config_reloads() {
        let file = config_file("terminal:\n  prompt: \"me@box:~\"\n");
        let path = file.path().to_str().unwrap();
        let cfg = effective_config(&cli(&["--config", path])).unwrap();
        let yaml = cfg.to_yaml().unwrap();
        let again = config_file(&yaml);
        let reloaded =
            effective_config(&cli(&["--config", again.path().to_str().unwrap()])).unwrap();
        assert_eq!(reloaded.terminal.prompt, "me@box:~");
    }
}
