mod args;
mod bootstrap;
mod data_loaders;
mod desktop;
mod enforcer;
mod logging;
mod session;
mod thumbnail;
mod ticker;
mod utility;

use std::{env, path::PathBuf, process::ExitCode};

use clap::Parser;

use crate::{
    args::{Cli, Command},
    data_loaders::config::AppConfig,
    desktop::{available_styles, DesktopWallpaper, WallpaperSetter},
    enforcer::{Detection, TickOutcome, WallpaperEnforcer, ENFORCE_INTERVAL},
    session::{ManualSession, SessionError},
    thumbnail::Dimensions,
    ticker::{TickFlow, Ticker},
    utility::app_root_dir,
};

pub const DEBUG_NAME: &str = "WALLGUARD";

fn app_config_path(cli_override: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_override {
        return path;
    }

    if let Some(root) = app_root_dir() {
        return root.join("config.yaml");
    }

    PathBuf::from("config.yaml")
}

/// Tells the surrounding UI whether to lock the manual controls.
fn emit_detection(detection: &Detection) {
    match serde_json::to_string(detection) {
        Ok(line) => println!("{line}"),
        Err(e) => error!("[{}] Failed to encode detection event: {e}", DEBUG_NAME),
    }
}

fn enforce(enforcer: &mut WallpaperEnforcer, desktop: &mut DesktopWallpaper) {
    let mut ticker = Ticker::new(ENFORCE_INTERVAL);
    ticker.start();

    ticker.run(|| match enforcer.tick(&mut *desktop) {
        TickOutcome::Reapplied {
            attempts_remaining: 0,
            ..
        }
        | TickOutcome::Inactive => TickFlow::Stop,
        TickOutcome::Reapplied { .. } => TickFlow::Continue,
    });

    info!(
        "[{}][ENFORCE] Ticker ({}s) stopped after {} tick(s); enforcer {:?}",
        DEBUG_NAME,
        ticker.interval().as_secs(),
        ticker.fired(),
        enforcer.phase()
    );
}

fn run_manual(
    cmd: Option<Command>,
    viewport: Dimensions,
    desktop: &mut DesktopWallpaper,
) -> Result<(), SessionError> {
    let mut session = ManualSession::new(viewport);

    match cmd {
        None => {
            println!("No wallpaper.* to enforce here. Run with `apply <image>` or `preview <image>`.");
        }
        Some(Command::Styles) => {
            for style in available_styles(desktop.supports_extended_styles()) {
                println!("{:<8} {}", format!("{style:?}").to_lowercase(), style.description());
            }
        }
        Some(Command::Preview { image, out }) => {
            let preview = session.select_image(&image)?;
            let source = preview.selection.source;
            let fitted = preview.selection.preview;
            println!(
                "{} {}x{} -> {}x{}",
                image.display(),
                source.width,
                source.height,
                fitted.width,
                fitted.height
            );
            if let Some(out) = out {
                preview.save(&out)?;
                println!("Preview written to {}", out.display());
            }
        }
        Some(Command::Apply { image, style }) => {
            session.select_image(&image)?;
            if session.apply_selected(desktop, style)? {
                println!("Wallpaper set: {} ({})", image.display(), style.description());
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init(cli.debug, "warn");
    bootstrap::bootstrap_app();

    let config_path = app_config_path(cli.config.clone());
    let config = AppConfig::load(&config_path).unwrap_or_default();

    logging::set_debug(cli.debug || config.debug);
    logging::set_level(&config.log_level);
    std::panic::set_hook(Box::new(|panic_info| {
        error!("[{}] Panic: {}", DEBUG_NAME, panic_info);
    }));

    info!("!---------- [{}] Starting ----------!", DEBUG_NAME);
    info!("[{}] Config loaded from {}", DEBUG_NAME, config_path.display());

    let mut desktop = DesktopWallpaper::detect(app_root_dir());
    info!("[{}] Host version: {:?}", DEBUG_NAME, desktop.version());

    let cwd = match env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!("[{}] Cannot read working directory: {e}", DEBUG_NAME);
            eprintln!("wallguard: cannot read working directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut enforcer = WallpaperEnforcer::new()
        .with_tick_logging(config.settings.diagnostics.log_enforcement_ticks);
    let detection = enforcer.activate(&cwd);
    emit_detection(&detection);

    if !detection.manual_controls_enabled() {
        if let (Some(cmd), Some(state)) = (&cli.cmd, enforcer.state()) {
            warn!(
                "[{}] Enforcing {}; ignoring {:?}",
                DEBUG_NAME,
                state.target_path.display(),
                cmd
            );
        }
        if !desktop.supports_extended_styles() {
            warn!(
                "[{}][ENFORCE] Host does not report Fit support; requesting Fit anyway",
                DEBUG_NAME
            );
        }
        enforce(&mut enforcer, &mut desktop);
        return ExitCode::SUCCESS;
    }

    match run_manual(cli.cmd, config.settings.preview.viewport(), &mut desktop) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("[{}][MANUAL] {e}", DEBUG_NAME);
            eprintln!("wallguard: {e}");
            ExitCode::FAILURE
        }
    }
}
