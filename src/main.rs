// ABOUTME: Main entry point for teabag, the interactive AppImage installer
//
// Binary: teabag
// Usage: teabag [BUNDLE] [--config PATH] [--applications-dir PATH] [--no-color]

#![allow(missing_docs)]

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::*, Terminal};
use std::{
    io::{self, IsTerminal},
    sync::Arc,
    time::{Duration, Instant},
};

use teabag::app::{App, EventHandler, WizardState};
use teabag::cli::{self, Cli};
use teabag::components::{Theme, WizardComponent};
use teabag::config::Settings;
use teabag::install::{HostSystem, InstallPipeline};
use teabag::logging;

/// Terminal cleanup utility to ensure proper restoration
fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

fn cleanup_terminal_with_instance<B: Backend + io::Write>(terminal: &mut Terminal<B>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    if let Some(bundle) = &args.bundle {
        if let Err(e) = cli::validate_bundle(bundle) {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    }

    // Logging is optional; the wizard still runs without a log file
    match logging::setup_logging() {
        Ok(path) => tracing::info!("Logging to {}", path.display()),
        Err(e) => eprintln!("Warning: file logging disabled: {e:#}"),
    }
    setup_panic_handler();

    let settings = Settings::from_cli(&args);
    let theme = if settings.no_color {
        Theme::monochrome()
    } else {
        Theme::default()
    };

    let state = WizardState::new(args.bundle.clone(), &settings);
    let pipeline = InstallPipeline::new(
        settings.registration_dir.clone(),
        settings.scratch_dir.clone(),
        Arc::new(HostSystem),
    );
    let mut app = App::new(state, pipeline);
    let wizard = WizardComponent::new();

    let result = run_tui(&mut app, &wizard, &theme).await;

    if result.is_err() {
        cleanup_terminal();
    }

    result
}

async fn run_tui(app: &mut App, wizard: &WizardComponent, theme: &Theme) -> Result<()> {
    if !IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!(
            "No TTY detected. This application requires a terminal.\n\
             Try running directly in a terminal instead of redirecting output."
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui_loop(app, wizard, theme, &mut terminal).await;

    if let Err(e) = cleanup_terminal_with_instance(&mut terminal) {
        tracing::error!("Failed to cleanup terminal: {}", e);
        cleanup_terminal();
    }

    result
}

async fn run_tui_loop(
    app: &mut App,
    wizard: &WizardComponent,
    theme: &Theme,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            wizard.render(frame, frame.size(), &app.state, theme);
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    if let Some(app_event) = EventHandler::handle_key_event(key_event, &app.state)
                    {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                }
            }
        }

        // Dispatch queued work and apply finished installs right away
        app.tick();

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.state.should_quit {
            if app.install_in_flight() {
                tracing::info!("Waiting for the running installation before exiting");
                app.wait_for_install().await;
            }
            break;
        }
    }

    Ok(())
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        // Ensure terminal is restored before logging the panic
        cleanup_terminal();

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
