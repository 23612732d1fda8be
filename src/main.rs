mod app;
mod config;
mod error;
mod form;
mod format;
mod ledger;
mod list;
mod logging;
mod models;
mod stats;
mod storage;
mod ui;

use crate::app::App;
use crate::config::{Cli, Config};
use crate::ledger::Ledger;
use crate::storage::{FileStore, KeyValueStore};
use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{Stdout, stdout};
use std::time::Duration;

fn main() -> Result<()> {
    let config = Config::from_cli(Cli::parse())?;
    logging::init(&config.log_file, &config.log_filter)?;
    tracing::info!(data_dir = %config.data_dir.display(), "starting fintrack");

    let store = FileStore::open(&config.data_dir).context("opening data directory failed")?;
    let ledger = Ledger::load(store);
    let mut app = App::new(ledger, config.chart_months, Local::now());

    if let Err(err) = run(&mut app) {
        tracing::error!(error = ?err, "application error");
        eprintln!("Application error: {err:?}");
        std::process::exit(1);
    }
    tracing::info!("exiting");
    Ok(())
}

/// Raw mode is switched off again however the session ends, including when
/// the alternate screen cannot be entered.
fn run<S: KeyValueStore>(app: &mut App<S>) -> Result<()> {
    enable_raw_mode()?;
    let result = run_on_alternate_screen(app);
    let restored = disable_raw_mode().context("failed to disable raw mode");
    result.and(restored)
}

fn run_on_alternate_screen<S: KeyValueStore>(app: &mut App<S>) -> Result<()> {
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

    terminal
        .backend_mut()
        .execute(LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;

    result
}

fn run_app<S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        app.set_now(Local::now());
        terminal.draw(|f| ui::draw(f, app))?;
        if event::poll(Duration::from_millis(200))?
            && let Event::Key(key) = event::read()?
            && app.handle_key(key)
        {
            return Ok(());
        }
    }
}
