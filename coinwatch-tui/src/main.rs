/// Coinwatch - CoinMarketCap terminal monitor
///
/// Polls the top listings plus the symbols in `COINWATCH_SYMBOLS` every 30 minutes and redraws
/// the table every 5 seconds. Press `q`, `Esc` or `Ctrl+C` to quit.
use std::{
    error::Error,
    time::{Duration, Instant},
};

use chrono::{Local, Offset};
use coinwatch_data::{
    CmcClient, CredentialRotator, FetchConfig, FetchOrchestrator, input::read_list_file,
};
use coinwatch_tui::{Config, Scheduler, TICK_RATE, TableRenderer, logging::init_logging, terminal};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env();
    init_logging(&config.log_path)?;

    // Input failures are reported before the terminal is taken over
    let requested = read_list_file(&config.symbols_path)?;
    let credentials = CredentialRotator::new(read_list_file(&config.api_keys_path)?)?;
    info!(
        symbols = requested.len(),
        credentials = credentials.len(),
        "starting coinwatch"
    );

    let renderer = TableRenderer::new(requested.clone()).with_offset(Local::now().offset().fix());
    let orchestrator =
        FetchOrchestrator::new(CmcClient::new(credentials), requested, FetchConfig::default());
    let mut scheduler = Scheduler::new(orchestrator, renderer);

    let mut tui = terminal::init()?;
    let outcome = run(&mut tui, &mut scheduler).await;
    terminal::restore(&mut tui)?;

    info!("coinwatch stopped");
    outcome
}

async fn run(
    tui: &mut terminal::Tui,
    scheduler: &mut Scheduler<CmcClient>,
) -> Result<(), Box<dyn Error>> {
    let mut last_tick: Option<Instant> = None;

    loop {
        if last_tick.is_none_or(|last| last.elapsed() >= TICK_RATE) {
            let screen = scheduler.tick().await;
            terminal::draw(tui, &screen)?;
            last_tick = Some(Instant::now());
        }

        let timeout = last_tick
            .and_then(|last| TICK_RATE.checked_sub(last.elapsed()))
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    _ => {}
                }
            }
        }
    }

    Ok(())
}
