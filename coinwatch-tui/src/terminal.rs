//! Thin ratatui/crossterm adapter: terminal setup and teardown, and drawing a [`Screen`].

use crate::table::{Body, Cell, Screen, Shade};
use crossterm::{
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetSize, SetTitle, disable_raw_mode,
        enable_raw_mode,
    },
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::io::{self, Stdout};

pub const WINDOW_TITLE: &str = "CoinMarketCap";
pub const WINDOW_COLUMNS: u16 = 160;
pub const WINDOW_ROWS: u16 = 40;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Take over the terminal: raw mode, alternate screen, window title and size.
///
/// Installs a panic hook that restores the terminal before the panic message is printed.
pub fn init() -> io::Result<Tui> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        SetTitle(WINDOW_TITLE),
        SetSize(WINDOW_COLUMNS, WINDOW_ROWS)
    )?;
    Terminal::new(CrosstermBackend::new(stdout))
}

pub fn restore(terminal: &mut Tui) -> io::Result<()> {
    restore_terminal()?;
    terminal.show_cursor()
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

pub fn draw(terminal: &mut Tui, screen: &Screen) -> io::Result<()> {
    terminal.draw(|frame| render_screen(frame, screen))?;
    Ok(())
}

fn render_screen(frame: &mut Frame, screen: &Screen) {
    frame.render_widget(Paragraph::new(lines(screen)), frame.area());
}

/// Status lines, a blank separator, then the table or message.
pub fn lines(screen: &Screen) -> Vec<Line<'_>> {
    let mut lines = screen
        .status
        .iter()
        .map(|status| Line::from(Span::raw(status.as_str())))
        .collect::<Vec<_>>();
    lines.push(Line::default());

    match &screen.body {
        Body::Table { header, rows } => {
            lines.push(cells_line(header));
            lines.extend(rows.iter().map(|row| cells_line(&row.cells)));
        }
        Body::Message(message) => lines.push(Line::from(Span::raw(message.as_str()))),
    }

    lines
}

fn cells_line(cells: &[Cell]) -> Line<'_> {
    Line::from(
        cells
            .iter()
            .map(|cell| Span::styled(cell.text.as_str(), style(cell.shade)))
            .collect::<Vec<_>>(),
    )
}

fn style(shade: Shade) -> Style {
    match shade {
        Shade::Default => Style::default(),
        Shade::Highlight => Style::default().fg(Color::Cyan),
        Shade::StrongFall => Style::default().fg(Color::LightRed),
        Shade::Fall => Style::default().fg(Color::Red),
        Shade::Flat => Style::default().fg(Color::White),
        Shade::Rise => Style::default().fg(Color::Green),
        Shade::StrongRise => Style::default().fg(Color::LightGreen),
    }
}
