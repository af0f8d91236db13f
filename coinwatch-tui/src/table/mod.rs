//! Stateful table presenter.
//!
//! [`TableRenderer::render`] turns the current and previous [`DataSet`]s into a [`Screen`]: a
//! status header plus either a table of pre-formatted, pre-shaded rows or a single message line.
//! Rows are cached so ticks without a fetch can repeat them verbatim.

use chrono::{DateTime, FixedOffset, Offset, TimeDelta, Utc};
use coinwatch_data::{AssetRecord, Currency, DataSet, ScheduleState};
use indexmap::IndexSet;

pub mod format;
pub mod shade;

pub use format::Align;
pub use shade::Shade;

pub const NO_DATA_MESSAGE: &str = "No data to be displayed";
pub const ERROR_MESSAGE: &str = "Error while grabbing data.";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fixed-width table column.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Column {
    pub title: &'static str,
    pub width: usize,
    pub align: Align,
}

impl Column {
    const fn new(title: &'static str, width: usize, align: Align) -> Self {
        Self {
            title,
            width,
            align,
        }
    }
}

pub const COLUMNS: [Column; 10] = [
    Column::new("Rank", 5, Align::Left),
    Column::new("Name", 18, Align::Left),
    Column::new("Symbol", 9, Align::Left),
    Column::new("Price BTC", 14, Align::Right),
    Column::new("Price AUD", 14, Align::Right),
    Column::new("Price USD", 14, Align::Right),
    Column::new("Change 1HR", 14, Align::Right),
    Column::new("Change 24HR", 14, Align::Right),
    Column::new("Change 7D", 14, Align::Right),
    Column::new("Market Cap USD", 23, Align::Right),
];

/// One display cell. `text` is already fitted to `width`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Cell {
    pub text: String,
    pub shade: Shade,
    pub width: usize,
    pub align: Align,
}

impl Cell {
    pub fn new(text: &str, shade: Shade, column: &Column) -> Self {
        Self {
            text: format::fit(text, column.width, column.align),
            shade,
            width: column.width,
            align: column.align,
        }
    }
}

/// Rendered line for one asset.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CachedRow {
    pub slug: String,
    pub cells: Vec<Cell>,
}

impl CachedRow {
    /// Concatenated cell text, without shading.
    pub fn text(&self) -> String {
        self.cells.iter().map(|cell| cell.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RenderMode {
    /// A fetch cycle just succeeded: rebuild every row.
    Fresh,
    /// No fetch was due: reuse the cached rows.
    Repeat,
    /// A fetch cycle just failed: hide the table.
    Error,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Body {
    Table { header: Vec<Cell>, rows: Vec<CachedRow> },
    Message(String),
}

/// Everything shown for one tick.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Screen {
    pub status: Vec<String>,
    pub body: Body,
}

#[derive(Debug, Clone)]
pub struct TableRenderer {
    requested: IndexSet<String>,
    offset: FixedOffset,
    cache: Vec<CachedRow>,
}

impl TableRenderer {
    /// Renderer highlighting `requested` symbols, showing times in UTC.
    pub fn new(requested: IndexSet<String>) -> Self {
        Self {
            requested,
            offset: Utc.fix(),
            cache: Vec::new(),
        }
    }

    /// Show status times at a different UTC offset, eg/ the local one.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn cache(&self) -> &[CachedRow] {
        &self.cache
    }

    pub fn render(
        &mut self,
        mode: RenderMode,
        current: &DataSet,
        previous: &DataSet,
        schedule: &ScheduleState,
        now: DateTime<Utc>,
    ) -> Screen {
        let status = self.status(schedule, now);

        let body = match mode {
            RenderMode::Fresh if current.is_empty() => Body::Message(NO_DATA_MESSAGE.to_string()),
            RenderMode::Fresh => {
                let rows = current
                    .iter()
                    .map(|record| self.row(record, previous.get(&record.slug)))
                    .collect::<Vec<_>>();
                self.cache = rows;
                self.table()
            }
            RenderMode::Repeat if self.cache.is_empty() => {
                Body::Message(NO_DATA_MESSAGE.to_string())
            }
            RenderMode::Repeat => self.table(),
            RenderMode::Error => Body::Message(ERROR_MESSAGE.to_string()),
        };

        Screen { status, body }
    }

    fn table(&self) -> Body {
        Body::Table {
            header: header(),
            rows: self.cache.clone(),
        }
    }

    fn is_requested(&self, symbol: &str) -> bool {
        self.requested
            .iter()
            .any(|requested| requested.eq_ignore_ascii_case(symbol))
    }

    fn row(&self, record: &AssetRecord, previous: Option<&AssetRecord>) -> CachedRow {
        let identity = if self.is_requested(&record.symbol) {
            Shade::Highlight
        } else {
            Shade::Default
        };

        let price_cell = |currency: Currency, column: &Column| {
            let price = record.quote(currency).price;
            let text = match currency {
                Currency::Btc => format::btc_price(price),
                Currency::Usd | Currency::Aud => format::fiat_price(price),
            };
            let previous = previous.map(|previous| previous.quote(currency).price);
            Cell::new(&text, shade::price(price, previous), column)
        };

        let change_cell = |change, column: &Column| {
            Cell::new(&format::percent(change), shade::percent_change(change), column)
        };

        let usd = record.usd();
        let previous_cap = previous.map(|previous| previous.usd().market_cap);

        CachedRow {
            slug: record.slug.clone(),
            cells: vec![
                Cell::new(&format::rank(record.rank), identity, &COLUMNS[0]),
                Cell::new(&record.name, identity, &COLUMNS[1]),
                Cell::new(&record.symbol, identity, &COLUMNS[2]),
                price_cell(Currency::Btc, &COLUMNS[3]),
                price_cell(Currency::Aud, &COLUMNS[4]),
                price_cell(Currency::Usd, &COLUMNS[5]),
                change_cell(usd.percent_change_1h, &COLUMNS[6]),
                change_cell(usd.percent_change_24h, &COLUMNS[7]),
                change_cell(usd.percent_change_7d, &COLUMNS[8]),
                Cell::new(
                    &format::market_cap(usd.market_cap),
                    shade::market_cap(usd.market_cap, previous_cap),
                    &COLUMNS[9],
                ),
            ],
        }
    }

    fn status(&self, schedule: &ScheduleState, now: DateTime<Utc>) -> Vec<String> {
        let time = |at: DateTime<Utc>| at.with_timezone(&self.offset).format(TIME_FORMAT);

        let next = match schedule.next_fetch {
            Some(next) => format!(
                "next update at {} (in {})",
                time(next),
                countdown(schedule.remaining(now))
            ),
            None => "next update pending".to_string(),
        };
        let (per_hour, per_day) = schedule.credit_rates(now);

        vec![
            format!("Monitor started at {}", time(schedule.started_at)),
            format!("Current time is {}, {next}", time(now)),
            format!(
                "Credits Used: {} ({per_hour:.2}/HR, {per_day:.2}/Day)",
                schedule.credits_used
            ),
        ]
    }
}

fn header() -> Vec<Cell> {
    COLUMNS
        .iter()
        .map(|column| Cell::new(column.title, Shade::Default, column))
        .collect()
}

/// `mm:ss`, minutes uncapped.
fn countdown(remaining: TimeDelta) -> String {
    let seconds = remaining.num_seconds().max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
