/// Coinwatch terminal monitor - shared library
///
/// The `coinwatch` binary polls CoinMarketCap through `coinwatch-data` and renders a colour-coded,
/// auto-refreshing table. This library holds everything but the event loop:
/// - Configuration from the environment
/// - File logging setup
/// - Table formatting, shading and row caching
/// - The tick scheduler and the ratatui adapter
pub mod config;
pub mod logging;
pub mod scheduler;
pub mod table;
pub mod terminal;

pub use config::Config;
pub use scheduler::{Scheduler, TICK_RATE};
pub use table::{Body, RenderMode, Screen, TableRenderer};
