/// Diagnostic datatypes and the per-run collector
mod data;
/// Logger handles and the `error!`/`warning!`/`info!`/`debug!` macros
mod logging;

pub use data::*;
pub use logging::*;
