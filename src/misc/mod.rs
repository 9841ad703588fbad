/// Mutex which doesn't return poisoned lock
mod nice_mutex;
/// Relative-path arithmetic and module-specifier rendering
pub mod rel_path;

pub use nice_mutex::NiceMutex;
