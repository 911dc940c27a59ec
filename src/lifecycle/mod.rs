//! Process lifecycle.
//!
//! ```text
//! run (startup.rs)
//!     validate config → compile routes + client → metrics (optional)
//!     → bind listener → serve
//!
//! SIGINT / SIGTERM (signals.rs)
//!     → Shutdown::trigger (shutdown.rs)
//!     → listener closed, open connections drained, run returns
//! ```
//!
//! Routes are fixed for the lifetime of the process. There is no reload.

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{run, StartupError};
