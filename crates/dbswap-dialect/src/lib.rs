//! Per-dialect platform facts: identifier quoting, type spellings, reserved
//! words and capability flags for MySQL, PostgreSQL and SQLite.
//!
//! Everything here is a pure value — no connection, no I/O. The transformer
//! and renderer both take a source and/or target [`Platform`] as a plain
//! argument.

pub mod capability;
pub mod dialect;
pub mod platform;
pub mod reserved;
pub mod spelling;

pub use capability::Capabilities;
pub use dialect::Dialect;
pub use platform::Platform;
pub use spelling::TypeShape;
