#![forbid(unsafe_code)]

//! Core: input events, geometry, key bindings, text helpers, and the
//! terminal session guard used by cmdpal hosts.

pub mod event;
pub mod geometry;
pub mod keybinding;
pub mod logging;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal_session;
pub mod text;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, info_span, trace, warn};
