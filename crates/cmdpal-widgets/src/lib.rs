#![forbid(unsafe_code)]

//! Command palette widgets.
//!
//! - [`source`]: the read-only [`ItemSource`] contract a palette filters.
//! - [`sources`]: string list, filesystem, and action list sources.
//! - [`filter`]: case-insensitive substring filtering into a mapping of
//!   source indices.
//! - [`selection`]: wrap-around selection over the filtered list.
//! - [`layout`]: overlay visibility and geometry.
//! - [`command_palette`]: the palette itself.
//! - [`actions`]: host action graphs and their aggregation into one list.

pub mod actions;
pub mod command_palette;
pub mod filter;
pub mod layout;
pub mod selection;
pub mod source;
pub mod sources;

pub use actions::{Action, ActionFlags, ActionGraph, ActionId, aggregate};
pub use command_palette::{Chosen, CommandPalette, VisibleRow};
pub use filter::FilterState;
pub use layout::{PaletteLayout, PaletteMetrics};
pub use selection::{Selection, SelectionController};
pub use source::{Entry, IconRef, ItemSource, Payload, Scope, SourceError, SourceId};
pub use sources::{ActionListSource, FileSystemSource, StringListSource};
