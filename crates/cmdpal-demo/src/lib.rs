#![forbid(unsafe_code)]

//! Demo host for the cmdpal command palette.

pub mod app;
pub mod canvas;
pub mod cli;
pub mod logging;
pub mod view;
