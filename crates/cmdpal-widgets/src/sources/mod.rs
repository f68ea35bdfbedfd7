#![forbid(unsafe_code)]

//! Concrete item sources.

pub mod action_list;
pub mod file_system;
pub mod string_list;

pub use action_list::ActionListSource;
pub use file_system::FileSystemSource;
pub use string_list::StringListSource;
