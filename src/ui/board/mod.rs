//! Single-screen to-do board: header, input line, counters and the task list.

pub mod app;
pub mod editor;
pub mod view;

pub use app::run;
