mod actions;
mod core;
mod pointer;

pub use self::core::{ActiveStroke, DrawingSession, DrawingState, HistoryMove};
