pub mod args;
pub mod commands;
pub mod terminal;

pub use args::Args;
pub use commands::{StorefrontApp, FAREWELL};
pub use terminal::{ConsoleTerminal, Terminal, TerminalError};
