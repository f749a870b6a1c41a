pub mod executor;

pub use crate::events::AppCommand;
