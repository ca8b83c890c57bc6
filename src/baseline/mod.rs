pub mod command;
pub mod error;

pub use command::BaselineCommand;
pub use error::{BaselineError, BaselineResult};
