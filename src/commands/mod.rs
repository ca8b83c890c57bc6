pub mod baseline;
pub mod status;

pub use baseline::cmd_baseline;
pub use status::{StatusFormat, cmd_status};
