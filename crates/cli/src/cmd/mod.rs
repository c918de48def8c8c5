mod recipe;
mod snapshots;
mod verify;

pub use recipe::cmd_recipe;
pub use snapshots::{cmd_snapshots, parse_timestamp};
pub use verify::{SetArg, cmd_verify};
