pub mod termination;
pub mod walk;

pub use termination::is_terminated;
pub use walk::{CheckFailure, TreeWalker, WalkStats};
