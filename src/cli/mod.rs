//! # CLI Module
//!
//! Console abstraction and usage-based command dispatch.
//!
//! Commands are registered as fallible factories and wrapped in a deferred,
//! memoized descriptor: a command is only constructed when its usage is
//! probed during selection or when it is the one that runs, and a descriptor
//! built once is never rebuilt within the same invocation.

pub mod command;
pub mod console;
pub(crate) mod dispatch;

pub use command::{Command, Usage};
pub use console::Console;
