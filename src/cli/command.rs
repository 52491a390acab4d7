//! Commands, usages and the deferred descriptor.

use std::fmt;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use tracing::warn;

use crate::container::Container;
use crate::environment::Environment;
use crate::os::OperatingSystem;

use super::console::Console;

/// A command's declared invocation signature.
///
/// The first whitespace-separated word is the name matched against the first
/// CLI argument during dispatch; the rest is free-form description shown in
/// usage listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Usage(String);

impl Usage {
    pub fn new(usage: impl Into<String>) -> Self {
        Self(usage.into())
    }

    /// The dispatch name: everything up to the first whitespace.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.split_whitespace().next().unwrap_or("")
    }

    /// Whether the invoked argument selects this usage.
    #[must_use]
    pub fn matches(&self, argument: &str) -> bool {
        !self.name().is_empty() && self.name() == argument
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability implemented by CLI commands.
pub trait Command {
    fn usage(&self) -> Usage;

    /// Execute against the console, returning the updated console state.
    fn run(&self, console: Console) -> anyhow::Result<Console>;
}

pub(crate) type CommandFactory =
    Rc<dyn Fn(&Container, &OperatingSystem, &Environment) -> anyhow::Result<Box<dyn Command>>>;

/// Deferred command descriptor.
///
/// Construction runs at most once per invocation: the once-cell keeps either
/// the built command or the construction failure, so probing the same
/// descriptor again during selection reuses the first attempt. A failure is
/// logged once, when the first build attempt happens; the caller decides
/// whether to surface it (it does when the descriptor is the one that should
/// run).
pub(crate) struct Defer {
    build: CommandFactory,
    container: Container,
    os: OperatingSystem,
    env: Environment,
    built: OnceCell<Result<Rc<dyn Command>, String>>,
}

impl Defer {
    pub(crate) fn new(
        build: CommandFactory,
        container: Container,
        os: OperatingSystem,
        env: Environment,
    ) -> Self {
        Self {
            build,
            container,
            os,
            env,
            built: OnceCell::new(),
        }
    }

    /// Build (memoized) and return the command, or the stringified
    /// construction failure. A failure is logged here, once, no matter how
    /// often the descriptor is probed afterwards.
    pub(crate) fn command(&self) -> Result<Rc<dyn Command>, String> {
        self.built
            .get_or_init(|| {
                (self.build)(&self.container, &self.os, &self.env)
                    .map(Rc::from)
                    .map_err(|e| {
                        let error = format!("{e:#}");
                        warn!(%error, "command construction failed");
                        error
                    })
            })
            .clone()
    }

    /// Usage of the underlying command, building it if needed. `None` when
    /// construction failed.
    pub(crate) fn usage(&self) -> Option<Usage> {
        self.command().ok().map(|command| command.usage())
    }
}
