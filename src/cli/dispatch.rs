//! Usage-based command selection.
//!
//! Descriptors are probed in registration order; everything past the first
//! match is never constructed. The decorator chain is applied exactly once,
//! at execution time, so candidates that were only tried-and-rejected during
//! matching never see a decorator.

use std::rc::Rc;

use anyhow::anyhow;
use tracing::debug;

use crate::container::Container;
use crate::environment::Environment;
use crate::os::OperatingSystem;

use super::command::{Command, Defer};
use super::console::Console;

/// Exit code for a missing or unmatched command argument (EX_USAGE).
const EXIT_USAGE: i32 = 64;

pub(crate) type MapCommand =
    Rc<dyn Fn(Rc<dyn Command>, &Container, &OperatingSystem, &Environment) -> Rc<dyn Command>>;

pub(crate) fn dispatch(
    descriptors: &[Defer],
    decorators: &[MapCommand],
    container: &Container,
    os: &OperatingSystem,
    env: &Environment,
    console: Console,
) -> anyhow::Result<Console> {
    if descriptors.is_empty() {
        return Ok(console.output("Hello world\n"));
    }

    let selected = if let [only] = descriptors {
        // a sole command runs unconditionally; its construction failure is
        // the run's failure, not a skipped candidate
        only.command().map_err(|error| anyhow!(error))?
    } else {
        match select(descriptors, console.command_argument()) {
            Some(command) => command,
            None => return Ok(list_usages(descriptors, console).exit(EXIT_USAGE)),
        }
    };

    let command = decorators.iter().fold(selected, |command, decorate| {
        decorate(command, container, os, env)
    });
    debug!(usage = %command.usage(), "running command");
    command.run(console)
}

fn select(descriptors: &[Defer], argument: Option<&str>) -> Option<Rc<dyn Command>> {
    let argument = argument?;
    for descriptor in descriptors {
        // a probe that fails construction is skipped (and logged by the
        // descriptor); remaining candidates still get a chance
        let Some(usage) = descriptor.usage() else {
            continue;
        };
        if usage.matches(argument) {
            debug!(%usage, "command selected");
            return descriptor.command().ok();
        }
    }
    None
}

fn list_usages(descriptors: &[Defer], console: Console) -> Console {
    descriptors
        .iter()
        .filter_map(Defer::usage)
        .fold(console, |console, usage| {
            console.error(format!("{usage}\n"))
        })
}
