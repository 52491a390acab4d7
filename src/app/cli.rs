//! CLI-mode implementation behind [`Application`](super::Application).

use std::rc::Rc;

use crate::cli::command::{CommandFactory, Defer};
use crate::cli::dispatch::{dispatch, MapCommand};
use crate::cli::Console;
use crate::container::ContainerBuilder;
use crate::environment::Environment;
use crate::os::OperatingSystem;

use super::{apply_transforms, ServiceStep, Transform};

pub(crate) struct CliApplication {
    os: OperatingSystem,
    env: Environment,
    transforms: Vec<Transform>,
    services: Vec<ServiceStep>,
    commands: Vec<CommandFactory>,
    map_command: Vec<MapCommand>,
}

impl CliApplication {
    pub(crate) fn of(os: OperatingSystem, env: Environment) -> Self {
        Self {
            os,
            env,
            transforms: Vec::new(),
            services: Vec::new(),
            commands: Vec::new(),
            map_command: Vec::new(),
        }
    }

    pub(crate) fn transform(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    pub(crate) fn service(mut self, step: ServiceStep) -> Self {
        self.services.push(step);
        self
    }

    pub(crate) fn command(mut self, factory: CommandFactory) -> Self {
        self.commands.push(factory);
        self
    }

    pub(crate) fn map_command(mut self, map: MapCommand) -> Self {
        self.map_command.push(map);
        self
    }

    /// One CLI invocation: thread the transform chain, build the container,
    /// wrap every registered factory in a deferred descriptor and dispatch.
    pub(crate) fn run(&self, console: Console) -> anyhow::Result<Console> {
        let (os, env) = apply_transforms(&self.transforms, self.os.clone(), self.env.clone());
        let container = self
            .services
            .iter()
            .fold(ContainerBuilder::new(), |builder, step| {
                step(builder, &os, &env)
            })
            .build();
        let descriptors: Vec<Defer> = self
            .commands
            .iter()
            .map(|factory| {
                Defer::new(
                    Rc::clone(factory),
                    container.clone(),
                    os.clone(),
                    env.clone(),
                )
            })
            .collect();

        dispatch(
            &descriptors,
            &self.map_command,
            &container,
            &os,
            &env,
            console,
        )
    }
}
