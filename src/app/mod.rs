//! # Application Module
//!
//! The immutable composition root. An [`Application`] is built by one of the
//! mode constructors ([`Application::cli`] / [`Application::http`]),
//! transformed through any number of builder calls (every one returning a
//! **new** value) and consumed by a terminal run operation.
//!
//! ## Mode polymorphism
//!
//! The two modes share one builder surface; mode-specific operations are
//! no-ops in the wrong mode, so middleware can configure commands and routes
//! unconditionally. Mode is a sum type dispatched by pattern matching, not an
//! inheritance hierarchy.
//!
//! ## Laziness
//!
//! Builder calls only accumulate closures. Environment/OS transforms run at
//! dispatch time in registration order (`f3(f2(f1(x)))`); the container is
//! assembled fresh per run (per request in HTTP mode); routes and commands
//! are materialized on demand.

mod cli;
mod http;

use std::rc::Rc;

use crate::cli::command::Command;
use crate::cli::Console;
use crate::container::{Container, ContainerBuilder, Resolver, Service};
use crate::environment::Environment;
use crate::http::{Component, Pipe, RequestHandler, Response, Routes, ServerRequest};
use crate::middleware::Middleware;
use crate::os::OperatingSystem;

pub(crate) use cli::CliApplication;
pub(crate) use http::HttpApplication;

/// One step of the interleaved `(OS, Environment)` transform chain.
pub(crate) enum Transform {
    Environment(Box<dyn Fn(Environment, &OperatingSystem) -> Environment>),
    OperatingSystem(Box<dyn Fn(OperatingSystem, &Environment) -> OperatingSystem>),
}

pub(crate) fn apply_transforms(
    transforms: &[Transform],
    os: OperatingSystem,
    env: Environment,
) -> (OperatingSystem, Environment) {
    transforms
        .iter()
        .fold((os, env), |(os, env), transform| match transform {
            Transform::Environment(map) => {
                let env = map(env, &os);
                (os, env)
            }
            Transform::OperatingSystem(map) => {
                let os = map(os, &env);
                (os, env)
            }
        })
}

/// Deferred service registration, executed against the builder at run time
/// with the fully-transformed OS and environment in hand.
pub(crate) type ServiceStep =
    Rc<dyn Fn(ContainerBuilder, &OperatingSystem, &Environment) -> ContainerBuilder>;

enum Mode {
    Cli(CliApplication),
    Http(HttpApplication),
}

/// Immutable application builder.
///
/// Safe to keep around as a template: HTTP mode rebuilds the environment and
/// container fresh for every request dispatched through it.
pub struct Application {
    mode: Mode,
}

impl Application {
    /// CLI-mode application seeded with the process environment variables.
    pub fn cli<K, V>(
        os: OperatingSystem,
        variables: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            mode: Mode::Cli(CliApplication::of(os, Environment::new(variables))),
        }
    }

    /// HTTP-mode application. The environment is rebuilt per request from the
    /// request's carried variables.
    #[must_use]
    pub fn http(os: OperatingSystem) -> Self {
        Self {
            mode: Mode::Http(HttpApplication::of(os)),
        }
    }

    /// Append an environment transform to the chain.
    #[must_use]
    pub fn map_environment(
        self,
        map: impl Fn(Environment, &OperatingSystem) -> Environment + 'static,
    ) -> Self {
        self.transform(Transform::Environment(Box::new(map)))
    }

    /// Append an operating-system transform to the chain.
    #[must_use]
    pub fn map_operating_system(
        self,
        map: impl Fn(OperatingSystem, &Environment) -> OperatingSystem + 'static,
    ) -> Self {
        self.transform(Transform::OperatingSystem(Box::new(map)))
    }

    fn transform(self, transform: Transform) -> Self {
        Self {
            mode: match self.mode {
                Mode::Cli(app) => Mode::Cli(app.transform(transform)),
                Mode::Http(app) => Mode::Http(app.transform(transform)),
            },
        }
    }

    /// Register (or overlay) a service definition.
    ///
    /// The factory runs at most once per run, on first resolution. A second
    /// registration for the same reference layers on top of the first; the
    /// overlay reads the previous product via [`Resolver::previous`].
    #[must_use]
    pub fn service<T: 'static>(
        self,
        service: Service<T>,
        definition: impl Fn(&Resolver<'_>, &OperatingSystem, &Environment) -> T + 'static,
    ) -> Self {
        let definition = Rc::new(definition);
        let step: ServiceStep = Rc::new(move |builder, os, env| {
            let definition = Rc::clone(&definition);
            let os = os.clone();
            let env = env.clone();
            builder.add(service, move |resolver| definition(resolver, &os, &env))
        });
        Self {
            mode: match self.mode {
                Mode::Cli(app) => Mode::Cli(app.service(step)),
                Mode::Http(app) => Mode::Http(app.service(step)),
            },
        }
    }

    /// Register a CLI command factory. No-op in HTTP mode.
    ///
    /// The factory is deferred: it only runs when this command's usage is
    /// probed during selection or when the command is executed, and at most
    /// once per invocation.
    #[must_use]
    pub fn command(
        self,
        command: impl Fn(&Container, &OperatingSystem, &Environment) -> anyhow::Result<Box<dyn Command>>
            + 'static,
    ) -> Self {
        match self.mode {
            Mode::Cli(app) => Self {
                mode: Mode::Cli(app.command(Rc::new(command))),
            },
            other @ Mode::Http(_) => Self { mode: other },
        }
    }

    /// Append a command decorator, applied exactly once to the selected
    /// command at execution time. No-op in HTTP mode.
    #[must_use]
    pub fn map_command(
        self,
        map: impl Fn(Rc<dyn Command>, &Container, &OperatingSystem, &Environment) -> Rc<dyn Command>
            + 'static,
    ) -> Self {
        match self.mode {
            Mode::Cli(app) => Self {
                mode: Mode::Cli(app.map_command(Rc::new(map))),
            },
            other @ Mode::Http(_) => Self { mode: other },
        }
    }

    /// Register a route provider. No-op in CLI mode.
    ///
    /// The provider runs once per request, after the container is built.
    #[must_use]
    pub fn route(
        self,
        route: impl Fn(&Pipe, &Container, &OperatingSystem, &Environment) -> Component + 'static,
    ) -> Self {
        self.append_routes(move |routes, pipe, container, os, env| {
            routes.add(route(pipe, container, os, env))
        })
    }

    /// Register a provider contributing several routes at once. No-op in CLI
    /// mode.
    #[must_use]
    pub fn append_routes(
        self,
        append: impl Fn(Routes, &Pipe, &Container, &OperatingSystem, &Environment) -> Routes + 'static,
    ) -> Self {
        match self.mode {
            Mode::Http(app) => Self {
                mode: Mode::Http(app.append_routes(Rc::new(append))),
            },
            other @ Mode::Cli(_) => Self { mode: other },
        }
    }

    /// Append a route decorator, applied to every materialized component.
    /// No-op in CLI mode.
    #[must_use]
    pub fn map_route(
        self,
        map: impl Fn(Component, &Container) -> Component + 'static,
    ) -> Self {
        match self.mode {
            Mode::Http(app) => Self {
                mode: Mode::Http(app.map_route(Rc::new(map))),
            },
            other @ Mode::Cli(_) => Self { mode: other },
        }
    }

    /// Replace the default 404 for requests whose path matches no route.
    /// No-op in CLI mode.
    #[must_use]
    pub fn not_found_request_handler(
        self,
        handle: impl Fn(&ServerRequest, &Container, &OperatingSystem, &Environment) -> anyhow::Result<Response>
            + 'static,
    ) -> Self {
        match self.mode {
            Mode::Http(app) => Self {
                mode: Mode::Http(app.not_found(Rc::new(handle))),
            },
            other @ Mode::Cli(_) => Self { mode: other },
        }
    }

    /// Append a recovery hook for route handler failures. Hooks are tried in
    /// registration order; each sees the latest failure. No-op in CLI mode.
    #[must_use]
    pub fn recover_route_error(
        self,
        recover: impl Fn(&ServerRequest, &anyhow::Error, &Container) -> anyhow::Result<Response>
            + 'static,
    ) -> Self {
        match self.mode {
            Mode::Http(app) => Self {
                mode: Mode::Http(app.recover(Rc::new(recover))),
            },
            other @ Mode::Cli(_) => Self { mode: other },
        }
    }

    /// Append a decorator wrapping the whole resolved request handler (e.g.
    /// to rewrite headers). No-op in CLI mode.
    #[must_use]
    pub fn map_request_handler(
        self,
        map: impl Fn(RequestHandler, &Container, &OperatingSystem, &Environment) -> RequestHandler
            + 'static,
    ) -> Self {
        match self.mode {
            Mode::Http(app) => Self {
                mode: Mode::Http(app.map_request_handler(Rc::new(map))),
            },
            other @ Mode::Cli(_) => Self { mode: other },
        }
    }

    /// Apply a middleware: `middleware(self) -> Application`.
    #[must_use]
    pub fn map(self, middleware: impl Middleware) -> Self {
        middleware.apply(self)
    }

    /// Terminal CLI dispatch.
    ///
    /// # Panics
    ///
    /// Panics when called on an HTTP-mode application (programmer error).
    pub fn run_cli(&self, console: Console) -> anyhow::Result<Console> {
        match &self.mode {
            Mode::Cli(app) => app.run(console),
            Mode::Http(_) => panic!("run_cli called on an HTTP application"),
        }
    }

    /// Terminal HTTP dispatch for one request. The application value is a
    /// reusable template; every call gets a fresh environment and container.
    ///
    /// # Panics
    ///
    /// Panics when called on a CLI-mode application (programmer error).
    pub fn run_http(&self, request: &ServerRequest) -> anyhow::Result<Response> {
        match &self.mode {
            Mode::Http(app) => app.run(request),
            Mode::Cli(_) => panic!("run_http called on a CLI application"),
        }
    }
}
