//! # Armature
//!
//! **Armature** is an application-bootstrapping framework built around a single
//! immutable builder, [`Application`]. It wires together an operating-system
//! facade, a typed environment store, a lazy dependency-injection container and
//! either an HTTP request pipeline or a CLI command dispatcher, all declared
//! through pure, functional composition with no global mutable state.
//!
//! ## Overview
//!
//! Every builder call returns a **new** `Application`; nothing is mutated in
//! place. Configuration accumulates as closures and is only executed by the
//! terminal `run` operations:
//!
//! - services are constructed lazily, memoized per run, and never built when
//!   nothing resolves them;
//! - CLI commands are deferred behind a once-cell and only constructed when
//!   their usage is probed or they are selected;
//! - HTTP routes are materialized per request from provider closures, matched
//!   first-registered-wins, with a not-found fallback and error recovery.
//!
//! ## Architecture
//!
//! - **[`environment`]** - immutable key/value configuration store
//! - **[`container`]** - typed service references and the memoized container
//! - **[`os`]** - filesystem/clock facade threaded through every factory
//! - **[`http`]** - request/response types, route components and the
//!   per-request router
//! - **[`cli`]** - console abstraction, commands and usage-based dispatch
//! - **[`app`]** - the immutable `Application` builder gluing it all together
//! - **[`middleware`]** - reusable `Application -> Application` bundles
//! - **[`bootstrap`]** - process entry points and tracing setup
//!
//! ## Example
//!
//! ```rust
//! use armature::{Application, OperatingSystem};
//! use armature::cli::Console;
//!
//! let app = Application::cli(
//!     OperatingSystem::native(),
//!     Vec::<(String, String)>::new(),
//! );
//! let console = Console::in_memory(
//!     ["bin"],
//!     false,
//!     Vec::<String>::new(),
//!     Vec::<(String, String)>::new(),
//! );
//! let console = app.run_cli(console).unwrap();
//! assert_eq!(console.outputs(), ["Hello world\n"]);
//! ```
//!
//! ## Concurrency model
//!
//! A single dispatch is synchronous and single-threaded; containers are
//! run-scoped (fresh per HTTP request, one per CLI invocation) and never
//! shared. The `Application` value itself is an immutable template that can be
//! reused across any number of requests.

pub mod app;
pub mod bootstrap;
pub mod cli;
pub mod container;
pub mod environment;
pub mod http;
pub mod middleware;
pub mod os;

pub use app::Application;
pub use container::{Container, ContainerBuilder, Resolver, Service};
pub use environment::{Environment, UnknownVariable};
pub use middleware::{Conditional, LoadDotEnv, Middleware};
pub use os::OperatingSystem;
