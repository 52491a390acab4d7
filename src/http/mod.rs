//! # HTTP Module
//!
//! Request pipeline building blocks: the [`ServerRequest`] / [`Response`]
//! value types, the [`Pipe`] route-construction DSL producing composable
//! [`Component`]s, and the per-request router.
//!
//! ## Dispatch
//!
//! Route templates (e.g. `/pets/{id}`) are compiled into anchored regexes
//! with one named capture per `{placeholder}`. A request is matched against
//! components in registration order; the first structural+method match wins,
//! with no specificity ranking. A path that matches under a different method
//! yields `405 Method Not Allowed`, distinct from `404 Not Found`.

pub mod request;
pub mod response;
pub mod route;
pub(crate) mod router;

pub use request::ServerRequest;
pub use response::Response;
pub use route::{Component, PathVariables, Pipe, Routes};

/// Handler wrapping the whole resolved per-request pipeline.
///
/// `map_request_handler` decorators receive and return this type.
pub type RequestHandler = Box<dyn Fn(&ServerRequest) -> anyhow::Result<Response>>;
