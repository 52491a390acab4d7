//! Per-request route dispatcher.
//!
//! Single pass, no retry: components are attempted in registration order and
//! the first structural+method match wins: strictly first-registered-wins,
//! no specificity ranking. A path hit under the wrong method short-circuits
//! to 405; no path hit goes to the not-found fallback (or the default 404
//! carrying the request's protocol version). A handler failure runs through
//! the recovery closure; without one it propagates to the caller.

use tracing::debug;

use super::request::ServerRequest;
use super::response::Response;
use super::route::{Component, MatchOutcome};

type NotFound = Box<dyn Fn(&ServerRequest) -> anyhow::Result<Response>>;
type Recover = Box<dyn Fn(&ServerRequest, anyhow::Error) -> anyhow::Result<Response>>;

pub(crate) struct Router {
    components: Vec<Component>,
    not_found: Option<NotFound>,
    recover: Recover,
}

impl Router {
    pub(crate) fn new(
        components: Vec<Component>,
        not_found: Option<NotFound>,
        recover: Recover,
    ) -> Self {
        Self {
            components,
            not_found,
            recover,
        }
    }

    pub(crate) fn dispatch(&self, request: &ServerRequest) -> anyhow::Result<Response> {
        let method = request.method();
        let path = request.path();
        let mut path_matched = false;

        for component in &self.components {
            match component.matches(method, path) {
                MatchOutcome::Matched(handler, variables) => {
                    debug!(%method, path, "route matched");
                    return match handler(request, &variables) {
                        Ok(response) => Ok(response),
                        Err(error) => (self.recover)(request, error),
                    };
                }
                MatchOutcome::WrongMethod => path_matched = true,
                MatchOutcome::NoMatch => {}
            }
        }

        if path_matched {
            debug!(%method, path, "path matched under another method");
            return Ok(Response::method_not_allowed(request.version()));
        }

        debug!(%method, path, "no route matched");
        match &self.not_found {
            Some(handle) => handle(request),
            None => Ok(Response::not_found(request.version())),
        }
    }
}
