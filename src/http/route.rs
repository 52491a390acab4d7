//! Route components and the `Pipe` construction DSL.
//!
//! A [`Component`] pairs method+path matchers with handlers and composes via
//! [`Component::or`]. Path templates use `{name}` placeholders compiled into
//! anchored regexes with one named capture per placeholder; everything else
//! in the template is matched literally.
//!
//! Components are declared through closures held by the application builder,
//! so nothing here is constructed before a request is actually dispatched.

use std::rc::Rc;

use ::http::Method;
use regex::Regex;

use super::request::ServerRequest;
use super::response::Response;

/// Path parameters extracted from a matched template.
#[derive(Debug, Clone, Default)]
pub struct PathVariables(Vec<(String, String)>);

impl PathVariables {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

type Handler = Rc<dyn Fn(&ServerRequest, &PathVariables) -> anyhow::Result<Response>>;

struct Endpoint {
    method: Method,
    pattern: Regex,
    names: Vec<String>,
    handler: Handler,
}

/// Outcome of probing one component against a request.
pub(crate) enum MatchOutcome {
    /// Structural and method match; holds the bound handler invocation data.
    Matched(Handler, PathVariables),
    /// The path matched some endpoint, but under a different method.
    WrongMethod,
    NoMatch,
}

/// Composable unit pairing method+path matchers with handlers.
pub struct Component {
    endpoints: Vec<Endpoint>,
}

impl Component {
    /// Branch: try `self`'s endpoints first, then `other`'s.
    #[must_use]
    pub fn or(mut self, other: Component) -> Component {
        self.endpoints.extend(other.endpoints);
        self
    }

    pub(crate) fn matches(&self, method: &Method, path: &str) -> MatchOutcome {
        let mut path_matched = false;
        for endpoint in &self.endpoints {
            let Some(captures) = endpoint.pattern.captures(path) else {
                continue;
            };
            if endpoint.method != *method {
                path_matched = true;
                continue;
            }
            let variables = PathVariables(
                endpoint
                    .names
                    .iter()
                    .filter_map(|name| {
                        captures
                            .name(name)
                            .map(|m| (name.clone(), m.as_str().to_owned()))
                    })
                    .collect(),
            );
            return MatchOutcome::Matched(Rc::clone(&endpoint.handler), variables);
        }
        if path_matched {
            MatchOutcome::WrongMethod
        } else {
            MatchOutcome::NoMatch
        }
    }
}

/// Ordered collection of components, for `append_routes` providers.
#[derive(Default)]
pub struct Routes {
    components: Vec<Component>,
}

impl Routes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub(crate) fn into_components(self) -> Vec<Component> {
        self.components
    }
}

/// Route-construction DSL handed to route providers.
///
/// ```rust
/// use armature::http::{Pipe, Response};
/// use http::StatusCode;
///
/// let pipe = Pipe::new();
/// let component = pipe
///     .get("/pets/{id}")
///     .handle(|_request, variables| {
///         Ok(Response::text(
///             StatusCode::OK,
///             variables.get("id").unwrap_or_default(),
///         ))
///     });
/// # let _ = component;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipe;

macro_rules! pipe_method {
    ($name:ident, $method:expr) => {
        #[must_use]
        pub fn $name(&self, template: &str) -> EndpointBuilder {
            EndpointBuilder::new($method, template)
        }
    };
}

impl Pipe {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    pipe_method!(get, Method::GET);
    pipe_method!(post, Method::POST);
    pipe_method!(put, Method::PUT);
    pipe_method!(patch, Method::PATCH);
    pipe_method!(delete, Method::DELETE);
    pipe_method!(head, Method::HEAD);
    pipe_method!(options, Method::OPTIONS);
    pipe_method!(trace, Method::TRACE);
    pipe_method!(connect, Method::CONNECT);
}

/// Builder produced by the [`Pipe`] method constructors; terminated by
/// [`EndpointBuilder::handle`].
pub struct EndpointBuilder {
    method: Method,
    template: String,
}

impl EndpointBuilder {
    fn new(method: Method, template: &str) -> Self {
        Self {
            method,
            template: template.to_owned(),
        }
    }

    /// Bind a handler, yielding a single-endpoint component.
    ///
    /// # Panics
    ///
    /// Panics if the template does not compile (a malformed placeholder name,
    /// for example); an invalid route declaration is a programmer error.
    #[must_use]
    pub fn handle(
        self,
        handler: impl Fn(&ServerRequest, &PathVariables) -> anyhow::Result<Response> + 'static,
    ) -> Component {
        let (pattern, names) = compile_template(&self.template);
        Component {
            endpoints: vec![Endpoint {
                method: self.method,
                pattern,
                names,
                handler: Rc::new(handler),
            }],
        }
    }
}

/// Compile a `{name}` template into an anchored regex plus its capture names.
fn compile_template(template: &str) -> (Regex, Vec<String>) {
    let mut pattern = String::from("^");
    let mut names = Vec::new();
    for segment in template.split('/') {
        if segment.is_empty() {
            continue;
        }
        pattern.push('/');
        if let Some(name) = segment
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        {
            pattern.push_str(&format!("(?P<{name}>[^/]+)"));
            names.push(name.to_owned());
        } else {
            pattern.push_str(&regex::escape(segment));
        }
    }
    if template == "/" || template.is_empty() {
        pattern.push('/');
    }
    pattern.push('$');
    let regex = Regex::new(&pattern)
        .unwrap_or_else(|e| panic!("invalid route template `{template}`: {e}"));
    (regex, names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::http::StatusCode;

    fn ok_component(method: Method, template: &str) -> Component {
        EndpointBuilder::new(method, template)
            .handle(|_, _| Ok(Response::new(StatusCode::OK)))
    }

    #[test]
    fn literal_template_matches_exactly() {
        let component = ok_component(Method::GET, "/foo");
        assert!(matches!(
            component.matches(&Method::GET, "/foo"),
            MatchOutcome::Matched(..)
        ));
        assert!(matches!(
            component.matches(&Method::GET, "/foo/bar"),
            MatchOutcome::NoMatch
        ));
        assert!(matches!(
            component.matches(&Method::GET, "/foobar"),
            MatchOutcome::NoMatch
        ));
    }

    #[test]
    fn placeholders_capture_path_variables() {
        let component = ok_component(Method::GET, "/pets/{id}/toys/{toy}");
        match component.matches(&Method::GET, "/pets/42/toys/ball") {
            MatchOutcome::Matched(_, variables) => {
                assert_eq!(variables.get("id"), Some("42"));
                assert_eq!(variables.get("toy"), Some("ball"));
            }
            _ => panic!("expected a match"),
        }
    }

    #[test]
    fn wrong_method_is_distinct_from_no_match() {
        let component = ok_component(Method::GET, "/foo");
        assert!(matches!(
            component.matches(&Method::HEAD, "/foo"),
            MatchOutcome::WrongMethod
        ));
        assert!(matches!(
            component.matches(&Method::HEAD, "/bar"),
            MatchOutcome::NoMatch
        ));
    }

    #[test]
    fn or_tries_the_left_branch_first() {
        let component = EndpointBuilder::new(Method::GET, "/x")
            .handle(|_, _| Ok(Response::text(StatusCode::OK, "left")))
            .or(EndpointBuilder::new(Method::GET, "/x")
                .handle(|_, _| Ok(Response::text(StatusCode::OK, "right"))));
        match component.matches(&Method::GET, "/x") {
            MatchOutcome::Matched(handler, variables) => {
                let request = ServerRequest::new(Method::GET, "/x");
                let response = handler(&request, &variables).unwrap();
                assert_eq!(response.body(), b"left");
            }
            _ => panic!("expected a match"),
        }
    }

    #[test]
    fn root_template_matches_the_root_path() {
        let component = ok_component(Method::GET, "/");
        assert!(matches!(
            component.matches(&Method::GET, "/"),
            MatchOutcome::Matched(..)
        ));
    }
}
