//! HTTP-mode implementation behind [`Application`](super::Application).

use std::rc::Rc;

use crate::container::{Container, ContainerBuilder};
use crate::environment::Environment;
use crate::http::router::Router;
use crate::http::{Component, Pipe, RequestHandler, Response, Routes, ServerRequest};
use crate::os::OperatingSystem;

use super::{apply_transforms, ServiceStep, Transform};

type RouteProvider =
    Rc<dyn Fn(Routes, &Pipe, &Container, &OperatingSystem, &Environment) -> Routes>;
type MapRoute = Rc<dyn Fn(Component, &Container) -> Component>;
type NotFound = Rc<
    dyn Fn(&ServerRequest, &Container, &OperatingSystem, &Environment) -> anyhow::Result<Response>,
>;
type RecoverHook =
    Rc<dyn Fn(&ServerRequest, &anyhow::Error, &Container) -> anyhow::Result<Response>>;
type MapRequestHandler =
    Rc<dyn Fn(RequestHandler, &Container, &OperatingSystem, &Environment) -> RequestHandler>;

pub(crate) struct HttpApplication {
    os: OperatingSystem,
    transforms: Vec<Transform>,
    services: Vec<ServiceStep>,
    routes: Vec<RouteProvider>,
    map_route: Vec<MapRoute>,
    not_found: Option<NotFound>,
    recover: Vec<RecoverHook>,
    map_request_handler: Vec<MapRequestHandler>,
}

impl HttpApplication {
    pub(crate) fn of(os: OperatingSystem) -> Self {
        Self {
            os,
            transforms: Vec::new(),
            services: Vec::new(),
            routes: Vec::new(),
            map_route: Vec::new(),
            not_found: None,
            recover: Vec::new(),
            map_request_handler: Vec::new(),
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

    pub(crate) fn append_routes(mut self, provider: RouteProvider) -> Self {
        self.routes.push(provider);
        self
    }

    pub(crate) fn map_route(mut self, map: MapRoute) -> Self {
        self.map_route.push(map);
        self
    }

    pub(crate) fn not_found(mut self, handle: NotFound) -> Self {
        self.not_found = Some(handle);
        self
    }

    pub(crate) fn recover(mut self, hook: RecoverHook) -> Self {
        self.recover.push(hook);
        self
    }

    pub(crate) fn map_request_handler(mut self, map: MapRequestHandler) -> Self {
        self.map_request_handler.push(map);
        self
    }

    /// One request cycle: environment from the request, transform chain,
    /// fresh request-scoped container, routes materialized and decorated,
    /// then match / fallback / recover behind the request-handler chain.
    pub(crate) fn run(&self, request: &ServerRequest) -> anyhow::Result<Response> {
        let env = Environment::from_request(request);
        let (os, env) = apply_transforms(&self.transforms, self.os.clone(), env);
        let container = self
            .services
            .iter()
            .fold(ContainerBuilder::new(), |builder, step| {
                step(builder, &os, &env)
            })
            .build();

        let pipe = Pipe::new();
        let components: Vec<Component> = self
            .routes
            .iter()
            .fold(Routes::new(), |routes, provider| {
                provider(routes, &pipe, &container, &os, &env)
            })
            .into_components()
            .into_iter()
            .map(|component| {
                self.map_route
                    .iter()
                    .fold(component, |component, map| map(component, &container))
            })
            .collect();

        let not_found = self.not_found.as_ref().map(|handle| {
            let handle = Rc::clone(handle);
            let container = container.clone();
            let os = os.clone();
            let env = env.clone();
            Box::new(move |request: &ServerRequest| handle(request, &container, &os, &env))
                as Box<dyn Fn(&ServerRequest) -> anyhow::Result<Response>>
        });

        let hooks = self.recover.clone();
        let recover_scope = container.clone();
        let recover = Box::new(move |request: &ServerRequest, error: anyhow::Error| {
            hooks.iter().fold(Err(error), |outcome, hook| match outcome {
                Ok(response) => Ok(response),
                Err(error) => hook(request, &error, &recover_scope),
            })
        }) as Box<dyn Fn(&ServerRequest, anyhow::Error) -> anyhow::Result<Response>>;

        let router = Router::new(components, not_found, recover);
        let handler: RequestHandler = Box::new(move |request| router.dispatch(request));
        let handler = self
            .map_request_handler
            .iter()
            .fold(handler, |handler, map| map(handler, &container, &os, &env));

        handler(request)
    }
}
