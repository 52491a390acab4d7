//! # Middleware Module
//!
//! A middleware is a self-contained `Application -> Application`
//! transformation used to package reusable configuration bundles (routes,
//! services, environment layers) behind a single `app.map(...)` call.
//! Middleware carries no state of its own beyond what its closures capture.

mod dotenv;

use crate::app::Application;

pub use dotenv::LoadDotEnv;

/// Self-transformation hook applied through [`Application::map`].
pub trait Middleware {
    fn apply(&self, app: Application) -> Application;
}

impl<F> Middleware for F
where
    F: Fn(Application) -> Application,
{
    fn apply(&self, app: Application) -> Application {
        self(app)
    }
}

/// Conditionally-activated middleware.
///
/// The wrapped factory only runs when the gate is enabled; a disabled
/// `Conditional` is the identity transformation.
///
/// ```rust
/// use armature::{Application, Conditional, LoadDotEnv, OperatingSystem};
///
/// let debug = std::env::var_os("APP_DEBUG").is_some();
/// let app = Application::cli(OperatingSystem::native(), Vec::<(String, String)>::new())
///     .map(Conditional::when(debug, || LoadDotEnv::at("config/")));
/// # let _ = app;
/// ```
pub struct Conditional<F> {
    enabled: bool,
    factory: F,
}

impl<F, M> Conditional<F>
where
    F: Fn() -> M,
    M: Middleware,
{
    #[must_use]
    pub fn when(enabled: bool, factory: F) -> Self {
        Self { enabled, factory }
    }
}

impl<F, M> Middleware for Conditional<F>
where
    F: Fn() -> M,
    M: Middleware,
{
    fn apply(&self, app: Application) -> Application {
        if self.enabled {
            (self.factory)().apply(app)
        } else {
            app
        }
    }
}
