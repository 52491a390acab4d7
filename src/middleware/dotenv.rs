//! `.env` loading middleware.
//!
//! Reads `<folder>/.env` through the OS filesystem facade and layers the
//! parsed variables onto the environment. File format: UTF-8 text, one
//! `KEY=VALUE` pair per line; each line is trimmed before parsing; blank
//! lines, `#` comment lines and lines without `=` are ignored; the value is
//! everything after the first `=`, so values may themselves contain `=`.
//! A missing file leaves the environment untouched.

use std::path::PathBuf;

use tracing::debug;

use crate::app::Application;
use crate::environment::Environment;

use super::Middleware;

pub struct LoadDotEnv {
    folder: PathBuf,
}

impl LoadDotEnv {
    /// Load `.env` from the given folder.
    #[must_use]
    pub fn at(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }
}

impl Middleware for LoadDotEnv {
    fn apply(&self, app: Application) -> Application {
        let path = self.folder.join(".env");
        app.map_environment(move |env, os| match os.filesystem().read_to_string(&path) {
            Ok(content) => parse(env, &content),
            Err(_) => {
                debug!(path = %path.display(), "no .env file, environment unchanged");
                env
            }
        })
    }
}

fn parse(env: Environment, content: &str) -> Environment {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .fold(env, |env, (key, value)| env.with(key, value))
}
