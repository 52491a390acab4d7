//! # Operating-system Facade
//!
//! The framework never touches the filesystem or the clock directly; it
//! threads an [`OperatingSystem`] handle through every environment transform,
//! service factory, command and route provider. The handle is a cheap-clone
//! bundle of trait objects so tests can swap the real world for an in-memory
//! one.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;

/// Filesystem access as the framework needs it.
pub trait Filesystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Clock access.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

struct NativeFilesystem;

impl Filesystem for NativeFilesystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Preloaded path→content filesystem for tests.
pub struct InMemoryFilesystem {
    files: HashMap<PathBuf, String>,
}

impl InMemoryFilesystem {
    pub fn new<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<PathBuf>,
        C: Into<String>,
    {
        Self {
            files: files
                .into_iter()
                .map(|(p, c)| (p.into(), c.into()))
                .collect(),
        }
    }
}

impl Filesystem for InMemoryFilesystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
        })
    }
}

/// Fixed-instant clock for tests.
pub struct FixedClock(pub SystemTime);

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        self.0
    }
}

/// Facade over the process's operating system.
#[derive(Clone)]
pub struct OperatingSystem {
    filesystem: Rc<dyn Filesystem>,
    clock: Rc<dyn Clock>,
}

impl OperatingSystem {
    /// The real filesystem and clock.
    #[must_use]
    pub fn native() -> Self {
        Self {
            filesystem: Rc::new(NativeFilesystem),
            clock: Rc::new(SystemClock),
        }
    }

    /// An in-memory filesystem (preloaded files) and a fixed clock.
    #[must_use]
    pub fn in_memory<P, C>(files: impl IntoIterator<Item = (P, C)>, now: SystemTime) -> Self
    where
        P: Into<PathBuf>,
        C: Into<String>,
    {
        Self {
            filesystem: Rc::new(InMemoryFilesystem::new(files)),
            clock: Rc::new(FixedClock(now)),
        }
    }

    /// Replace the filesystem, keeping the clock.
    #[must_use]
    pub fn with_filesystem(self, filesystem: impl Filesystem + 'static) -> Self {
        Self {
            filesystem: Rc::new(filesystem),
            clock: self.clock,
        }
    }

    /// Replace the clock, keeping the filesystem.
    #[must_use]
    pub fn with_clock(self, clock: impl Clock + 'static) -> Self {
        Self {
            filesystem: self.filesystem,
            clock: Rc::new(clock),
        }
    }

    #[must_use]
    pub fn filesystem(&self) -> &dyn Filesystem {
        &*self.filesystem
    }

    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        &*self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn in_memory_filesystem_serves_preloaded_files() {
        let os = OperatingSystem::in_memory(
            [("/etc/app/.env", "FOO=bar")],
            UNIX_EPOCH + Duration::from_secs(1),
        );
        let content = os
            .filesystem()
            .read_to_string(Path::new("/etc/app/.env"))
            .unwrap();
        assert_eq!(content, "FOO=bar");
        assert!(os
            .filesystem()
            .read_to_string(Path::new("/missing"))
            .is_err());
        assert_eq!(os.clock().now(), UNIX_EPOCH + Duration::from_secs(1));
    }
}
