//! # Container Module
//!
//! Lazy, memoized dependency-injection container.
//!
//! ## Overview
//!
//! Services are named by [`Service`] tokens: `const`-constructible, typed
//! references that applications declare once and reuse everywhere:
//!
//! ```rust
//! use armature::container::{ContainerBuilder, Service};
//!
//! const GREETING: Service<String> = Service::new("greeting");
//!
//! let container = ContainerBuilder::new()
//!     .add(GREETING, |_| "hello".to_owned())
//!     .build();
//! assert_eq!(*container.get(GREETING), "hello");
//! ```
//!
//! ## Resolution
//!
//! [`Container::get`] runs the stored factory at most once per container
//! instance and caches the result, so singleton-scoped side effects cannot
//! happen twice within one run. Factories receive a [`Resolver`] to pull their
//! own dependencies (mutual recursion is allowed as long as the graph is
//! acyclic) and, when a reference was registered more than once, to observe
//! the previous layer's product through [`Resolver::previous`].
//!
//! ## Failure policy
//!
//! Resolving an unregistered reference, resolving a reference whose stored
//! value does not match the token's type, and cyclic resolution are programmer
//! errors: they panic rather than returning a recoverable error.

use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use tracing::debug;

/// Opaque, typed reference naming one entry in the dependency graph.
///
/// Tokens are compared and hashed by name; the phantom type parameter pins the
/// concrete type resolution yields, checked at `get` time.
pub struct Service<T: ?Sized> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ?Sized> Service<T> {
    /// Declare a service reference. Usable in `const` position.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// The unique name of this reference.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: ?Sized> Clone for Service<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Service<T> {}

impl<T: ?Sized> PartialEq for Service<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T: ?Sized> Eq for Service<T> {}

impl<T: ?Sized> std::hash::Hash for Service<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for Service<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Service").field(&self.name).finish()
    }
}

type Definition = Rc<dyn Fn(&Resolver<'_>) -> Rc<dyn Any>>;

/// Ordered accumulation of `(reference, factory)` definitions.
///
/// Building is deferred: nothing runs until [`ContainerBuilder::build`] and
/// then only on first resolution of each reference.
#[derive(Default)]
pub struct ContainerBuilder {
    definitions: Vec<(&'static str, Definition)>,
}

impl ContainerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one definition.
    ///
    /// Registering the same reference again layers on top of the earlier
    /// definition; the new factory reads the previous product via
    /// [`Resolver::previous`].
    #[must_use]
    pub fn add<T: 'static>(
        mut self,
        service: Service<T>,
        factory: impl Fn(&Resolver<'_>) -> T + 'static,
    ) -> Self {
        self.definitions.push((
            service.name(),
            Rc::new(move |resolver| Rc::new(factory(resolver)) as Rc<dyn Any>),
        ));
        self
    }

    /// Finalize into a resolvable container.
    #[must_use]
    pub fn build(self) -> Container {
        let mut chains: HashMap<&'static str, Vec<Definition>> = HashMap::new();
        for (name, definition) in self.definitions {
            chains.entry(name).or_default().push(definition);
        }
        Container {
            inner: Rc::new(Inner {
                chains,
                built: RefCell::new(HashMap::new()),
                resolving: RefCell::new(HashSet::new()),
            }),
        }
    }
}

struct Inner {
    chains: HashMap<&'static str, Vec<Definition>>,
    built: RefCell<HashMap<&'static str, Rc<dyn Any>>>,
    resolving: RefCell<HashSet<&'static str>>,
}

/// Built, resolvable container. Run-scoped: fresh per HTTP request, one per
/// CLI invocation, discarded afterwards.
///
/// Cloning shares the memoization state, so clones resolve to the identical
/// instances.
#[derive(Clone)]
pub struct Container {
    inner: Rc<Inner>,
}

impl Container {
    /// Resolve a reference, building it (and its dependencies) on first use.
    ///
    /// # Panics
    ///
    /// Panics if the reference was never registered, if the stored value does
    /// not have the token's type, or if resolution is cyclic.
    #[must_use]
    pub fn get<T: 'static>(&self, service: Service<T>) -> Rc<T> {
        let name = service.name();
        if let Some(cached) = self.inner.built.borrow().get(name) {
            return Rc::clone(cached)
                .downcast::<T>()
                .unwrap_or_else(|_| panic!("service `{name}` resolved to an unexpected type"));
        }

        let chain = self
            .inner
            .chains
            .get(name)
            .unwrap_or_else(|| panic!("service `{name}` is not registered"))
            .clone();
        if !self.inner.resolving.borrow_mut().insert(name) {
            panic!("cyclic resolution of service `{name}`");
        }
        debug!(service = name, layers = chain.len(), "building service");

        let mut previous: Option<Rc<dyn Any>> = None;
        for definition in &chain {
            let resolver = Resolver {
                container: self,
                previous: previous.take(),
            };
            previous = Some(definition(&resolver));
        }
        // a registered chain always holds at least one definition
        let instance = previous.unwrap_or_else(|| unreachable!());

        self.inner.resolving.borrow_mut().remove(name);
        self.inner
            .built
            .borrow_mut()
            .insert(name, Rc::clone(&instance));
        instance
            .downcast::<T>()
            .unwrap_or_else(|_| panic!("service `{name}` resolved to an unexpected type"))
    }
}

/// Handle passed to factories while one reference is being built.
///
/// Resolves dependencies through the container and, for layered definitions,
/// exposes the previous layer's product.
pub struct Resolver<'a> {
    container: &'a Container,
    previous: Option<Rc<dyn Any>>,
}

impl Resolver<'_> {
    /// Resolve a dependency.
    #[must_use]
    pub fn get<T: 'static>(&self, service: Service<T>) -> Rc<T> {
        self.container.get(service)
    }

    /// The product of the earlier registration of the same reference, if this
    /// factory overlays one. `None` for the first (or only) registration, and
    /// for a previous layer of a different type.
    #[must_use]
    pub fn previous<T: 'static>(&self) -> Option<Rc<T>> {
        self.previous
            .as_ref()
            .and_then(|p| Rc::clone(p).downcast::<T>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const COUNTER: Service<u32> = Service::new("counter");
    const DOUBLE: Service<u32> = Service::new("double");
    const LOOP_A: Service<u32> = Service::new("loop-a");
    const LOOP_B: Service<u32> = Service::new("loop-b");

    #[test]
    fn factories_run_at_most_once() {
        let calls = Rc::new(Cell::new(0_u32));
        let observed = Rc::clone(&calls);
        let container = ContainerBuilder::new()
            .add(COUNTER, move |_| {
                observed.set(observed.get() + 1);
                7
            })
            .build();

        let first = container.get(COUNTER);
        let second = container.get(COUNTER);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn dependencies_resolve_through_the_resolver() {
        let container = ContainerBuilder::new()
            .add(COUNTER, |_| 21)
            .add(DOUBLE, |resolver| *resolver.get(COUNTER) * 2)
            .build();
        assert_eq!(*container.get(DOUBLE), 42);
    }

    #[test]
    fn later_registration_layers_on_the_earlier_one() {
        let container = ContainerBuilder::new()
            .add(COUNTER, |_| 1)
            .add(COUNTER, |resolver| {
                *resolver.previous::<u32>().unwrap() + 10
            })
            .build();
        assert_eq!(*container.get(COUNTER), 11);
    }

    #[test]
    fn first_registration_sees_no_previous_layer() {
        let container = ContainerBuilder::new()
            .add(COUNTER, |resolver| {
                assert!(resolver.previous::<u32>().is_none());
                3
            })
            .build();
        assert_eq!(*container.get(COUNTER), 3);
    }

    #[test]
    #[should_panic(expected = "service `counter` is not registered")]
    fn unregistered_reference_fails_fast() {
        let container = ContainerBuilder::new().build();
        let _ = container.get(COUNTER);
    }

    #[test]
    #[should_panic(expected = "cyclic resolution of service `loop-a`")]
    fn cyclic_resolution_fails_fast() {
        let container = ContainerBuilder::new()
            .add(LOOP_A, |resolver| *resolver.get(LOOP_B))
            .add(LOOP_B, |resolver| *resolver.get(LOOP_A))
            .build();
        let _ = container.get(LOOP_A);
    }

    #[test]
    fn clones_share_memoization() {
        let container = ContainerBuilder::new().add(COUNTER, |_| 5).build();
        let clone = container.clone();
        assert!(Rc::ptr_eq(&container.get(COUNTER), &clone.get(COUNTER)));
    }
}
