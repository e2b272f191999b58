//! A typed service registry.
//!
//! Leaf parsers and handlers often need shared collaborators (an output
//! sink, a clock, a client). The registry maps a concrete type to a factory
//! that builds it, so a leaf can be wired with
//! [`LeafCommand::with_registered_action`](crate::LeafCommand::with_registered_action)
//! without naming how its parts are constructed.
//!
//! Factories receive the registry itself, so one service can be built from
//! others; a factory fails when a service it depends on is missing.
//!
//! # Examples
//!
//! ```
//! use command_tree_core::Registry;
//!
//! struct Greeting(String);
//! struct Greeter {
//!     greeting: Greeting,
//! }
//!
//! let registry = Registry::new()
//!     .with(|_| Ok(Greeting("hello".to_string())))
//!     .with(|registry| {
//!         Ok(Greeter {
//!             greeting: registry.resolve()?,
//!         })
//!     });
//!
//! let greeter = registry.resolve::<Greeter>().unwrap();
//! assert_eq!(greeter.greeting.0, "hello");
//! ```

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::ConfigError;

type Factory = Box<dyn Fn(&Registry) -> Result<Box<dyn Any>, ConfigError>>;

/// Factories keyed by the type they produce.
#[derive(Default)]
pub struct Registry {
    factories: HashMap<TypeId, Factory>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` as the way to build a `T`, replacing any earlier
    /// registration for the same type.
    pub fn register<T, F>(&mut self, factory: F)
    where
        T: 'static,
        F: Fn(&Registry) -> Result<T, ConfigError> + 'static,
    {
        self.factories.insert(
            TypeId::of::<T>(),
            Box::new(move |registry: &Registry| {
                factory(registry).map(|service| Box::new(service) as Box<dyn Any>)
            }),
        );
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<T, F>(mut self, factory: F) -> Self
    where
        T: 'static,
        F: Fn(&Registry) -> Result<T, ConfigError> + 'static,
    {
        self.register(factory);
        self
    }

    /// Whether a factory for `T` is registered.
    pub fn contains<T: 'static>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<T>())
    }

    /// Builds a fresh `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnregisteredService`] if no factory for `T`
    /// has been registered, or whatever error the factory returns.
    pub fn resolve<T: 'static>(&self) -> Result<T, ConfigError> {
        let factory = self
            .factories
            .get(&TypeId::of::<T>())
            .ok_or(ConfigError::UnregisteredService(type_name::<T>()))?;

        debug!(service = type_name::<T>(), "Resolving service");
        factory(self)?
            .downcast::<T>()
            .map(|service| *service)
            .map_err(|_| ConfigError::UnregisteredService(type_name::<T>()))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("services", &self.factories.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Port(u16);

    struct Server {
        port: Port,
        name: Rc<str>,
    }

    #[test]
    fn test_resolve_builds_fresh_value() {
        let registry = Registry::new().with(|_| Ok(Port(8080)));
        assert_eq!(registry.resolve::<Port>().unwrap(), Port(8080));
        assert!(registry.contains::<Port>());
    }

    #[test]
    fn test_unregistered_service_names_the_type() {
        let registry = Registry::new();
        let err = registry.resolve::<Port>().unwrap_err();

        assert!(matches!(err, ConfigError::UnregisteredService(name) if name.ends_with("Port")));
    }

    #[test]
    fn test_factories_can_depend_on_other_services() {
        let name: Rc<str> = Rc::from("api");
        let shared = Rc::clone(&name);

        let mut registry = Registry::new();
        registry.register(|_| Ok(Port(9000)));
        registry.register(move |registry| {
            Ok(Server {
                port: registry.resolve()?,
                name: Rc::clone(&shared),
            })
        });

        let server = registry.resolve::<Server>().unwrap();
        assert_eq!(server.port, Port(9000));
        assert!(Rc::ptr_eq(&server.name, &name));
    }

    #[test]
    fn test_missing_dependency_fails_the_dependent() {
        let registry = Registry::new().with(|registry| {
            Ok(Server {
                port: registry.resolve()?,
                name: Rc::from("api"),
            })
        });

        let err = registry.resolve::<Server>().err().unwrap();
        assert!(matches!(err, ConfigError::UnregisteredService(name) if name.ends_with("Port")));
    }

    #[test]
    fn test_later_registration_wins() {
        let registry = Registry::new()
            .with(|_| Ok(Port(1)))
            .with(|_| Ok(Port(2)));
        assert_eq!(registry.resolve::<Port>().unwrap(), Port(2));
    }
}
