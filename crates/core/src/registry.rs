//! Static registry mapping interpreter names to backend constructors

use std::sync::OnceLock;

use crate::{
    backends::{Backend, Generic, JsRef, Jsil, LambdaS5, MlJsRef, NodeJs, SpiderMonkey},
    config::BackendConfig,
    error::{Error, Result},
};

/// Builds a configured backend
pub type Constructor = fn(&BackendConfig) -> Result<Box<dyn Backend>>;

/// One registered interpreter
#[derive(Debug, Clone, Copy)]
pub struct BackendEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub construct: Constructor,
}

fn boxed<B: Backend + 'static>(backend: Result<B>) -> Result<Box<dyn Backend>> {
    Ok(Box::new(backend?))
}

/// Every backend shipped with the harness, in display order
const BUILTIN: &[BackendEntry] = &[
    BackendEntry {
        name: "generic",
        description: "Any interpreter invoked as `<path> <file>`",
        construct: |config| boxed(Generic::new(config)),
    },
    BackendEntry {
        name: "spidermonkey",
        description: "Mozilla SpiderMonkey shell",
        construct: |config| boxed(SpiderMonkey::new(config)),
    },
    BackendEntry {
        name: "nodejs",
        description: "node.js",
        construct: |config| boxed(NodeJs::new(config)),
    },
    BackendEntry {
        name: "lambdas5",
        description: "LambdaS5, run from its install directory",
        construct: |config| boxed(LambdaS5::new(config)),
    },
    BackendEntry {
        name: "jsref",
        description: "JSRef reference interpreter",
        construct: |config| boxed(JsRef::new(config)),
    },
    BackendEntry {
        name: "mljsref",
        description: "JSRef bytecode run through ocamlrun",
        construct: |config| boxed(MlJsRef::new(config)),
    },
    BackendEntry {
        name: "jsil",
        description: "JSIL interpreter",
        construct: |config| boxed(Jsil::new(config)),
    },
];

/// Case-insensitive lookup from interpreter name to constructor
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    entries: Vec<BackendEntry>,
}

impl BackendRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry of built-in backends, created on first use
    pub fn builtin() -> &'static BackendRegistry {
        static REGISTRY: OnceLock<BackendRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| BackendRegistry {
            entries: BUILTIN.to_vec(),
        })
    }

    /// Add a backend; names must be unique ignoring case
    pub fn register(&mut self, entry: BackendEntry) -> Result<()> {
        if self.find(entry.name).is_some() {
            return Err(Error::Config(format!(
                "interpreter '{}' is already registered",
                entry.name
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    fn find(&self, name: &str) -> Option<&BackendEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Construct the backend registered as `name`
    pub fn construct(&self, name: &str, config: &BackendConfig) -> Result<Box<dyn Backend>> {
        let entry = self.find(name).ok_or_else(|| Error::UnknownBackend {
            name: name.to_string(),
            known: self.names().iter().map(|n| n.to_string()).collect(),
        })?;

        tracing::debug!("Constructing '{}' interpreter", entry.name);
        (entry.construct)(config)
    }

    /// All constructible names, in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }

    pub fn entries(&self) -> &[BackendEntry] {
        &self.entries
    }
}

/// Construct a built-in backend by name
pub fn construct(name: &str, config: &BackendConfig) -> Result<Box<dyn Backend>> {
    BackendRegistry::builtin().construct(name, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_builtin_names() {
        assert_eq!(
            BackendRegistry::builtin().names(),
            vec![
                "generic",
                "spidermonkey",
                "nodejs",
                "lambdas5",
                "jsref",
                "mljsref",
                "jsil"
            ]
        );
    }

    #[test]
    fn test_builtin_table_registers_cleanly() {
        let mut registry = BackendRegistry::new();
        for entry in BUILTIN {
            registry.register(*entry).unwrap();
        }
        assert_eq!(registry.names(), BackendRegistry::builtin().names());
    }

    #[test]
    fn test_names_are_unique_and_lowercase() {
        let names = BackendRegistry::builtin().names();
        for name in &names {
            assert_eq!(*name, name.to_lowercase());
        }
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
    }

    #[test]
    fn test_construct_is_case_insensitive() {
        let backend = construct("SpiderMonkey", &BackendConfig::default()).unwrap();
        assert_eq!(backend.name(), "spidermonkey");
        assert_eq!(backend.display_name(), "SpiderMonkey");

        let backend = construct("NODEJS", &BackendConfig::default()).unwrap();
        assert_eq!(backend.name(), "nodejs");
    }

    #[test]
    fn test_construct_generic() {
        let config = BackendConfig {
            interp_path: Some(PathBuf::from("/usr/bin/d8")),
            ..Default::default()
        };
        let backend = construct("generic", &config).unwrap();
        assert_eq!(backend.display_name(), "d8");
    }

    #[test]
    fn test_unknown_backend() {
        let err = construct("rhino", &BackendConfig::default()).unwrap_err();
        match &err {
            Error::UnknownBackend { name, known } => {
                assert_eq!(name, "rhino");
                assert!(known.contains(&"jsref".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("Unknown interpreter 'rhino'"));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = BackendRegistry::new();
        registry.register(BUILTIN[1]).unwrap();
        let duplicate = BackendEntry {
            name: "SPIDERMONKEY",
            ..BUILTIN[1]
        };
        assert!(registry.register(duplicate).is_err());
        assert_eq!(registry.names(), vec!["spidermonkey"]);
    }

    #[test]
    fn test_every_builtin_constructs_with_defaults() {
        let config = BackendConfig {
            interp_path: Some(PathBuf::from("/usr/bin/true")),
            ..Default::default()
        };
        for name in BackendRegistry::builtin().names() {
            let backend = construct(name, &config).unwrap();
            assert_eq!(backend.name(), name);
        }
    }
}
