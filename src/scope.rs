//! Runtime registry of paired test functions.
//!
//! A [`TestScope`] maps names such as `"add_test"` to test functions so `Harness::wrap` can resolve a pair by
//! naming convention at runtime. Entries are stored type-erased; each one only matches targets of the type it was
//! registered for.

use std::any::{Any, type_name};
use std::collections::HashMap;

use crate::errors::TestFnResult;
use crate::session::TestSession;

/// A boxed paired test for targets of type `F`.
pub type PairedTest<F> = Box<dyn Fn(&mut TestSession, &F) -> TestFnResult>;

struct Entry {
    test: Box<dyn Any>,
    target_type: &'static str,
}

/// Result of looking a paired test up by name.
pub enum Lookup<'a, F> {
    Found(&'a PairedTest<F>),
    Missing,
    /// Registered, but for a different target type.
    WrongType { registered_for: &'static str },
}

/// Named paired test functions visible to `Harness::wrap`.
#[derive(Default)]
pub struct TestScope {
    entries: HashMap<String, Entry>,
}

impl TestScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `test` under `name`, replacing any earlier entry with that name.
    pub fn register<F, T>(&mut self, name: impl Into<String>, test: T) -> &mut Self
    where
        F: 'static,
        T: Fn(&mut TestSession, &F) -> TestFnResult + 'static,
    {
        let boxed: PairedTest<F> = Box::new(test);
        self.entries.insert(
            name.into(),
            Entry {
                test: Box::new(boxed),
                target_type: type_name::<F>(),
            },
        );
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn lookup<F: 'static>(&self, name: &str) -> Lookup<'_, F> {
        match self.entries.get(name) {
            None => Lookup::Missing,
            Some(entry) => match entry.test.downcast_ref::<PairedTest<F>>() {
                Some(test) => Lookup::Found(test),
                None => Lookup::WrongType {
                    registered_for: entry.target_type,
                },
            },
        }
    }
}

impl std::fmt::Debug for TestScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestScope").field("names", &self.names()).finish()
    }
}
