use std::collections::HashMap;

/// Anything variables can be looked up in by name.
///
/// The process environment is the only source used at runtime; tests use a
/// plain `HashMap` so they never touch global state.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads from the current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Returns the value of the first variable in `candidates` that is set.
///
/// A variable set to the empty string counts as set.
pub fn first_defined<S: EnvSource + ?Sized>(source: &S, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|name| source.var(name))
}
