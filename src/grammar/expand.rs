use std::collections::BTreeMap;

use crate::foundation::error::{LindenwarpError, LindenwarpResult};

/// Hard ceiling on rewrite passes accepted by [`expand`].
pub const MAX_ITERATIONS: u32 = 20;

/// Hard ceiling, in bytes, on the instruction sequence produced by any
/// rewrite pass. Rule tables grow sequences exponentially, so [`expand`]
/// checks this while rewriting rather than after.
pub const MAX_INSTRUCTIONS: usize = 16_777_216;

/// Production table for a deterministic context-free L-system.
///
/// Symbols without an entry rewrite to themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Ruleset(pub BTreeMap<char, String>);

impl Ruleset {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, symbol: char, replacement: impl Into<String>) {
        self.0.insert(symbol, replacement.into());
    }

    pub fn get(&self, symbol: char) -> Option<&str> {
        self.0.get(&symbol).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(char, String)> for Ruleset {
    fn from_iter<T: IntoIterator<Item = (char, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Rewrite `axiom` through `iterations` parallel substitution passes.
///
/// Every pass replaces each symbol with its production, or keeps the symbol
/// when the table has no entry for it. Zero iterations returns the axiom
/// unchanged. Fails with [`LindenwarpError::InvalidConfig`] when the
/// iteration count exceeds [`MAX_ITERATIONS`] or the sequence outgrows
/// [`MAX_INSTRUCTIONS`].
pub fn expand(axiom: &str, rules: &Ruleset, iterations: u32) -> LindenwarpResult<String> {
    if iterations > MAX_ITERATIONS {
        return Err(LindenwarpError::invalid_config(format!(
            "iterations must be <= {MAX_ITERATIONS}, got {iterations}"
        )));
    }
    if axiom.len() > MAX_INSTRUCTIONS {
        return Err(LindenwarpError::invalid_config(format!(
            "axiom exceeds {MAX_INSTRUCTIONS} bytes"
        )));
    }

    let mut current = axiom.to_owned();
    for pass in 0..iterations {
        let mut next = String::with_capacity(current.len());
        for symbol in current.chars() {
            match rules.get(symbol) {
                Some(replacement) => next.push_str(replacement),
                None => next.push(symbol),
            }
            if next.len() > MAX_INSTRUCTIONS {
                return Err(LindenwarpError::invalid_config(format!(
                    "instruction sequence exceeds {MAX_INSTRUCTIONS} bytes after {} iterations",
                    pass + 1
                )));
            }
        }
        current = next;
    }
    Ok(current)
}
