//! `{{ key }}` merge-tag substitution.
//!
//! Tokens are `{{`, optional whitespace, an identifier matching
//! `[A-Za-z_][A-Za-z0-9_]*`, optional whitespace, `}}`. Known keys are
//! replaced by their value (which may be empty); unknown keys are left in
//! place untouched so a later pass (e.g. a send pipeline with per-recipient
//! data) can resolve them.

use crate::visitor::{walk_blocks, Visitor};
use mailbuilder_blocks::{Block, Variable};
use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

/// Reserved key resolved to the recipient's unsubscribe URL
pub const UNSUBSCRIBE_LINK: &str = "unsubscribe_link";

/// Reserved key resolved to the hosted copy of the email
pub const VIEW_IN_BROWSER_LINK: &str = "view_in_browser_link";

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("token pattern compiles")
    })
}

/// Anything that can resolve a variable key to a value
pub trait VariableLookup {
    fn lookup(&self, key: &str) -> Option<&str>;
}

impl VariableLookup for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl VariableLookup for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// Replace every bound `{{ key }}` token in `text`
pub fn replace_variables<L: VariableLookup + ?Sized>(text: &str, bindings: &L) -> String {
    if !text.contains("{{") {
        return text.to_string();
    }

    token_pattern()
        .replace_all(text, |caps: &Captures| match bindings.lookup(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Keys referenced in `text`, unique, in first-seen order
pub fn extract_variables(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    token_pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let key = caps[1].to_string();
            seen.insert(key.clone()).then_some(key)
        })
        .collect()
}

pub fn contains_variables(text: &str) -> bool {
    token_pattern().is_match(text)
}

/// Key → value map used at render time.
///
/// Built from the template's variable defaults, then overridden by caller
/// supplied values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every variable's key to its default value
    pub fn from_variables(variables: &[Variable]) -> Self {
        variables
            .iter()
            .map(|v| (v.key.clone(), v.default_value.clone()))
            .collect()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Override existing values with `other`
    pub fn merge<I, K, V>(&mut self, other: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in other {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl VariableLookup for Bindings {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut bindings = Bindings::new();
        bindings.merge(iter);
        bindings
    }
}

/// Collects every variable key referenced anywhere in a block tree
#[derive(Debug, Default)]
struct VariableCollector {
    seen: HashSet<String>,
    keys: Vec<String>,
}

impl Visitor for VariableCollector {
    fn visit_text(&mut self, _block: &Block, text: &str) {
        for key in extract_variables(text) {
            if self.seen.insert(key.clone()) {
                self.keys.push(key);
            }
        }
    }
}

/// Keys referenced by `blocks`, unique, in document order
pub fn collect_block_variables(blocks: &[Block]) -> Vec<String> {
    let mut collector = VariableCollector::default();
    walk_blocks(&mut collector, blocks);
    collector.keys
}
