//! Namespaced registry keys and the immutable lookup tables built from them.
//!
//! Items and enchantments are identified by stable `namespace:path` keys
//! (e.g. `minecraft:diamond_sword`). The tables are assembled once when the
//! plugin is enabled and shared read-only afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::enchantment::EnchantmentRegistry;
use crate::item::ItemRegistry;

/// Default namespace used when a key omits an explicit namespace.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Error returned when parsing an invalid [`RegistryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid registry key `{input}`: {reason}")]
pub struct RegistryKeyError {
    input: String,
    reason: &'static str,
}

impl RegistryKeyError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// A namespaced key of the form `namespace:path`.
///
/// Ordering is lexical by `(namespace, path)` and is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistryKey {
    namespace: String,
    path: String,
}

impl RegistryKey {
    /// Parse a registry key.
    ///
    /// Accepts either:
    /// - `namespace:path`
    /// - `path` (uses [`DEFAULT_NAMESPACE`])
    pub fn parse(input: &str) -> Result<Self, RegistryKeyError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RegistryKeyError::new(input, "key cannot be empty"));
        }

        let (namespace, path) = match trimmed.split_once(':') {
            Some((ns, p)) => (ns.trim(), p.trim()),
            None => (DEFAULT_NAMESPACE, trimmed),
        };

        validate_namespace(input, namespace)?;
        validate_path(input, path)?;

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Build a key in the default namespace. Panics on an invalid path, so
    /// only use it for compile-time constants.
    pub fn vanilla(path: &str) -> Self {
        match Self::parse(path) {
            Ok(key) => key,
            Err(err) => panic!("built-in registry key is invalid: {err}"),
        }
    }

    /// Registry key namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registry key path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for RegistryKey {
    type Err = RegistryKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RegistryKey {
    type Error = RegistryKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegistryKey> for String {
    fn from(key: RegistryKey) -> Self {
        key.to_string()
    }
}

fn validate_namespace(input: &str, ns: &str) -> Result<(), RegistryKeyError> {
    if ns.is_empty() {
        return Err(RegistryKeyError::new(input, "namespace cannot be empty"));
    }
    if ns.len() > 64 {
        return Err(RegistryKeyError::new(input, "namespace too long (max 64)"));
    }
    if !ns
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.'))
    {
        return Err(RegistryKeyError::new(
            input,
            "namespace has invalid characters (allowed: a-z0-9_.-)",
        ));
    }
    Ok(())
}

fn validate_path(input: &str, path: &str) -> Result<(), RegistryKeyError> {
    if path.is_empty() {
        return Err(RegistryKeyError::new(input, "path cannot be empty"));
    }
    if path.len() > 128 {
        return Err(RegistryKeyError::new(input, "path too long (max 128)"));
    }
    if !path
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/'))
    {
        return Err(RegistryKeyError::new(
            input,
            "path has invalid characters (allowed: a-z0-9_./-)",
        ));
    }
    Ok(())
}

/// Process-wide lookup tables for item and enchantment identities.
///
/// Built once at enable time and handed around as `Arc<Registries>`; nothing
/// mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Registries {
    /// Known item types.
    pub items: ItemRegistry,
    /// Known enchantment types.
    pub enchantments: EnchantmentRegistry,
}

impl Registries {
    /// Assemble the tables from explicit registries.
    pub fn new(items: ItemRegistry, enchantments: EnchantmentRegistry) -> Self {
        Self {
            items,
            enchantments,
        }
    }

    /// The built-in vanilla tables, ready to share.
    pub fn vanilla() -> Arc<Self> {
        Arc::new(Self::new(ItemRegistry::vanilla(), EnchantmentRegistry::vanilla()))
    }
}
