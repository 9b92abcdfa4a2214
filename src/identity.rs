//! Device identity resolution
//!
//! Maps rotating radio addresses to stable identities using the device-naming
//! log maintained by the live scanner. When an address has no mapping, the
//! address itself is the identity; a missing mapping is never an error.

use crate::types::DeviceNameRow;
use std::collections::HashMap;

/// Canonicalize an identity key for comparison.
///
/// Radio addresses are hex-and-colon strings whose case varies between the
/// scanner and hand-maintained allow-lists, so they are uppercased. Anything
/// that does not look like an address (canonical names) is left verbatim.
pub fn canonical_key(id: &str) -> String {
    let trimmed = id.trim();
    let looks_like_address = trimmed.contains(':')
        && trimmed
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == ':');
    if looks_like_address {
        trimmed.to_ascii_uppercase()
    } else {
        trimmed.to_string()
    }
}

/// Address -> canonical name lookup, built once per run and passed into
/// aggregation and extraction as a dependency.
///
/// Multiple addresses may map to the same name, since a device can rotate
/// its address over time.
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    names: HashMap<String, String>,
}

impl IdentityResolver {
    /// Resolver with no mappings; every address resolves to itself.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a resolver from device-naming log rows.
    ///
    /// The advertised name may embed the canonical identity in a trailing
    /// parenthesized suffix (`"Galaxy Watch4 (Alice)"` -> `Alice`); without
    /// a suffix the whole name is used. Later rows for the same address
    /// overwrite earlier ones.
    pub fn from_rows(rows: &[DeviceNameRow]) -> Self {
        let mut resolver = Self::default();
        for row in rows {
            let name = canonical_suffix(&row.name).unwrap_or(row.name.trim());
            if name.is_empty() {
                continue;
            }
            resolver.insert(&row.address, name);
        }
        resolver
    }

    /// Register one address -> name mapping.
    pub fn insert(&mut self, address: &str, name: &str) {
        self.names
            .insert(canonical_key(address), name.to_string());
    }

    /// Resolve an address to its identity: the mapped canonical name when
    /// present, otherwise the address itself.
    pub fn resolve<'a>(&'a self, address: &'a str) -> &'a str {
        self.names
            .get(address)
            .map(String::as_str)
            .unwrap_or(address)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Extract a trailing parenthesized suffix from an advertised device name.
fn canonical_suffix(name: &str) -> Option<&str> {
    let trimmed = name.trim();
    if !trimmed.ends_with(')') {
        return None;
    }
    let open = trimmed.rfind('(')?;
    let inner = trimmed[open + 1..trimmed.len() - 1].trim();
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn name_row(name: &str, address: &str) -> DeviceNameRow {
        DeviceNameRow {
            timestamp: Utc::now(),
            name: name.to_string(),
            address: address.to_string(),
        }
    }

    #[test]
    fn canonical_key_uppercases_addresses_only() {
        assert_eq!(canonical_key("4b:1a:24:ea:2e:6c"), "4B:1A:24:EA:2E:6C");
        assert_eq!(canonical_key(" 54:08:3B:C4:FC:64 "), "54:08:3B:C4:FC:64");
        // Canonical names keep their case
        assert_eq!(canonical_key("Alice"), "Alice");
        assert_eq!(canonical_key("Galaxy Watch4"), "Galaxy Watch4");
    }

    #[test]
    fn suffix_extraction() {
        assert_eq!(canonical_suffix("Galaxy Watch4 (Alice)"), Some("Alice"));
        assert_eq!(canonical_suffix("(Bob)"), Some("Bob"));
        assert_eq!(canonical_suffix("Galaxy Watch4"), None);
        assert_eq!(canonical_suffix("Odd name ()"), None);
    }

    #[test]
    fn resolve_mapped_and_unmapped() {
        let rows = vec![
            name_row("Galaxy Watch4 (Alice)", "aa:bb:cc:00:00:01"),
            name_row("PlainName", "AA:BB:CC:00:00:02"),
        ];
        let resolver = IdentityResolver::from_rows(&rows);
        assert_eq!(resolver.len(), 2);

        assert_eq!(resolver.resolve("AA:BB:CC:00:00:01"), "Alice");
        assert_eq!(resolver.resolve("AA:BB:CC:00:00:02"), "PlainName");
        // Unmapped address resolves to itself
        assert_eq!(resolver.resolve("AA:BB:CC:00:00:99"), "AA:BB:CC:00:00:99");
    }

    #[test]
    fn rotating_addresses_share_one_identity() {
        let rows = vec![
            name_row("Watch (Carol)", "AA:00:00:00:00:01"),
            name_row("Watch (Carol)", "AA:00:00:00:00:02"),
        ];
        let resolver = IdentityResolver::from_rows(&rows);
        assert_eq!(resolver.resolve("AA:00:00:00:00:01"), "Carol");
        assert_eq!(resolver.resolve("AA:00:00:00:00:02"), "Carol");
    }
}
