//! Identifier registry - the key/URI mapping shared by encoder and decoder
//!
//! Every node key, type name, and property name crossing the conversion
//! boundary goes through the same sanitization, so the mapping stays
//! deterministic and reversible within a conversion.

use graphlift_model::{local_name, Error, Result};
use graphlift_vocab::default_prefixes;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Characters that pass through sanitization unchanged (RFC 3986 unreserved)
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a raw key into a URI-safe path segment
///
/// Injective: two distinct keys always produce distinct segments, and
/// decoding the segment recovers the key exactly.
pub fn sanitize(key: &str) -> String {
    utf8_percent_encode(key, KEY_ENCODE_SET).to_string()
}

/// Bidirectional node-key/URI registry rooted at a base URI
///
/// URIs are minted lazily on first use and cached, so repeated lookups for
/// one key are idempotent and allocation-free after the first call.
#[derive(Clone, Debug)]
pub struct IdentifierRegistry {
    base_uri: Arc<str>,
    extra_prefixes: BTreeMap<String, String>,
    forward: HashMap<String, Arc<str>>,
    reverse: HashMap<Arc<str>, String>,
}

impl IdentifierRegistry {
    /// Create a registry rooted at `base_uri`
    ///
    /// The base must have a scheme and end with `/` or `#`, so minted URIs
    /// concatenate cleanly. Anything else is a `Configuration` error.
    pub fn new(base_uri: impl Into<String>) -> Result<Self> {
        let base_uri = base_uri.into();
        validate_base_uri(&base_uri)?;
        Ok(Self {
            base_uri: Arc::from(base_uri.as_str()),
            extra_prefixes: BTreeMap::new(),
            forward: HashMap::new(),
            reverse: HashMap::new(),
        })
    }

    /// Bind an extra namespace prefix for encoded output
    ///
    /// The prefix must be a plain identifier and the namespace a valid
    /// base, same rules as the registry's own base URI.
    pub fn with_prefix(
        mut self,
        prefix: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.is_empty()
            || !prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(Error::configuration(format!(
                "invalid namespace prefix {:?}",
                prefix
            )));
        }
        let namespace = namespace.into();
        validate_base_uri(&namespace)?;
        self.extra_prefixes.insert(prefix, namespace);
        Ok(self)
    }

    /// The base URI this registry mints under
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Get (or mint) the URI for a node key
    ///
    /// Deterministic and idempotent: the same key always yields the same
    /// URI. A distinct key that sanitizes onto an already-claimed URI is an
    /// `IdentifierCollision`; the encoding is injective, so this guards
    /// against registry misuse rather than an expected runtime case.
    pub fn uri_for(&mut self, key: &str) -> Result<Arc<str>> {
        if let Some(uri) = self.forward.get(key) {
            return Ok(Arc::clone(uri));
        }
        let uri: Arc<str> = Arc::from(format!("{}{}", self.base_uri, sanitize(key)));
        if let Some(existing) = self.reverse.get(&uri) {
            if existing != key {
                return Err(Error::IdentifierCollision {
                    first: existing.clone(),
                    second: key.to_string(),
                    uri: uri.to_string(),
                });
            }
        }
        self.forward.insert(key.to_string(), Arc::clone(&uri));
        self.reverse.insert(Arc::clone(&uri), key.to_string());
        Ok(uri)
    }

    /// Reverse-lookup the key a URI was minted for
    pub fn key_for(&self, uri: &str) -> Option<&str> {
        self.reverse.get(uri).map(String::as_str)
    }

    /// Derive a key from a URI that was never registered here
    ///
    /// Strips the base prefix and percent-decodes the remainder. Returns
    /// `None` for URIs outside this registry's base.
    pub fn derive_key(&self, uri: &str) -> Option<String> {
        let segment = uri.strip_prefix(self.base_uri.as_ref())?;
        Some(percent_decode_str(segment).decode_utf8_lossy().into_owned())
    }

    /// Key for a URI, registered or not
    ///
    /// Falls back to the percent-decoded last path segment for URIs outside
    /// the base, so foreign data still decodes to usable node ids.
    pub fn key_or_local(&self, uri: &str) -> String {
        if let Some(key) = self.key_for(uri) {
            return key.to_string();
        }
        self.derive_key(uri).unwrap_or_else(|| {
            percent_decode_str(local_name(uri))
                .decode_utf8_lossy()
                .into_owned()
        })
    }

    /// URI for a type, property, or relation name
    ///
    /// Resource names share the node-key namespace under the base but are
    /// not tracked for collisions; sanitization alone keeps them reversible.
    pub fn resource_uri(&self, name: &str) -> String {
        format!("{}{}", self.base_uri, sanitize(name))
    }

    /// Prefix table for encoded output: the standard namespaces plus a
    /// `kg` binding for the base URI
    pub fn prefixes(&self) -> BTreeMap<String, String> {
        let mut prefixes = default_prefixes();
        prefixes.insert("kg".to_string(), self.base_uri.to_string());
        for (prefix, namespace) in &self.extra_prefixes {
            prefixes.insert(prefix.clone(), namespace.clone());
        }
        prefixes
    }
}

fn validate_base_uri(base_uri: &str) -> Result<()> {
    let scheme_end = base_uri.find(':').ok_or_else(|| {
        Error::configuration(format!("base URI {:?} has no scheme", base_uri))
    })?;
    let scheme = &base_uri[..scheme_end];
    let valid_scheme = scheme
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid_scheme {
        return Err(Error::configuration(format!(
            "base URI {:?} has an invalid scheme",
            base_uri
        )));
    }
    if base_uri[scheme_end + 1..].is_empty() {
        return Err(Error::configuration(format!(
            "base URI {:?} has no path",
            base_uri
        )));
    }
    if !base_uri.ends_with('/') && !base_uri.ends_with('#') {
        return Err(Error::configuration(format!(
            "base URI {:?} must end with '/' or '#'",
            base_uri
        )));
    }
    Ok(())
}
