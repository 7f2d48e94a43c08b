//! Object names: the identity a bridge presents to a management server.
//!
//! An object name has the form `domain:key=value[,key=value...]`, for example
//! `sysmx:type=CpuCore,name=0`. Properties are kept sorted by key, so two names
//! that differ only in property order are equal and display identically.
//!
//! A name whose property list ends with `*` (e.g. `sysmx:type=Cpu,*` or
//! `sysmx:*`) is a pattern and can be used to query registered names.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default domain for SysMX object names.
pub const DEFAULT_DOMAIN: &str = "sysmx";

/// Characters that may not appear in a domain, key or value.
const RESERVED: &[char] = &[':', ',', '=', '*', '?', '"', '\n'];

/// A parsed object name (or object name pattern).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectName {
    domain: String,
    properties: BTreeMap<String, String>,
    pattern: bool,
}

impl ObjectName {
    /// Parse an object name from its string form.
    pub fn parse(s: &str) -> Result<Self> {
        let (domain, props) = s
            .split_once(':')
            .ok_or_else(|| invalid(s, "missing ':' between domain and properties"))?;

        validate_part(s, "domain", domain)?;

        if props.is_empty() {
            return Err(invalid(s, "no key properties"));
        }

        let mut properties = BTreeMap::new();
        let mut pattern = false;

        let parts: Vec<&str> = props.split(',').collect();
        for (i, part) in parts.iter().enumerate() {
            if *part == "*" {
                if i != parts.len() - 1 {
                    return Err(invalid(s, "'*' must be the last property"));
                }
                pattern = true;
                continue;
            }

            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| invalid(s, &format!("property '{}' is not key=value", part)))?;

            validate_part(s, "key", key)?;
            validate_part(s, "value", value)?;

            if properties
                .insert(key.to_string(), value.to_string())
                .is_some()
            {
                return Err(invalid(s, &format!("duplicate key '{}'", key)));
            }
        }

        if properties.is_empty() && !pattern {
            return Err(invalid(s, "no key properties"));
        }

        Ok(Self {
            domain: domain.to_string(),
            properties,
            pattern,
        })
    }

    /// The domain part of the name.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Look up a key property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Iterate over key properties in canonical (sorted) order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether this name is a pattern (ends with `*`).
    pub fn is_pattern(&self) -> bool {
        self.pattern
    }

    /// Check whether `name` is matched by this name.
    ///
    /// A non-pattern name only matches an equal name. A pattern matches any
    /// name in the same domain that carries all of the pattern's properties.
    pub fn matches(&self, name: &ObjectName) -> bool {
        if !self.pattern {
            return self == name;
        }

        self.domain == name.domain
            && self
                .properties
                .iter()
                .all(|(k, v)| name.properties.get(k) == Some(v))
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.domain)?;

        let mut first = true;
        for (k, v) in &self.properties {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{}={}", k, v)?;
            first = false;
        }

        if self.pattern {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "*")?;
        }

        Ok(())
    }
}

impl FromStr for ObjectName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Builder for object name strings.
///
/// # Example
/// ```
/// use sysmx_common::objectname::ObjectNameBuilder;
///
/// let name = ObjectNameBuilder::new("sysmx")
///     .property("type", "CpuCore")
///     .property("name", "0")
///     .to_string();
/// assert_eq!(name, "sysmx:type=CpuCore,name=0");
/// ```
#[derive(Debug, Clone)]
pub struct ObjectNameBuilder {
    domain: String,
    properties: Vec<(String, String)>,
}

impl ObjectNameBuilder {
    /// Start a name in the given domain.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            properties: Vec::new(),
        }
    }

    /// Append a key property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }

    /// Build and validate the object name.
    pub fn build(&self) -> Result<ObjectName> {
        ObjectName::parse(&self.to_string())
    }
}

impl fmt::Display for ObjectNameBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.domain)?;
        for (i, (k, v)) in self.properties.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        Ok(())
    }
}

/// Check that a domain is usable in object names.
pub fn validate_domain(domain: &str) -> Result<()> {
    validate_part(domain, "domain", domain)
}

fn validate_part(name: &str, what: &str, part: &str) -> Result<()> {
    if part.is_empty() {
        return Err(invalid(name, &format!("empty {}", what)));
    }
    if let Some(c) = part.chars().find(|c| RESERVED.contains(c)) {
        return Err(invalid(
            name,
            &format!("{} '{}' contains reserved character '{}'", what, part, c),
        ));
    }
    Ok(())
}

fn invalid(name: &str, reason: &str) -> Error {
    Error::ObjectName(format!("'{}': {}", name, reason))
}
