//! Annotation identifiers and session-unique id generation.

use std::collections::HashSet;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use web_time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for an annotation.
///
/// Ids are opaque strings. Older payloads carry numeric ids, which are read as
/// their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AnnotationId(String);

impl AnnotationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AnnotationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = AnnotationId;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("annotation id as string or number")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(AnnotationId::new(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(AnnotationId::new(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(AnnotationId::new(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
                if !value.is_finite() {
                    return Err(E::custom("annotation id must be finite"));
                }
                if value.fract() == 0.0 {
                    Ok(AnnotationId::new(format!("{:.0}", value)))
                } else {
                    Ok(AnnotationId::new(value.to_string()))
                }
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Generates identifiers that are unique within one editing session.
///
/// Ids have the form `<millis>-<n>`, where `millis` is the wall clock at session
/// open and `n` counts up. Ids already used by loaded annotations are skipped.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    session: u128,
    next: u64,
    taken: HashSet<AnnotationId>,
}

impl IdGenerator {
    /// Create a generator seeded from the current wall clock.
    pub fn new() -> Self {
        let session = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        Self::with_session(session)
    }

    /// Create a generator with an explicit session seed.
    pub fn with_session(session: u128) -> Self {
        Self {
            session,
            next: 1,
            taken: HashSet::new(),
        }
    }

    /// Reserve ids that must never be handed out (e.g. ids from loaded data).
    pub fn reserve<'a>(&mut self, ids: impl IntoIterator<Item = &'a AnnotationId>) {
        self.taken.extend(ids.into_iter().cloned());
    }

    /// Produce the next unused id.
    pub fn next_id(&mut self) -> AnnotationId {
        loop {
            let candidate = AnnotationId::new(format!("{}-{}", self.session, self.next));
            self.next += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_skip_reserved() {
        let mut ids = IdGenerator::with_session(42);
        let reserved = AnnotationId::new("42-2");
        ids.reserve([&reserved]);

        let a = ids.next_id();
        let b = ids.next_id();
        assert_eq!(a.as_str(), "42-1");
        assert_eq!(b.as_str(), "42-3");
        assert_ne!(a, b);
    }

    #[test]
    fn test_numeric_ids_deserialize_as_text() {
        let id: AnnotationId = serde_json::from_str("1712345678901").expect("int id");
        assert_eq!(id.as_str(), "1712345678901");
        let id: AnnotationId = serde_json::from_str("\"abc\"").expect("string id");
        assert_eq!(id.as_str(), "abc");
        let id: AnnotationId = serde_json::from_str("3.0").expect("float id");
        assert_eq!(id.as_str(), "3");
        assert!(serde_json::from_str::<AnnotationId>("[1]").is_err());
    }
}
