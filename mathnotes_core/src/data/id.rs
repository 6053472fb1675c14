use chrono::Utc;
use serde::{de, Deserialize, Deserializer};

/// Declares a `u64` entity id newtype. Ids serialize as plain numbers and
/// deserialize from either a number or a numeric string, since some
/// json-server versions hand ids back as strings.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                $crate::data::id::deserialize_id(deserializer).map($name)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                $name(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub(crate) use entity_id;

pub(crate) fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => {
            text.trim().parse().map_err(|_| de::Error::custom(format!("invalid id {text:?}")))
        }
    }
}

/// Hands out ids for new entities.
///
/// Ids are seeded from the wall clock in milliseconds, but the generator never
/// issues the same id twice and never goes backwards, even when several
/// entities are created within the same millisecond or the clock is adjusted.
#[derive(Debug, Default)]
pub struct IdGenerator {
    /// The largest id issued or observed so far.
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator::default()
    }

    pub fn next_id(&mut self) -> u64 {
        self.next_id_at(now_millis())
    }

    /// Returns `now_millis` unless that would not be greater than every id
    /// handed out so far, in which case the successor of the last id is used.
    pub fn next_id_at(&mut self, now_millis: u64) -> u64 {
        let id = now_millis.max(self.last.saturating_add(1));
        self.last = id;
        id
    }

    /// Marks `id` as taken, so that every id issued afterwards is greater.
    pub fn observe(&mut self, id: u64) {
        self.last = self.last.max(id);
    }
}

fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}
