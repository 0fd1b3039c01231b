//! Stable identifiers for network entities.
//!
//! Ids are handed out monotonically by [`NetworkDocument`](super::NetworkDocument)
//! and never reused, so they double as the creation order of each entity kind.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

entity_id!(StationId, "station #");
entity_id!(LineId, "line #");
entity_id!(AreaId, "area #");
entity_id!(EventId, "event #");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_number() {
        assert_eq!(StationId(4).to_string(), "station #4");
        assert_eq!(LineId(0).to_string(), "line #0");
        assert_eq!(AreaId(12).to_string(), "area #12");
        assert_eq!(EventId(7).to_string(), "event #7");
    }

    #[test]
    fn test_ids_order_by_creation() {
        assert!(StationId(1) < StationId(2));
    }
}
