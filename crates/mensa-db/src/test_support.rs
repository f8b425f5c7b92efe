//! Shared test utilities for mensa-db tests.

use mensa_core::entities::HallSeed;

use crate::MensaDb;

/// Create an in-memory database for testing.
pub async fn test_db() -> MensaDb {
    MensaDb::open_local(":memory:").await.unwrap()
}

/// Two synthetic halls, enough to cover slug lookup and ordering.
pub fn sample_halls() -> Vec<HallSeed> {
    vec![
        HallSeed {
            slug: "north-commons".to_string(),
            name: "North Commons".to_string(),
        },
        HallSeed {
            slug: "south-refectory".to_string(),
            name: "South Refectory".to_string(),
        },
    ]
}
