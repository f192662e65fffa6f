//! Cross-cutting, shared constants.
//!
//! Payload keys are part of the contract with the seeding side: a point written by
//! [`crate::seed`] must carry [`PAYLOAD_ROUTE_KEY`] and [`PAYLOAD_MODEL_KEY`] for the
//! router to attribute its score.

use std::time::Duration;

/// Name of the synthetic fallback route.
pub const DEFAULT_ROUTE_NAME: &str = "default";

/// Payload key holding the route label of a stored utterance.
pub const PAYLOAD_ROUTE_KEY: &str = "route";
/// Payload key holding the downstream model identifier.
pub const PAYLOAD_MODEL_KEY: &str = "model";
/// Payload key holding the utterance text.
pub const PAYLOAD_UTTERANCE_KEY: &str = "utterance";
/// Payload key holding the model provider (written by the seeder).
pub const PAYLOAD_PROVIDER_KEY: &str = "provider";

/// Keys that are never copied into a route's metadata snapshot.
pub const RESERVED_PAYLOAD_KEYS: [&str; 3] =
    [PAYLOAD_ROUTE_KEY, PAYLOAD_MODEL_KEY, PAYLOAD_UTTERANCE_KEY];

pub const DEFAULT_TOP_K: u64 = 3;

pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.5;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub const DEFAULT_COLLECTION_NAME: &str = "llm_routes";

pub const DEFAULT_EMBEDDING_TIMEOUT: Duration = Duration::from_millis(500);

/// Round-trip budget for a single dependency health probe.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Text embedded by the embedding health probe.
pub const HEALTH_PROBE_TEXT: &str = "health";

/// Response header describing the routing outcome.
pub const ROUTER_STATUS_HEADER: &str = "x-router-status";
pub const ROUTER_STATUS_ROUTED: &str = "routed";
pub const ROUTER_STATUS_DEFAULT: &str = "default";
pub const ROUTER_STATUS_ERROR: &str = "error";

/// Returns `true` if `key` is one of the payload keys excluded from metadata.
pub fn is_reserved_payload_key(key: &str) -> bool {
    RESERVED_PAYLOAD_KEYS.contains(&key)
}
