//! Deterministic fixture identifiers.

use uuid::Uuid;

/// A stable UUID whose last group encodes `n`, e.g. `fixture_id(7)` is
/// `00000000-0000-0000-0000-000000000007`.
pub fn fixture_id(n: u64) -> Uuid {
    Uuid::from_u128(n as u128)
}
