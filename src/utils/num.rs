//! Numeric utilities: centralized integer conversions.
//!
//! Saturating conversions are used where clamping is safer than panicking or
//! truncating (latencies in logs).

#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn usize_to_u64(v: usize) -> u64 {
    v as u64
}

#[inline]
#[must_use]
pub fn u128_to_u64_saturating(v: u128) -> u64 {
    u64::try_from(v).unwrap_or(u64::MAX)
}
