//! Stable numeric identities for catalog entries

use crate::catalog::naming::normalize_name;

/// Upper bound (exclusive) of every stable ID
pub const ID_MODULUS: u64 = 1_000_000_000;

/// Derives a deterministic ID from a name
///
/// The name is normalized first, so `"Alita (2019)"` and `"alita.2019"`
/// share an ID. The hash is a base-31 polynomial over the UTF-16 code units
/// of the normalized name, reduced to 32 bits as a signed two's-complement
/// integer (`i32` wrapping arithmetic). Its absolute value is then reduced
/// modulo [`ID_MODULUS`]. Hashes with the high bit set are negative before
/// the absolute value is taken, so they do not equal the unsigned 32-bit
/// mask of the same polynomial. The result is stable across runs and
/// machines.
///
/// Distinct names may collide; callers do not detect this.
///
/// # Example
///
/// ```
/// use reel_harvest::catalog::stable_id;
///
/// assert_eq!(stable_id("ABC"), 96354);
/// assert_eq!(stable_id("Alita (2019)"), stable_id("alita.2019"));
/// ```
pub fn stable_id(name: &str) -> u64 {
    let normalized = normalize_name(name);

    let hash = normalized
        .encode_utf16()
        .fold(0i32, |acc, unit| acc.wrapping_mul(31).wrapping_add(unit as i32));

    (hash as i64).unsigned_abs() % ID_MODULUS
}
