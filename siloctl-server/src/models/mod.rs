//! Domain models with validation at construction
//!
//! Raw JSON input is checked field by field when building these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod user;
pub mod silobag;

pub use validation::ValidationError;
pub use user::{Email, UserId};
pub use silobag::{NewSilobag, SilobagPatch, UpdatableField};

use serde_json::Value;

/// Read a JSON value as an integer.
///
/// Integral floats such as `1.0` are accepted; anything outside the
/// `i64` range is not.
pub fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }

    let f = value.as_f64()?;
    if f.fract() != 0.0 || f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return None;
    }
    Some(f as i64)
}
