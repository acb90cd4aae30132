//! Forgiving field readers for the analysis envelope.
//!
//! The service does not validate its own output: fields may be `null`, and
//! counts sometimes arrive as floats. These readers fall back to defaults
//! instead of failing the whole response.

use serde::{Deserialize, Deserializer};

/// `null` reads as `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Non-negative count from any JSON number; `null` reads as `None`.
pub fn count_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(|n| if n.is_finite() && n > 0.0 { n as u64 } else { 0 }))
}

/// Non-negative count from any JSON number; `null` reads as 0.
pub fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(count_opt(deserializer)?.unwrap_or_default())
}
