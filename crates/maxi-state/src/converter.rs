//! Conversion contract between structured values and stored strings

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// Converts a structured value to and from its stored string form
///
/// # Laws
/// - `decode(Some(&encode(v))) == v` for every value `v`
/// - `decode(None)` and `decode(Some(""))` return `Self::Value::default()`
pub trait StateConverter {
    /// Structured value handled by this converter
    type Value: Default;

    /// Encode a value for storage
    fn encode(value: &Self::Value) -> String;

    /// Decode a stored value, falling back to the default
    fn decode(raw: Option<&str>) -> Self::Value;
}

/// Converter storing its value as a JSON document
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStateConverter<T>(PhantomData<T>);

impl<T> StateConverter for JsonStateConverter<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    type Value = T;

    fn encode(value: &T) -> String {
        // Plain structs with string keys always serialize.
        serde_json::to_string(value).unwrap_or_default()
    }

    fn decode(raw: Option<&str>) -> T {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return T::default();
        };

        match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    "Unreadable {} value, using default: {}",
                    std::any::type_name::<T>(),
                    e
                );
                T::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    type CounterConverter = JsonStateConverter<Counter>;

    #[test]
    fn absent_and_blank_decode_to_default() {
        assert_eq!(CounterConverter::decode(None), Counter::default());
        assert_eq!(CounterConverter::decode(Some("")), Counter::default());
        assert_eq!(CounterConverter::decode(Some("   ")), Counter::default());
    }

    #[test]
    fn garbage_decodes_to_default() {
        assert_eq!(CounterConverter::decode(Some("{not json")), Counter::default());
    }

    #[test]
    fn encode_is_json() {
        assert_eq!(CounterConverter::encode(&Counter { count: 3 }), r#"{"count":3}"#);
    }
}
