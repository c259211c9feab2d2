//! Typed field values and their conversion from raw source values.
//!
//! Every source hands back a `toml::Value`. File sources keep the variant
//! TOML parsed (integer, float, boolean, ...); flags, environment variables
//! and default literals arrive as `Value::String`. Each [`FieldValue`]
//! implementation converts the variants that make sense for it and rejects
//! the rest with a short reason.

use std::time::Duration;

use toml::Value;

use crate::types::ValueKind;

/// A type that can be bound to a configuration field.
pub trait FieldValue: Clone + Default + PartialEq + 'static {
    const KIND: ValueKind;

    /// Convert a raw source value into the native type.
    fn from_raw(raw: &Value) -> Result<Self, String>;

    /// Render the value back into a raw value (used by marshaling and
    /// validation).
    fn to_raw(&self) -> Value;

    /// Parse a textual literal (flags, env vars, defaults).
    fn from_text(text: &str) -> Result<Self, String> {
        Self::from_raw(&Value::String(text.to_string()))
    }

    /// Whether this is the type's zero value.
    fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl FieldValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn from_raw(raw: &Value) -> Result<Self, String> {
        match raw {
            Value::String(s) => Ok(s.clone()),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Boolean(b) => Ok(b.to_string()),
            Value::Datetime(d) => Ok(d.to_string()),
            other => Err(format!("expected a string, found {}", other.type_str())),
        }
    }

    fn to_raw(&self) -> Value {
        Value::String(self.clone())
    }
}

macro_rules! signed_field_value {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            const KIND: ValueKind = ValueKind::Int(<$ty>::BITS as u8);

            fn from_raw(raw: &Value) -> Result<Self, String> {
                let wide = match raw {
                    Value::Integer(i) => *i,
                    Value::String(s) => s
                        .trim()
                        .parse::<i64>()
                        .map_err(|e| format!("{s:?} is not an integer: {e}"))?,
                    other => return Err(format!("expected an integer, found {}", other.type_str())),
                };
                <$ty>::try_from(wide)
                    .map_err(|_| format!("{wide} is out of range for {}", stringify!($ty)))
            }

            fn to_raw(&self) -> Value {
                Value::Integer(*self as i64)
            }
        }
    )*};
}

macro_rules! unsigned_field_value {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            const KIND: ValueKind = ValueKind::Uint(<$ty>::BITS as u8);

            fn from_raw(raw: &Value) -> Result<Self, String> {
                let wide = match raw {
                    Value::Integer(i) => u64::try_from(*i)
                        .map_err(|_| format!("{i} is negative"))?,
                    Value::String(s) => s
                        .trim()
                        .parse::<u64>()
                        .map_err(|e| format!("{s:?} is not an unsigned integer: {e}"))?,
                    other => {
                        return Err(format!(
                            "expected an unsigned integer, found {}",
                            other.type_str()
                        ));
                    }
                };
                <$ty>::try_from(wide)
                    .map_err(|_| format!("{wide} is out of range for {}", stringify!($ty)))
            }

            fn to_raw(&self) -> Value {
                // TOML integers are signed 64-bit; larger values render as text.
                match i64::try_from(*self) {
                    Ok(i) => Value::Integer(i),
                    Err(_) => Value::String(self.to_string()),
                }
            }
        }
    )*};
}

signed_field_value!(i8, i16, i32, i64, isize);
unsigned_field_value!(u8, u16, u32, u64, usize);

macro_rules! float_field_value {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            const KIND: ValueKind = ValueKind::Float;

            fn from_raw(raw: &Value) -> Result<Self, String> {
                match raw {
                    Value::Float(f) => Ok(*f as $ty),
                    Value::Integer(i) => Ok(*i as $ty),
                    Value::String(s) => s
                        .trim()
                        .parse::<$ty>()
                        .map_err(|e| format!("{s:?} is not a number: {e}")),
                    other => Err(format!("expected a number, found {}", other.type_str())),
                }
            }

            fn to_raw(&self) -> Value {
                Value::Float(f64::from(*self))
            }
        }
    )*};
}

float_field_value!(f32, f64);

impl FieldValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_raw(raw: &Value) -> Result<Self, String> {
        match raw {
            Value::Boolean(b) => Ok(*b),
            Value::String(s) => parse_bool(s.trim()),
            other => Err(format!("expected a boolean, found {}", other.type_str())),
        }
    }

    fn to_raw(&self) -> Value {
        Value::Boolean(*self)
    }
}

impl FieldValue for Duration {
    const KIND: ValueKind = ValueKind::Duration;

    fn from_raw(raw: &Value) -> Result<Self, String> {
        match raw {
            Value::String(s) => parse_duration(s),
            Value::Integer(0) => Ok(Duration::ZERO),
            Value::Integer(i) => Err(format!("missing unit in duration {i}")),
            other => Err(format!("expected a duration, found {}", other.type_str())),
        }
    }

    fn to_raw(&self) -> Value {
        Value::String(humantime::format_duration(*self).to_string())
    }
}

/// Accepts the usual spellings: `1`/`0`, `t`/`f`, `true`/`false` in any case.
pub fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err(format!("{s:?} is not a boolean")),
    }
}

/// Parse a human-readable duration such as `10s`, `1h1m1s` or `300ms`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    humantime::parse_duration(s).map_err(|e| format!("{s:?} is not a duration: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_renders_scalars() {
        assert_eq!(String::from_raw(&Value::Integer(5)).unwrap(), "5");
        assert_eq!(String::from_raw(&Value::Boolean(true)).unwrap(), "true");
        assert!(String::from_raw(&Value::Array(vec![])).is_err());
    }

    #[test]
    fn integers_accept_native_and_text() {
        assert_eq!(i32::from_raw(&Value::Integer(42)).unwrap(), 42);
        assert_eq!(i32::from_text("-7").unwrap(), -7);
        assert_eq!(i64::KIND, ValueKind::Int(64));
        assert_eq!(u16::KIND, ValueKind::Uint(16));
    }

    #[test]
    fn integers_reject_out_of_range() {
        let err = i8::from_raw(&Value::Integer(300)).unwrap_err();
        assert!(err.contains("out of range"), "{err}");
        assert!(u32::from_raw(&Value::Integer(-1)).is_err());
        assert!(u8::from_text("abc").is_err());
    }

    #[test]
    fn large_unsigned_renders_as_text() {
        assert_eq!(u64::MAX.to_raw(), Value::String(u64::MAX.to_string()));
        assert_eq!(7u64.to_raw(), Value::Integer(7));
    }

    #[test]
    fn floats_accept_integers() {
        assert_eq!(f64::from_raw(&Value::Integer(3)).unwrap(), 3.0);
        assert_eq!(f32::from_text("1.5").unwrap(), 1.5);
    }

    #[test]
    fn bool_spellings() {
        assert!(bool::from_text("TRUE").unwrap());
        assert!(bool::from_text("1").unwrap());
        assert!(!bool::from_text("f").unwrap());
        assert!(bool::from_text("yes").is_err());
        assert!(bool::from_raw(&Value::Boolean(true)).unwrap());
    }

    #[test]
    fn durations_from_text() {
        assert_eq!(Duration::from_text("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(Duration::from_text("1m5s").unwrap(), Duration::from_secs(65));
        assert_eq!(
            Duration::from_text("1h1m1s").unwrap(),
            Duration::from_secs(3661)
        );
        assert_eq!(
            Duration::from_text("300ms").unwrap(),
            Duration::from_millis(300)
        );
        assert_eq!(Duration::from_text("0").unwrap(), Duration::ZERO);
        assert!(Duration::from_text("soon").is_err());
        assert!(Duration::from_raw(&Value::Integer(5)).is_err());
    }

    #[test]
    fn zero_detection() {
        assert!(String::new().is_zero());
        assert!(0u8.is_zero());
        assert!(false.is_zero());
        assert!(!true.is_zero());
        assert!(Duration::ZERO.is_zero());
        assert!(!1.5f64.is_zero());
    }
}
