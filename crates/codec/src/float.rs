//! Number and vector encodings shared by the writer and the reader.
//!
//! A float is written as the integer `0` or `1` when it is exactly that
//! value, otherwise as eight uppercase hex digits of its IEEE-754 bit
//! pattern (compact mode) or as a decimal literal (human-readable mode).
//! All three shapes decode, whatever mode produced them.

use glam::Vec2;
use serde_json::{Map, Number, Value};

/// How non-trivial floats are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatMode {
    /// Hex bit patterns. Round-trips every value exactly.
    #[default]
    Compact,
    /// Decimal literals, easier to read and diff.
    HumanReadable,
}

/// Eight uppercase hex digits of the bit pattern, e.g. `0.5` is `"3F000000"`.
pub fn float_to_hex(f: f32) -> String {
    format!("{:08X}", f.to_bits())
}

/// Inverse of [`float_to_hex`]. Accepts either case and an optional `0x`.
pub fn hex_to_float(s: &str) -> Option<f32> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16).ok().map(f32::from_bits)
}

/// Positive zero only; `-0.0` keeps its sign through the hex path.
pub(crate) fn is_zero(f: f32) -> bool {
    f.to_bits() == 0
}

pub fn encode_float(f: f32, mode: FloatMode) -> Value {
    if is_zero(f) {
        return Value::from(0);
    }
    if f == 1.0 {
        return Value::from(1);
    }
    match mode {
        FloatMode::Compact => Value::String(float_to_hex(f)),
        // JSON has no literal for NaN or infinity, those fall back to hex.
        FloatMode::HumanReadable => Number::from_f64(f as f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(float_to_hex(f))),
    }
}

/// Decode any of the three float shapes. `None` for anything else.
pub fn decode_float(value: &Value) -> Option<f32> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i as f32),
            None => n.as_f64().map(|f| f as f32),
        },
        Value::String(s) => hex_to_float(s),
        _ => None,
    }
}

/// The zero vector is the integer `0`, anything else `{"x":…,"y":…}`.
pub fn encode_vec2(v: Vec2, mode: FloatMode) -> Value {
    if is_zero(v.x) && is_zero(v.y) {
        return Value::from(0);
    }
    let mut obj = Map::new();
    obj.insert("x".into(), encode_float(v.x, mode));
    obj.insert("y".into(), encode_float(v.y, mode));
    Value::Object(obj)
}

pub fn decode_vec2(value: &Value) -> Option<Vec2> {
    match value {
        Value::Number(n) if n.as_f64() == Some(0.0) => Some(Vec2::ZERO),
        Value::Object(obj) => Some(Vec2::new(
            obj.get("x").and_then(decode_float).unwrap_or(0.0),
            obj.get("y").and_then(decode_float).unwrap_or(0.0),
        )),
        _ => None,
    }
}

/// Column-wise vertex array: `{"x":[x0,x1,…],"y":[y0,y1,…]}`.
pub fn encode_vec2_array(vs: &[Vec2], mode: FloatMode) -> Value {
    let mut obj = Map::new();
    obj.insert(
        "x".into(),
        Value::Array(vs.iter().map(|v| encode_float(v.x, mode)).collect()),
    );
    obj.insert(
        "y".into(),
        Value::Array(vs.iter().map(|v| encode_float(v.y, mode)).collect()),
    );
    Value::Object(obj)
}

/// Inverse of [`encode_vec2_array`]. Mismatched columns are truncated to the
/// shorter one; undecodable elements read as zero.
pub fn decode_vec2_array(value: &Value) -> Vec<Vec2> {
    let column = |key: &str| -> Vec<f32> {
        value
            .get(key)
            .and_then(Value::as_array)
            .map(|a| a.iter().map(|v| decode_float(v).unwrap_or(0.0)).collect())
            .unwrap_or_default()
    };
    let xs = column("x");
    let ys = column("y");
    xs.into_iter()
        .zip(ys)
        .map(|(x, y)| Vec2::new(x, y))
        .collect()
}

pub fn encode_float_array(fs: &[f32], mode: FloatMode) -> Value {
    Value::Array(fs.iter().map(|&f| encode_float(f, mode)).collect())
}

pub fn decode_float_array(value: &Value) -> Vec<f32> {
    value
        .as_array()
        .map(|a| a.iter().map(|v| decode_float(v).unwrap_or(0.0)).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_and_one_are_integers_in_both_modes() {
        for mode in [FloatMode::Compact, FloatMode::HumanReadable] {
            assert_eq!(encode_float(0.0, mode), json!(0));
            assert_eq!(encode_float(1.0, mode), json!(1));
        }
    }

    #[test]
    fn hex_is_bit_pattern() {
        assert_eq!(float_to_hex(0.5), "3F000000");
        assert_eq!(float_to_hex(-2.0), "C0000000");
        assert_eq!(encode_float(0.5, FloatMode::Compact), json!("3F000000"));
        assert_eq!(hex_to_float("3f000000"), Some(0.5));
        assert_eq!(hex_to_float("0x3F800000"), Some(1.0));
        assert_eq!(hex_to_float("not hex"), None);
    }

    #[test]
    fn compact_round_trip_is_exact() {
        for f in [3.14f32, -0.1, 1e-30, f32::MAX, f32::MIN_POSITIVE, -0.0] {
            let back = decode_float(&encode_float(f, FloatMode::Compact)).unwrap();
            assert_eq!(back.to_bits(), f.to_bits(), "{f}");
        }
        let nan = f32::from_bits(0x7fc0_0001);
        let back = decode_float(&encode_float(nan, FloatMode::Compact)).unwrap();
        assert_eq!(back.to_bits(), nan.to_bits());
    }

    #[test]
    fn human_readable_round_trip() {
        for f in [3.14f32, -0.1, 123456.79, 1e-7] {
            let v = encode_float(f, FloatMode::HumanReadable);
            assert!(v.is_number());
            assert_eq!(decode_float(&v).unwrap().to_bits(), f.to_bits(), "{f}");
        }
        assert!(encode_float(f32::INFINITY, FloatMode::HumanReadable).is_string());
    }

    #[test]
    fn decode_accepts_all_shapes() {
        assert_eq!(decode_float(&json!(2)), Some(2.0));
        assert_eq!(decode_float(&json!(0.25)), Some(0.25));
        assert_eq!(decode_float(&json!("40490FDB")), Some(std::f32::consts::PI));
        assert_eq!(decode_float(&json!(true)), None);
        assert_eq!(decode_float(&json!(null)), None);
    }

    #[test]
    fn zero_vector_is_integer_zero() {
        assert_eq!(encode_vec2(Vec2::ZERO, FloatMode::Compact), json!(0));
        assert_eq!(decode_vec2(&json!(0)), Some(Vec2::ZERO));
        assert_eq!(
            encode_vec2(Vec2::new(1.0, 0.5), FloatMode::Compact),
            json!({"x": 1, "y": "3F000000"})
        );
        assert_eq!(decode_vec2(&json!({"x": 2})), Some(Vec2::new(2.0, 0.0)));
        assert_eq!(decode_vec2(&json!("oops")), None);
    }

    #[test]
    fn vertex_arrays_are_column_wise() {
        let vs = [Vec2::new(0.0, 1.0), Vec2::new(0.5, -0.5)];
        let v = encode_vec2_array(&vs, FloatMode::Compact);
        assert_eq!(v, json!({"x": [0, "3F000000"], "y": [1, "BF000000"]}));
        assert_eq!(decode_vec2_array(&v), vs.to_vec());
        assert_eq!(
            decode_vec2_array(&json!({"x": [1, 2, 3], "y": [4]})),
            vec![Vec2::new(1.0, 4.0)]
        );
        assert!(decode_vec2_array(&json!(0)).is_empty());
    }

    #[test]
    fn float_arrays() {
        let fs = [0.0, 1.0, 0.25];
        let v = encode_float_array(&fs, FloatMode::Compact);
        assert_eq!(v, json!([0, 1, "3E800000"]));
        assert_eq!(decode_float_array(&v), fs.to_vec());
    }
}
