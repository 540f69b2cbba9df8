// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Variant codec.
//!
//! [`decode`] maps wire variants into the [`TagValue`] taxonomy and is total:
//! unrecognized tags degrade to [`TagValue::Fallback`] with a single warning,
//! never an error. [`encode`] maps tag values back onto wire variants for
//! writes and is fallible: fallback values cannot be written, and arrays
//! degrade to the wire null.

use dabridge_core::TagValue;

use crate::error::{DaError, DaResult};
use crate::wire::{vt, CurrencyParts, Variant, VariantArray};

// =============================================================================
// Decode
// =============================================================================

/// Decodes a wire variant into a tag value.
///
/// Signed and unsigned integers land on the narrowest native type covering
/// their wire width. VT_I1 arrives as a character code and is reinterpreted
/// as a signed byte, preserving the wire's transport quirk.
///
/// # Examples
///
/// ```
/// use dabridge_core::TagValue;
/// use dabridge_opcda::codec::decode;
/// use dabridge_opcda::wire::{CurrencyParts, Variant};
/// use rust_decimal::Decimal;
///
/// let value = decode(&Variant::Currency(CurrencyParts::new(7, 5000)));
/// assert_eq!(value, TagValue::Currency(Decimal::new(75, 1)));
/// ```
pub fn decode(variant: &Variant) -> TagValue {
    match variant {
        Variant::Bool(v) => TagValue::Bool(*v),
        Variant::I1(c) => TagValue::Int8(*c as u8 as i8),
        Variant::UI1(v) => TagValue::UInt8(*v),
        Variant::I2(v) => TagValue::Int16(*v),
        Variant::UI2(v) => TagValue::UInt16(*v),
        Variant::I4(v) => TagValue::Int32(*v),
        Variant::UI4(v) => TagValue::UInt32(*v),
        Variant::I8(v) => TagValue::Int64(*v),
        Variant::R4(v) => TagValue::Float32(*v),
        Variant::R8(v) => TagValue::Float64(*v),
        Variant::Currency(parts) => TagValue::Currency(parts.to_decimal()),
        Variant::Date(v) => TagValue::DateTime(*v),
        Variant::BStr(v) => TagValue::String(v.clone()),
        Variant::Array(array) => decode_array(array),
        Variant::Empty => fallback("null", "VT_EMPTY", vt::EMPTY),
        Variant::Unknown {
            vt,
            class_name,
            printed,
        } => fallback(printed, class_name, *vt),
    }
}

fn decode_array(array: &VariantArray) -> TagValue {
    match array {
        VariantArray::Currency(parts) => {
            TagValue::CurrencyArray(parts.iter().map(|p| p.to_decimal()).collect())
        }
        VariantArray::Strings(items) => TagValue::StringArray(items.clone()),
        VariantArray::Values { elements, .. } => {
            TagValue::Array(elements.iter().map(decode).collect())
        }
    }
}

fn fallback(printed: &str, class_name: &str, tag: u16) -> TagValue {
    tracing::warn!(
        value = %printed,
        class = %class_name,
        vt = format_args!("{:#06x}", tag),
        "using fallback conversion for unhandled variant type"
    );
    TagValue::Fallback(printed.to_string())
}

// =============================================================================
// Encode
// =============================================================================

/// Encodes a tag value into a wire variant for writing.
///
/// Array values are not writable on this wire; they encode to the wire null
/// with a warning rather than failing the batch. Fallback values carry no
/// typed representation and are rejected with
/// [`DaError::UnsupportedValueType`].
pub fn encode(value: &TagValue) -> DaResult<Variant> {
    let variant = match value {
        TagValue::Bool(v) => Variant::Bool(*v),
        TagValue::Int8(v) => Variant::I1(*v as u8 as char),
        TagValue::Int16(v) => Variant::I2(*v),
        TagValue::Int32(v) => Variant::I4(*v),
        TagValue::Int64(v) => Variant::I8(*v),
        TagValue::UInt8(v) => Variant::UI1(*v),
        TagValue::UInt16(v) => Variant::UI2(*v),
        TagValue::UInt32(v) => Variant::UI4(*v),
        TagValue::Float32(v) => Variant::R4(*v),
        TagValue::Float64(v) => Variant::R8(*v),
        TagValue::String(v) => Variant::BStr(v.clone()),
        TagValue::DateTime(v) => Variant::Date(*v),
        TagValue::Currency(d) => {
            let parts = CurrencyParts::from_decimal(*d)
                .ok_or_else(|| DaError::unsupported_value_type("currency beyond wire range"))?;
            Variant::Currency(parts)
        }
        TagValue::Array(_) | TagValue::CurrencyArray(_) | TagValue::StringArray(_) => {
            tracing::warn!(
                kind = value.type_name(),
                "arrays are not supported for writes; sending wire null"
            );
            Variant::Empty
        }
        TagValue::Fallback(_) => {
            return Err(DaError::unsupported_value_type(value.type_name()))
        }
    };

    Ok(variant)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode(&Variant::Bool(true)), TagValue::Bool(true));
        assert_eq!(decode(&Variant::I2(-12)), TagValue::Int16(-12));
        assert_eq!(decode(&Variant::UI2(12)), TagValue::UInt16(12));
        assert_eq!(decode(&Variant::I4(-1000)), TagValue::Int32(-1000));
        assert_eq!(decode(&Variant::UI4(1000)), TagValue::UInt32(1000));
        assert_eq!(decode(&Variant::I8(1 << 40)), TagValue::Int64(1 << 40));
        assert_eq!(decode(&Variant::R4(1.5)), TagValue::Float32(1.5));
        assert_eq!(decode(&Variant::R8(2.5)), TagValue::Float64(2.5));
        assert_eq!(
            decode(&Variant::BStr("hello".into())),
            TagValue::String("hello".into())
        );
    }

    #[test]
    fn test_decode_i1_reinterprets_character_code() {
        // character code 0xFF is the signed byte -1
        assert_eq!(decode(&Variant::I1('\u{ff}')), TagValue::Int8(-1));
        assert_eq!(decode(&Variant::I1('A')), TagValue::Int8(65));
    }

    #[test]
    fn test_decode_currency_is_exact() {
        let value = decode(&Variant::Currency(CurrencyParts::new(7, 5000)));
        assert_eq!(value, TagValue::Currency(Decimal::new(75, 1)));
    }

    #[test]
    fn test_decode_date() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        assert_eq!(decode(&Variant::Date(ts)), TagValue::DateTime(ts));
    }

    #[test]
    fn test_decode_currency_array() {
        let array = Variant::Array(VariantArray::Currency(vec![
            CurrencyParts::new(1, 2500),
            CurrencyParts::new(-2, -5000),
        ]));

        assert_eq!(
            decode(&array),
            TagValue::CurrencyArray(vec![Decimal::new(125, 2), Decimal::new(-25, 1)])
        );
    }

    #[test]
    fn test_decode_string_array() {
        let array = Variant::Array(VariantArray::Strings(vec!["a".into(), "b".into()]));
        assert_eq!(
            decode(&array),
            TagValue::StringArray(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn test_decode_generic_array_passes_elements_through() {
        let array = Variant::Array(VariantArray::Values {
            element_vt: vt::I4,
            elements: vec![Variant::I4(1), Variant::I4(2)],
        });

        assert_eq!(
            decode(&array),
            TagValue::Array(vec![TagValue::Int32(1), TagValue::Int32(2)])
        );
    }

    #[test]
    fn test_decode_unknown_never_errors() {
        let variant = Variant::Unknown {
            vt: 0x000A,
            class_name: "SCODE".into(),
            printed: "0x80004005".into(),
        };

        assert_eq!(decode(&variant), TagValue::Fallback("0x80004005".into()));
    }

    #[test]
    fn test_decode_empty_falls_back() {
        assert_eq!(decode(&Variant::Empty), TagValue::Fallback("null".into()));
    }

    #[test]
    fn test_encode_scalars_round_trip() {
        let values = vec![
            TagValue::Bool(false),
            TagValue::Int8(-7),
            TagValue::Int16(-300),
            TagValue::Int32(70_000),
            TagValue::Int64(-1 << 40),
            TagValue::UInt8(200),
            TagValue::UInt16(60_000),
            TagValue::UInt32(4_000_000_000),
            TagValue::Float32(1.25),
            TagValue::Float64(-2.5),
            TagValue::String("plant".into()),
            TagValue::Currency(Decimal::new(75, 1)),
        ];

        for value in values {
            let variant = encode(&value).unwrap();
            assert_eq!(decode(&variant), value);
        }
    }

    #[test]
    fn test_encode_currency_produces_wire_parts() {
        let variant = encode(&TagValue::Currency(Decimal::new(75, 1))).unwrap();
        assert_eq!(variant, Variant::Currency(CurrencyParts::new(7, 5000)));
    }

    #[test]
    fn test_encode_arrays_degrade_to_wire_null() {
        let values = vec![
            TagValue::Array(vec![TagValue::Int32(1)]),
            TagValue::CurrencyArray(vec![Decimal::ONE]),
            TagValue::StringArray(vec!["a".into()]),
        ];

        for value in values {
            assert_eq!(encode(&value).unwrap(), Variant::Empty);
        }
    }

    #[test]
    fn test_encode_fallback_is_rejected() {
        let error = encode(&TagValue::Fallback("?".into())).unwrap_err();
        assert!(matches!(error, DaError::UnsupportedValueType { .. }));
        assert!(error.to_string().contains("fallback"));
    }
}
