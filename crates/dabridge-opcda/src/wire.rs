// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Wire-level variant model.
//!
//! OPC-DA carries values as COM VARIANTs. This module models the subset of
//! variant types the bridge handles as a closed enum; anything the session
//! layer cannot place in that set arrives as [`Variant::Unknown`] carrying
//! the raw type tag and a stringified rendering, so the decode path stays
//! total.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

// =============================================================================
// VARTYPE Tags
// =============================================================================

/// COM VARTYPE tags for the variant types on this path.
pub mod vt {
    /// VT_EMPTY
    pub const EMPTY: u16 = 0x0000;
    /// VT_I2
    pub const I2: u16 = 0x0002;
    /// VT_I4
    pub const I4: u16 = 0x0003;
    /// VT_R4
    pub const R4: u16 = 0x0004;
    /// VT_R8
    pub const R8: u16 = 0x0005;
    /// VT_CY
    pub const CY: u16 = 0x0006;
    /// VT_DATE
    pub const DATE: u16 = 0x0007;
    /// VT_BSTR
    pub const BSTR: u16 = 0x0008;
    /// VT_BOOL
    pub const BOOL: u16 = 0x000B;
    /// VT_I1
    pub const I1: u16 = 0x0010;
    /// VT_UI1
    pub const UI1: u16 = 0x0011;
    /// VT_UI2
    pub const UI2: u16 = 0x0012;
    /// VT_UI4
    pub const UI4: u16 = 0x0013;
    /// VT_I8
    pub const I8: u16 = 0x0014;
    /// VT_INT (platform int, 4 bytes here; normalized to VT_I4)
    pub const INT: u16 = 0x0016;
    /// VT_UINT (normalized to VT_UI4)
    pub const UINT: u16 = 0x0017;
    /// VT_ARRAY flag, combined with the element tag.
    pub const ARRAY: u16 = 0x2000;

    /// Canonicalizes a tag before variant construction.
    ///
    /// VT_INT and VT_UINT are 4 bytes wide on this wire and fold onto
    /// VT_I4/VT_UI4; every other tag passes through unchanged. Session
    /// layers call this so the variant set stays closed over the canonical
    /// tags.
    pub fn normalize(tag: u16) -> u16 {
        match tag {
            INT => I4,
            UINT => UI4,
            other => other,
        }
    }
}

/// OPC quality word for a good read.
pub const QUALITY_GOOD: i16 = 0x00C0;

// =============================================================================
// CurrencyParts
// =============================================================================

/// Fixed-point currency wire form.
///
/// The decoded amount is `units + fraction / 10,000`. The fraction carries
/// the same sign as the amount, so `-6.5` is `{ units: -6, fraction: -5000 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyParts {
    /// Whole currency units.
    pub units: i64,
    /// Fractional units, scaled by 1/10,000.
    pub fraction: i32,
}

impl CurrencyParts {
    /// Creates currency parts.
    pub fn new(units: i64, fraction: i32) -> Self {
        Self { units, fraction }
    }

    /// Converts to the exact decimal amount.
    ///
    /// # Examples
    ///
    /// ```
    /// use dabridge_opcda::wire::CurrencyParts;
    /// use rust_decimal::Decimal;
    ///
    /// let amount = CurrencyParts::new(7, 5000).to_decimal();
    /// assert_eq!(amount, Decimal::new(75, 1));
    /// ```
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.units) + Decimal::new(self.fraction as i64, 4)
    }

    /// Decomposes a decimal amount into wire parts.
    ///
    /// The amount is normalized to four fractional digits first. Returns
    /// `None` when the whole part does not fit the wire's 64-bit units field.
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        let normalized = value.round_dp(4);
        let units = normalized.trunc();
        let fraction = (normalized - units) * Decimal::from(10_000);

        Some(Self {
            units: units.to_i64()?,
            fraction: fraction.to_i32()?,
        })
    }
}

// =============================================================================
// Variant
// =============================================================================

/// A wire value as handed over by the session layer.
///
/// The set is closed: the session layer normalizes VT_INT/VT_UINT onto
/// [`Variant::I4`]/[`Variant::UI4`] and renders every other unhandled tag as
/// [`Variant::Unknown`].
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    /// VT_EMPTY; also the wire null substituted for unwritable values.
    Empty,

    /// VT_BOOL.
    Bool(bool),

    /// VT_I1. The wire transports the byte as a character code.
    I1(char),

    /// VT_UI1.
    UI1(u8),

    /// VT_I2.
    I2(i16),

    /// VT_UI2.
    UI2(u16),

    /// VT_I4 (also VT_INT, normalized).
    I4(i32),

    /// VT_UI4 (also VT_UINT, normalized).
    UI4(u32),

    /// VT_I8.
    I8(i64),

    /// VT_R4.
    R4(f32),

    /// VT_R8.
    R8(f64),

    /// VT_CY.
    Currency(CurrencyParts),

    /// VT_DATE.
    Date(DateTime<Utc>),

    /// VT_BSTR.
    BStr(String),

    /// VT_ARRAY | element tag.
    Array(VariantArray),

    /// Any tag outside the closed set.
    Unknown {
        /// The raw VARTYPE tag.
        vt: u16,
        /// Name of the native class the session layer materialized.
        class_name: String,
        /// Stringified rendering of the value.
        printed: String,
    },
}

impl Variant {
    /// Returns the VARTYPE tag for this variant.
    pub fn vt(&self) -> u16 {
        match self {
            Variant::Empty => vt::EMPTY,
            Variant::Bool(_) => vt::BOOL,
            Variant::I1(_) => vt::I1,
            Variant::UI1(_) => vt::UI1,
            Variant::I2(_) => vt::I2,
            Variant::UI2(_) => vt::UI2,
            Variant::I4(_) => vt::I4,
            Variant::UI4(_) => vt::UI4,
            Variant::I8(_) => vt::I8,
            Variant::R4(_) => vt::R4,
            Variant::R8(_) => vt::R8,
            Variant::Currency(_) => vt::CY,
            Variant::Date(_) => vt::DATE,
            Variant::BStr(_) => vt::BSTR,
            Variant::Array(array) => vt::ARRAY | array.element_vt(),
            Variant::Unknown { vt, .. } => *vt,
        }
    }

    /// Returns `true` if this is the wire null.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Variant::Empty)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Empty => write!(f, "null"),
            Variant::Bool(v) => write!(f, "{}", v),
            Variant::I1(v) => write!(f, "{}", *v as u8 as i8),
            Variant::UI1(v) => write!(f, "{}", v),
            Variant::I2(v) => write!(f, "{}", v),
            Variant::UI2(v) => write!(f, "{}", v),
            Variant::I4(v) => write!(f, "{}", v),
            Variant::UI4(v) => write!(f, "{}", v),
            Variant::I8(v) => write!(f, "{}", v),
            Variant::R4(v) => write!(f, "{}", v),
            Variant::R8(v) => write!(f, "{}", v),
            Variant::Currency(v) => write!(f, "{}", v.to_decimal()),
            Variant::Date(v) => write!(f, "{}", v.to_rfc3339()),
            Variant::BStr(v) => write!(f, "{}", v),
            Variant::Array(array) => write!(f, "array[{}]", array.len()),
            Variant::Unknown { printed, .. } => write!(f, "{}", printed),
        }
    }
}

// =============================================================================
// VariantArray
// =============================================================================

/// A homogeneous wire array.
///
/// Currency and string arrays are carried in dedicated forms because the
/// decode path special-cases them; all other element types stay as variants.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantArray {
    /// VT_ARRAY | VT_CY.
    Currency(Vec<CurrencyParts>),

    /// VT_ARRAY | VT_BSTR.
    Strings(Vec<String>),

    /// Any other element type.
    Values {
        /// VARTYPE tag of the elements.
        element_vt: u16,
        /// The elements.
        elements: Vec<Variant>,
    },
}

impl VariantArray {
    /// Returns the element VARTYPE tag.
    pub fn element_vt(&self) -> u16 {
        match self {
            VariantArray::Currency(_) => vt::CY,
            VariantArray::Strings(_) => vt::BSTR,
            VariantArray::Values { element_vt, .. } => *element_vt,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            VariantArray::Currency(v) => v.len(),
            VariantArray::Strings(v) => v.len(),
            VariantArray::Values { elements, .. } => elements.len(),
        }
    }

    /// Returns `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// ItemState
// =============================================================================

/// One item read as reported by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemState {
    /// The wire value.
    pub value: Variant,
    /// Server-reported error code.
    pub error_code: i32,
    /// OPC quality word.
    pub quality: i16,
    /// Server timestamp for the read.
    pub timestamp: DateTime<Utc>,
}

impl ItemState {
    /// Creates an item state.
    pub fn new(value: Variant, error_code: i32, quality: i16, timestamp: DateTime<Utc>) -> Self {
        Self {
            value,
            error_code,
            quality,
            timestamp,
        }
    }

    /// Creates a good-quality state stamped with the current time.
    pub fn good(value: Variant) -> Self {
        Self::new(value, 0, QUALITY_GOOD, Utc::now())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parts_to_decimal() {
        assert_eq!(CurrencyParts::new(7, 5000).to_decimal(), Decimal::new(75, 1));
        assert_eq!(CurrencyParts::new(0, 1).to_decimal(), Decimal::new(1, 4));
        assert_eq!(CurrencyParts::new(-6, -5000).to_decimal(), Decimal::new(-65, 1));
    }

    #[test]
    fn test_currency_parts_from_decimal() {
        let parts = CurrencyParts::from_decimal(Decimal::new(75, 1)).unwrap();
        assert_eq!(parts, CurrencyParts::new(7, 5000));

        let parts = CurrencyParts::from_decimal(Decimal::new(-65, 1)).unwrap();
        assert_eq!(parts, CurrencyParts::new(-6, -5000));
    }

    #[test]
    fn test_currency_round_trip_is_exact() {
        for raw in [Decimal::new(75, 1), Decimal::new(-123_456_789, 4), Decimal::ZERO] {
            let parts = CurrencyParts::from_decimal(raw).unwrap();
            assert_eq!(parts.to_decimal(), raw);
        }
    }

    #[test]
    fn test_currency_from_decimal_normalizes_scale() {
        // 1.23456 rounds to 1.2346 before decomposition
        let parts = CurrencyParts::from_decimal(Decimal::new(123_456, 5)).unwrap();
        assert_eq!(parts, CurrencyParts::new(1, 2346));
    }

    #[test]
    fn test_variant_vt_tags() {
        assert_eq!(Variant::Bool(true).vt(), vt::BOOL);
        assert_eq!(Variant::I1('A').vt(), vt::I1);
        assert_eq!(Variant::Currency(CurrencyParts::new(1, 0)).vt(), vt::CY);
        assert_eq!(
            Variant::Array(VariantArray::Strings(vec!["a".into()])).vt(),
            vt::ARRAY | vt::BSTR
        );
        assert_eq!(
            Variant::Unknown {
                vt: 0x000A,
                class_name: "SCODE".into(),
                printed: "0".into()
            }
            .vt(),
            0x000A
        );
    }

    #[test]
    fn test_vt_normalization_folds_platform_ints() {
        assert_eq!(vt::normalize(vt::INT), vt::I4);
        assert_eq!(vt::normalize(vt::UINT), vt::UI4);
        assert_eq!(vt::normalize(vt::BSTR), vt::BSTR);
        assert_eq!(vt::normalize(vt::ARRAY | vt::CY), vt::ARRAY | vt::CY);
    }

    #[test]
    fn test_item_state_good() {
        let state = ItemState::good(Variant::I4(1));
        assert_eq!(state.error_code, 0);
        assert_eq!(state.quality, QUALITY_GOOD);
    }
}
