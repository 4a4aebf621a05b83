//! Scalar codec: byte-order integers and the format's 8-byte hexadecimal
//! real number (1-bit sign, 7-bit excess-64 base-16 exponent, 56-bit
//! mantissa).

use anyhow::{anyhow, Result};

/// Smallest positive magnitude representable without flushing to zero:
/// `16^(-64) * 16^-1` is already below the smallest normalized mantissa,
/// so the smallest representable nonzero value is `16^-65` (mantissa
/// `0x01` at exponent `-64`, i.e. `1/16 * 16^-64`).
const MIN_EXPONENT: i64 = -64;
const MAX_EXPONENT: i64 = 63;

/// Decode the format's 8-byte hexadecimal real from its raw bit pattern.
///
/// `decode(bits) == sign * mantissa * 16^(exponent - 64)`, mantissa read
/// as an unsigned fraction in `[0, 1)` from the low 56 bits.
pub fn decode_real(bits: u64) -> f64 {
    if bits == 0 {
        return 0.0;
    }
    let sign = if bits & 0x8000_0000_0000_0000 != 0 {
        -1.0
    } else {
        1.0
    };
    let exponent = ((bits >> 56) & 0x7f) as i32 - 64;
    let mantissa = (bits & 0x00ff_ffff_ffff_ffff) as f64 / (1u64 << 56) as f64;
    sign * mantissa * 16f64.powi(exponent)
}

/// Encode an IEEE double into the format's 8-byte hexadecimal real.
///
/// Extracts sign/exponent/mantissa directly from the IEEE-754 bit layout
/// (mask and shift) rather than formatting and reparsing a string.
/// Errors if the magnitude's base-16 exponent would not fit in the
/// 7-bit excess-64 field; flushes to zero if it underflows below the
/// smallest representable magnitude.
pub fn encode_real(value: f64) -> Result<u64> {
    if value == 0.0 {
        return Ok(0);
    }
    if !value.is_finite() {
        return Err(anyhow!("cannot encode non-finite real value {value}"));
    }

    let sign_bit = if value.is_sign_negative() {
        0x8000_0000_0000_0000u64
    } else {
        0
    };
    let bits = value.abs().to_bits();
    let ieee_exponent = ((bits >> 52) & 0x7ff) as i64 - 1023;
    let ieee_mantissa = bits & 0x000f_ffff_ffff_ffff;
    // Reinstate the implicit leading 1 bit; value = frac52 * 2^(ieee_exponent - 52)
    // frac52 has 53 significant bits (with the implicit bit at position 52).
    let frac53 = ieee_mantissa | (1u64 << 52);
    let bin_exponent = ieee_exponent - 52;

    // mantissa_56 = frac53 * 2^(bin_exponent - 4*hex_exponent + 56); pick
    // hex_exponent so the shift lands in [0, 3], keeping the 53-bit frac53
    // inside the 56-bit mantissa field with its leading hex digit nonzero.
    let k = bin_exponent + 56;
    let mut hex_exponent = k.div_euclid(4);
    let shift = k.rem_euclid(4);
    let mut mantissa = frac53 << shift;

    // mantissa can overflow 56 bits only from the shift pushing the top
    // bit past bit 55; push it back down into range.
    while mantissa > 0x00ff_ffff_ffff_ffff {
        mantissa >>= 4;
        hex_exponent += 1;
    }

    if hex_exponent > MAX_EXPONENT {
        return Err(anyhow!(
            "real value {value} overflows the format's representable range (hex exponent {hex_exponent} > {MAX_EXPONENT})"
        ));
    }
    if hex_exponent < MIN_EXPONENT {
        // Flush-to-zero underflow policy.
        return Ok(0);
    }

    let biased_exponent = (hex_exponent + 64) as u64;
    Ok(sign_bit | (biased_exponent << 56) | (mantissa & 0x00ff_ffff_ffff_ffff))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.5, 0x4080_0000_0000_0000)]
    #[case(-0.5, 0xC080_0000_0000_0000)]
    #[case(1.5, 0x4118_0000_0000_0000)]
    #[case(100.0, 0x4264_0000_0000_0000)]
    #[case(0.0, 0)]
    fn encode_matches_reference(#[case] value: f64, #[case] expected: u64) {
        assert_eq!(encode_real(value).unwrap(), expected);
    }

    #[rstest]
    #[case(0.5)]
    #[case(-0.5)]
    #[case(1.5)]
    #[case(100.0)]
    #[case(0.0)]
    #[case(1.0)]
    #[case(-1.0)]
    #[case(0.001)]
    #[case(1e10)]
    #[case(-1e10)]
    #[case(1.0 / 3.0)]
    #[case(123456.789)]
    fn round_trip(#[case] value: f64) {
        let bits = encode_real(value).unwrap();
        let back = decode_real(bits);
        assert!(
            (back - value).abs() <= value.abs() * 1e-15 + 1e-300,
            "{value} round-tripped to {back}"
        );
    }

    #[test]
    fn overflow_errors() {
        assert!(encode_real(16f64.powi(64)).is_err());
    }

    #[test]
    fn underflow_flushes_to_zero() {
        assert_eq!(encode_real(16f64.powi(-70)).unwrap(), 0);
    }
}
