//! Floating point helpers used internally by the oscillators
//!
//! Without the `libm` feature there is no `exp2` available in `core`, so a
//! short Taylor series is used instead.  The only caller is the detune law,
//! which keeps the exponent within one twelfth of an octave.

#[cfg(any(test, not(feature = "libm")))]
mod detail {
    const LN_2: f32 = core::f32::consts::LN_2;

    /// calculate e^x in the range [-0.5, 0.5) using an order 4 Taylor series
    fn exp_approx_small(x: f32) -> f32 {
        // e^x ~= 1 + x * { 1 + x/2 * [ 1 + x/3 * ( 1 + x/4 )]}
        let c_nested = 1.0 + (x / 4.0);
        let b_nested = 1.0 + ((x / 3.0) * c_nested);
        let a_nested = 1.0 + ((x / 2.0) * b_nested);
        1.0 + (x * a_nested)
    }

    /// Approximate 2^x for small exponents.  Accurate to well under a cent
    /// for `x` in `[-0.5, 0.5]`, which covers a detune of +/-6 semitones.
    pub fn exp2_approx(x: f32) -> f32 {
        exp_approx_small(x * LN_2)
    }
}

#[cfg(any(test, not(feature = "libm")))]
pub use detail::*;

/// Calculate 2^x, with `x` expected to be small (a fraction of an octave)
#[inline]
pub fn exp2(x: f32) -> f32 {
    #[cfg(feature = "libm")]
    let ret = num_traits::Float::exp2(x);
    #[cfg(not(feature = "libm"))]
    let ret = exp2_approx(x);
    ret
}
