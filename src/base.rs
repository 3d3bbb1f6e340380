// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//! This pub module defines the Base trait.
//!
//! Link to [parent module](super)
// ----------------------------------------------------------------------------
//
/// Documentation for the rustad generic type parameter B.
///
/// `B` is the scalar field a tape is recorded over; see [Base]. It is
/// typically `f64` but may itself be `AD<B'>` for higher-order taping
/// (see the `ad` module); the `Base` trait is implemented recursively
/// for `AD<B>` so that nesting works without any extra dispatch.
pub fn doc_generic_v() {}
//
// Base
/// The capability set the core relies on for the scalar field of a tape.
///
/// * B : see [doc_generic_v]
///
/// This is the contract described in spec section 4.1: arithmetic,
/// comparisons producing booleans, the constants zero and one, and the
/// standard-library transcendentals. `rustad` implements it for `f32`
/// and `f64`, and (recursively) for `AD<B>`.
pub trait Base
where
    Self : Clone + Copy + PartialEq + PartialOrd + std::fmt::Debug +
           std::fmt::Display +
           std::ops::Add<Output = Self> +
           std::ops::Sub<Output = Self> +
           std::ops::Mul<Output = Self> +
           std::ops::Div<Output = Self> +
           std::ops::Neg<Output = Self> +
           std::ops::AddAssign +
           std::ops::SubAssign +
           std::ops::MulAssign +
           std::ops::DivAssign ,
{
    /// the additive identity
    fn zero() -> Self;
    //
    /// the multiplicative identity
    fn one() -> Self;
    //
    /// not-a-number
    fn nan() -> Self;
    //
    /// absolute value
    fn abs(self) -> Self;
    //
    /// square root
    fn sqrt(self) -> Self;
    //
    /// exponential
    fn exp(self) -> Self;
    //
    /// natural log
    fn ln(self) -> Self;
    //
    /// sine
    fn sin(self) -> Self;
    //
    /// cosine
    fn cos(self) -> Self;
    //
    /// arc-sine
    fn asin(self) -> Self;
    //
    /// arc-cosine
    fn acos(self) -> Self;
    //
    /// arc-tangent
    fn atan(self) -> Self;
    //
    /// hyperbolic sine
    fn sinh(self) -> Self;
    //
    /// hyperbolic cosine
    fn cosh(self) -> Self;
    //
    /// raise to an integer power
    fn powi(self, n : i32) -> Self;
    //
    /// convert to a 64 bit float (used by sweeps that compute in f64)
    fn to_f64(self) -> f64;
    //
    /// convert from a 64 bit float
    fn from_f64(value : f64) -> Self;
    //
    /// convert to a plotting-free textual form
    fn to_text(self) -> String;
    //
    /// truncate towards zero and convert to a 64 bit integer (CppAD's
    /// `Integer()`; see spec section 4.1, "conversion to/from an integer")
    fn to_int(self) -> i64;
    //
    /// convert from a 64 bit integer
    fn from_int(value : i64) -> Self;
}
//
// impl_base_for_float
/// Implements the [Base] trait for a primitive floating point type.
///
/// * F : is `f32` or `f64` .
macro_rules! impl_base_for_float{ ($F:ty) => {
    impl Base for $F {
        fn zero() -> Self { 0 as $F }
        fn one()  -> Self { 1 as $F }
        fn nan()  -> Self { <$F>::NAN }
        fn abs(self)       -> Self { <$F>::abs(self) }
        fn sqrt(self)      -> Self { <$F>::sqrt(self) }
        fn exp(self)       -> Self { <$F>::exp(self) }
        fn ln(self)        -> Self { <$F>::ln(self) }
        fn sin(self)       -> Self { <$F>::sin(self) }
        fn cos(self)       -> Self { <$F>::cos(self) }
        fn asin(self)      -> Self { <$F>::asin(self) }
        fn acos(self)      -> Self { <$F>::acos(self) }
        fn atan(self)      -> Self { <$F>::atan(self) }
        fn sinh(self)      -> Self { <$F>::sinh(self) }
        fn cosh(self)      -> Self { <$F>::cosh(self) }
        fn powi(self, n : i32) -> Self { <$F>::powi(self, n) }
        fn to_f64(self)    -> f64 { self as f64 }
        fn from_f64(value : f64) -> Self { value as $F }
        fn to_text(self)   -> String { format!( "{}", self ) }
        fn to_int(self)    -> i64 { self as i64 }
        fn from_int(value : i64) -> Self { value as $F }
    }
} }
impl_base_for_float!(f32);
impl_base_for_float!(f64);
