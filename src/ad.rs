// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//! This pub module defines the `AD<B>` scalar type and its operator
//! overloads; every arithmetic operation on a variable is intercepted here
//! and recorded onto the active thread's tape.
//!
//! Link to [parent module](super)
// ----------------------------------------------------------------------------
//
use crate::base::Base;
use crate::tape::{IndexT, RecorderState, Tape, with_tape};
use crate::op::{ArgRef, CompareOp, Op};
#[cfg(doc)]
use crate::doc_generic_v;
//
// ADType
/// Distinguishes a parameter from a variable; see spec section 3.1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ADType { Parameter, Variable }
//
// AD
/// `AD<B>` is a scalar value together with a tape address.
///
/// * B : see [doc_generic_v]
///
/// A parameter's value is known to be independent of every independent of
/// any recording; its tape address is meaningless (always zero). A
/// variable's tape address is the index, in the tape that produced it, of
/// the operator whose result it is; the value is always kept up to date
/// eagerly (at record time) so that ordinary reads of an `AD<B>` never
/// need a sweep.
#[derive(Clone, Copy, Debug)]
pub struct AD<B> {
    pub(crate) tape_id : usize,
    pub(crate) index   : IndexT,
    pub(crate) ad_type : ADType,
    pub(crate) value   : B,
}
//
impl<B : Clone> AD<B> {
    /// the current value; always available without a sweep
    pub fn value(&self) -> B { self.value.clone() }
}
//
impl<B> AD<B> {
    pub(crate) fn variable(tape_id : usize, index : IndexT, value : B) -> Self {
        Self { tape_id, index, ad_type : ADType::Variable, value }
    }
    /// wraps a plain base value as a parameter, detached from any tape
    pub fn constant(value : B) -> Self {
        Self { tape_id : 0, index : 0, ad_type : ADType::Parameter, value }
    }
    /// true iff this value's tape address is meaningful
    pub fn is_variable(&self) -> bool { matches!(self.ad_type, ADType::Variable) }
    /// true iff this value is detached from every independent
    pub fn is_parameter(&self) -> bool { matches!(self.ad_type, ADType::Parameter) }
}
//
impl<V : Base + 'static> From<f64> for AD<V> {
    fn from(value : f64) -> Self { AD::constant(V::from_f64(value)) }
}
// ----------------------------------------------------------------------------
// recording helpers
//
/// True if `operand` is a variable belonging to the tape currently being
/// recorded; panics if `operand` is a variable that refers to a recording
/// that is no longer live (a `StaleTapeReference` per spec section 7 — the
/// std `ops` traits used for operator overloading cannot return a
/// `Result`, so this is one of the few places this crate panics on a
/// condition spec section 7 names as an explicit error kind).
pub(crate) fn check_active<V>(tape : &Tape<V>, operand : &AD<V>) -> bool {
    let active = operand.ad_type == ADType::Variable
        && tape.state == RecorderState::Recording
        && operand.tape_id == tape.tape_id;
    if operand.ad_type == ADType::Variable && !active {
        panic!("rustad: AD<B> value refers to a recording that is no longer live");
    }
    active
}
//
/// Converts an operand into an [ArgRef], pushing its value into the
/// parameter pool when it is not an active-tape variable.
pub(crate) fn to_arg<V : Clone>(tape : &mut Tape<V>, operand : &AD<V>, active : bool) -> ArgRef {
    if active {
        ArgRef::Var(operand.index)
    } else {
        tape.cop.push(operand.value.clone());
        ArgRef::Con((tape.cop.len() - 1) as IndexT)
    }
}
//
/// Records a binary operator if either operand is an active-tape variable;
/// otherwise both operands are parameters and the result is a parameter
/// with no tape entry.
pub(crate) fn record_binary<V, F>(make_op : F, lhs : &AD<V>, rhs : &AD<V>, value : V) -> AD<V>
where
    V : Base + 'static,
    F : FnOnce(ArgRef, ArgRef) -> Op,
{
    with_tape::<V, _, _>(|tape| {
        let lhs_active = check_active(tape, lhs);
        let rhs_active = check_active(tape, rhs);
        if !lhs_active && !rhs_active {
            return AD::constant(value);
        }
        let lhs_arg = to_arg(tape, lhs, lhs_active);
        let rhs_arg = to_arg(tape, rhs, rhs_active);
        tape.ops.push(make_op(lhs_arg, rhs_arg));
        AD::variable(tape.tape_id, tape.ops.len() as IndexT, value)
    })
}
//
/// Records a unary operator if the operand is an active-tape variable;
/// otherwise the operand is a parameter and the result is a parameter with
/// no tape entry.
pub(crate) fn record_unary<V, F>(make_op : F, operand : &AD<V>, value : V) -> AD<V>
where
    V : Base + 'static,
    F : FnOnce(ArgRef) -> Op,
{
    with_tape::<V, _, _>(|tape| {
        let active = check_active(tape, operand);
        if !active {
            return AD::constant(value);
        }
        let arg = to_arg(tape, operand, active);
        tape.ops.push(make_op(arg));
        AD::variable(tape.tape_id, tape.ops.len() as IndexT, value)
    })
}
//
/// Records a comparison (if either operand is an active-tape variable) and
/// returns the boolean result; see spec section 4.2 policy on comparisons.
pub(crate) fn record_compare<V>(op : CompareOp, lhs : &AD<V>, rhs : &AD<V>, result : bool) -> bool
where
    V : Base + 'static,
{
    with_tape::<V, _, _>(|tape| {
        let lhs_active = check_active(tape, lhs);
        let rhs_active = check_active(tape, rhs);
        if lhs_active || rhs_active {
            let lhs_arg = to_arg(tape, lhs, lhs_active);
            let rhs_arg = to_arg(tape, rhs, rhs_active);
            tape.ops.push(Op::Com{ op, left : lhs_arg, right : rhs_arg, result });
        }
    });
    result
}
//
/// Records a conditional expression; returns a variable whose value is
/// resolved, once, the first time the recorded `ADFun` is run at
/// `forward(0, ..)`, by re-evaluating the comparison against the replayed
/// order-zero values (see `adfn::resolve`).
pub(crate) fn record_cexp<V>(
    cmp : CompareOp, left : &AD<V>, right : &AD<V>, if_true : &AD<V>, if_false : &AD<V>,
) -> AD<V>
where
    V : Base + 'static,
{
    let value = if cmp.eval(left.value, right.value) {
        if_true.value
    } else {
        if_false.value
    };
    with_tape::<V, _, _>(|tape| {
        let left_active     = check_active(tape, left);
        let right_active    = check_active(tape, right);
        let if_true_active  = check_active(tape, if_true);
        let if_false_active = check_active(tape, if_false);
        if !left_active && !right_active && !if_true_active && !if_false_active {
            return AD::constant(value);
        }
        let left_arg     = to_arg(tape, left, left_active);
        let right_arg     = to_arg(tape, right, right_active);
        let if_true_arg   = to_arg(tape, if_true, if_true_active);
        let if_false_arg  = to_arg(tape, if_false, if_false_active);
        tape.ops.push(Op::CExp{
            cmp, left : left_arg, right : right_arg,
            if_true : if_true_arg, if_false : if_false_arg,
        });
        AD::variable(tape.tape_id, tape.ops.len() as IndexT, value)
    })
}
// ----------------------------------------------------------------------------
// operator overload macros
//
/// implements `Add`/`Sub`/`Mul`/`Div` between `&AD<V>` operands, owned
/// operands, and mixed `AD<V>`/`V` operands, by delegating everything to
/// the reference form.
macro_rules! ad_binary_op { ($Trait:ident, $method:ident, $Op:ident, $expr:expr) => {
    impl<V> std::ops::$Trait<&AD<V>> for &AD<V>
    where V : Base + 'static,
    {
        type Output = AD<V>;
        fn $method(self, rhs : &AD<V>) -> AD<V> {
            let f : fn(V,V) -> V = $expr;
            let value = f(self.value.clone(), rhs.value.clone());
            record_binary(|l,r| Op::$Op(l,r), self, rhs, value)
        }
    }
    impl<V> std::ops::$Trait<AD<V>> for AD<V>
    where V : Base + 'static,
    { type Output = AD<V>; fn $method(self, rhs : AD<V>) -> AD<V> { (&self).$method(&rhs) } }
    //
    impl<V> std::ops::$Trait<&AD<V>> for AD<V>
    where V : Base + 'static,
    { type Output = AD<V>; fn $method(self, rhs : &AD<V>) -> AD<V> { (&self).$method(rhs) } }
    //
    impl<V> std::ops::$Trait<AD<V>> for &AD<V>
    where V : Base + 'static,
    { type Output = AD<V>; fn $method(self, rhs : AD<V>) -> AD<V> { self.$method(&rhs) } }
    //
    impl<V> std::ops::$Trait<V> for AD<V>
    where V : Base + 'static,
    { type Output = AD<V>; fn $method(self, rhs : V) -> AD<V> { (&self).$method(&AD::constant(rhs)) } }
    //
    impl<V> std::ops::$Trait<&V> for &AD<V>
    where V : Base + 'static,
    { type Output = AD<V>; fn $method(self, rhs : &V) -> AD<V> { self.$method(&AD::constant(rhs.clone())) } }
} }
ad_binary_op!(Add, add, Add, |l,r| l + r);
ad_binary_op!(Sub, sub, Sub, |l,r| l - r);
ad_binary_op!(Mul, mul, Mul, |l,r| l * r);
ad_binary_op!(Div, div, Div, |l,r| l / r);
//
impl<V> std::ops::Neg for &AD<V>
where V : Base + 'static,
{
    type Output = AD<V>;
    fn neg(self) -> AD<V> {
        let value = -self.value;
        record_unary(Op::Neg, self, value)
    }
}
impl<V> std::ops::Neg for AD<V>
where V : Base + 'static,
{ type Output = AD<V>; fn neg(self) -> AD<V> { -&self } }
//
macro_rules! ad_compare_op { ($Trait:ident, $method:ident, $Cmp:ident) => {
    #[allow(clippy::partial_ord_cmp)]
    impl<V> AD<V>
    where V : Base + 'static,
    {
        #[doc = concat!("records a `", stringify!($Cmp), "` comparison")]
        pub fn $method(&self, rhs : &AD<V>) -> bool {
            let result = CompareOp::$Cmp.eval(self.value.clone(), rhs.value.clone());
            record_compare(CompareOp::$Cmp, self, rhs, result)
        }
    }
} }
ad_compare_op!(Lt, lt, Lt);
ad_compare_op!(Le, le, Le);
ad_compare_op!(Eq, eq, Eq);
ad_compare_op!(Ne, ne, Ne);
ad_compare_op!(Ge, ge, Ge);
ad_compare_op!(Gt, gt, Gt);
//
/// Records a runtime-selected conditional: `cexp(u, v, a, b)` is `a` when
/// `u < v` and `b` otherwise.
pub fn cexp<V>(left : &AD<V>, right : &AD<V>, if_true : &AD<V>, if_false : &AD<V>) -> AD<V>
where V : Base + 'static,
{
    record_cexp(CompareOp::Lt, left, right, if_true, if_false)
}
//
// unary / transcendental methods
macro_rules! ad_unary_fn { ($method:ident, $Op:ident) => {
    impl<V> AD<V>
    where V : Base + 'static,
    {
        #[doc = concat!("records a `", stringify!($method), "` operator")]
        pub fn $method(&self) -> AD<V> {
            let value = Base::$method(self.value.clone());
            record_unary(Op::$Op, self, value)
        }
    }
} }
ad_unary_fn!(abs,  Abs);
ad_unary_fn!(sqrt, Sqrt);
ad_unary_fn!(exp,  Exp);
ad_unary_fn!(ln,   Ln);
ad_unary_fn!(sin,  Sin);
ad_unary_fn!(cos,  Cos);
ad_unary_fn!(asin, Asin);
ad_unary_fn!(acos, Acos);
ad_unary_fn!(atan, Atan);
ad_unary_fn!(sinh, Sinh);
ad_unary_fn!(cosh, Cosh);
//
impl<V> AD<V>
where V : Base + 'static,
{
    /// Raises to an integer power, recorded as a single `Pow` operator with
    /// its own forward/reverse Taylor recurrence (see `adfn::forward`,
    /// `adfn::reverse`); `n` may be negative or zero.
    pub fn powi(&self, n : i32) -> AD<V> {
        let value = Base::powi(self.value, n);
        record_unary(|a| Op::Pow(a, n), self, value)
    }
}
//
impl<V : Base> PartialEq for AD<V> {
    fn eq(&self, other : &Self) -> bool { self.value == other.value }
}
impl<V : Base> std::fmt::Display for AD<V> {
    fn fmt(&self, f : &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
//
impl<V : Base> PartialOrd for AD<V> {
    fn partial_cmp(&self, other : &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}
//
macro_rules! ad_assign_op{ ($Trait:ident, $method:ident, $op:tt) => {
    impl<V> std::ops::$Trait for AD<V>
    where V : Base + 'static,
    {
        fn $method(&mut self, rhs : Self) { *self = &*self $op &rhs; }
    }
} }
ad_assign_op!(AddAssign, add_assign, +);
ad_assign_op!(SubAssign, sub_assign, -);
ad_assign_op!(MulAssign, mul_assign, *);
ad_assign_op!(DivAssign, div_assign, /);
// ----------------------------------------------------------------------------
// Base for AD<V>
//
/// Implements [Base] for `AD<V>` itself, so that `B = AD<V>` nests: taping
/// over a base field that is already an `AD<V>` records the outer
/// operations exactly like any other base field, with no separate
/// "value vs AD" dispatch (monomorphization gives this for free; see
/// spec section 9, "Dynamic dispatch over B").
impl<V> Base for AD<V>
where V : Base + 'static,
{
    fn zero() -> Self { AD::constant(V::zero()) }
    fn one()  -> Self { AD::constant(V::one()) }
    fn nan()  -> Self { AD::constant(V::nan()) }
    fn abs(self)  -> Self { AD::abs(&self) }
    fn sqrt(self) -> Self { AD::sqrt(&self) }
    fn exp(self)  -> Self { AD::exp(&self) }
    fn ln(self)   -> Self { AD::ln(&self) }
    fn sin(self)  -> Self { AD::sin(&self) }
    fn cos(self)  -> Self { AD::cos(&self) }
    fn asin(self) -> Self { AD::asin(&self) }
    fn acos(self) -> Self { AD::acos(&self) }
    fn atan(self) -> Self { AD::atan(&self) }
    fn sinh(self) -> Self { AD::sinh(&self) }
    fn cosh(self) -> Self { AD::cosh(&self) }
    fn powi(self, n : i32) -> Self { AD::powi(&self, n) }
    fn to_f64(self) -> f64 { self.value.to_f64() }
    fn from_f64(value : f64) -> Self { AD::constant(V::from_f64(value)) }
    fn to_text(self) -> String { self.value.to_text() }
    fn to_int(self) -> i64 { self.value.to_int() }
    fn from_int(value : i64) -> Self { AD::constant(V::from_int(value)) }
}
