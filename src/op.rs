// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//! This pub(crate) module defines the recorded operator set.
//!
//! Link to [parent module](super)
// ----------------------------------------------------------------------------
//
// use
use crate::tape::IndexT;
//
// ArgRef
/// A reference to one operand of a recorded operator.
///
/// An operand is either a variable (a tape address, strictly less than the
/// address of the operator's own result, per the topological-order
/// invariant) or a constant parameter (an index into the tape's parameter
/// pool, `cop`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ArgRef {
    /// a variable; the tape address of the operator that produced it
    Var(IndexT),
    /// a constant parameter; an index into the tape's `cop` pool
    Con(IndexT),
}
//
// CompareOp
/// The six comparison operators that can appear in a [Op::Com] .
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CompareOp { Lt, Le, Eq, Ne, Ge, Gt }
//
impl CompareOp {
    /// Evaluate this comparison on a pair of base-field values.
    pub(crate) fn eval<B : PartialOrd + PartialEq>(self, left : B, right : B) -> bool {
        match self {
            CompareOp::Lt => left <  right,
            CompareOp::Le => left <= right,
            CompareOp::Eq => left == right,
            CompareOp::Ne => left != right,
            CompareOp::Ge => left >= right,
            CompareOp::Gt => left >  right,
        }
    }
}
//
// Op
/// One entry of a recorded operation sequence.
///
/// Each variant (other than the store operators, which have no result) owns
/// one row of the tape's variable table; the row's address is the position
/// of the `Op` in the tape's `ops` vector, plus one (address zero is
/// reserved as the "this is a parameter" sentinel).
///
/// This is a tagged-enum encoding of the same information CppAD-style
/// tapes keep in three parallel dense arrays (`op_vec`/`arg_vec`/`par_vec`);
/// a `Vec<Op>` is simpler to keep correct than hand-managed offset
/// bookkeeping into parallel arrays, at the cost of a larger per-row
/// footprint, which is acceptable since the tape is not the hot loop of a
/// sweep (visiting one enum variant per row is).
#[derive(Clone, Copy, Debug)]
pub(crate) enum Op {
    /// an independent variable placeholder
    Inv,
    Add(ArgRef, ArgRef),
    Sub(ArgRef, ArgRef),
    Mul(ArgRef, ArgRef),
    Div(ArgRef, ArgRef),
    Neg(ArgRef),
    Abs(ArgRef),
    Sqrt(ArgRef),
    Exp(ArgRef),
    Ln(ArgRef),
    Sin(ArgRef),
    Cos(ArgRef),
    Asin(ArgRef),
    Acos(ArgRef),
    Atan(ArgRef),
    Sinh(ArgRef),
    Cosh(ArgRef),
    /// raise to a fixed integer power; kept as its own opcode (rather than
    /// decomposed into `Mul`/`Div`) so the exponent is visible to a single
    /// forward/reverse Taylor recurrence instead of a chain of them
    Pow(ArgRef, i32),
    /// a recorded comparison; replay re-evaluates and compares to `result`
    Com { op : CompareOp, left : ArgRef, right : ArgRef, result : bool },
    /// a conditional expression: `if cmp(left,right) { if_true } else { if_false }`
    CExp { cmp : CompareOp, left : ArgRef, right : ArgRef, if_true : ArgRef, if_false : ArgRef },
    /// load from a `VecAD` at a compile-time-known slot; resolved by direct
    /// substitution at record time, so this variant never actually appears
    /// in a tape (kept for documentation of the opcode set named in the
    /// data model; see `vecad.rs`).
    Ldp { vec_id : u32, slot : usize },
    /// load from a `VecAD` at a variable (runtime-resolved) slot
    Ldv { vec_id : u32, index : ArgRef },
    /// store into a `VecAD` at a compile-time-known slot, constant value
    Stpp { vec_id : u32, slot : usize, value : ArgRef },
    /// store into a `VecAD` at a compile-time-known slot, variable value
    Stpv { vec_id : u32, slot : usize, value : ArgRef },
    /// store into a `VecAD` at a variable slot, constant value
    Stvp { vec_id : u32, index : ArgRef, value : ArgRef },
    /// store into a `VecAD` at a variable slot, variable value
    Stvv { vec_id : u32, index : ArgRef, value : ArgRef },
}
//
impl Op {
    /// true if this operator produces a new variable (occupies a row of
    /// the Taylor / adjoint matrices that participates in sweeps)
    pub(crate) fn has_result(&self) -> bool {
        ! matches!(self,
            Op::Stpp{..} | Op::Stpv{..} | Op::Stvp{..} | Op::Stvv{..}
        )
    }
    //
    /// a short name for trace output; see `adfn::forward`/`adfn::reverse`
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Op::Inv       => "inv",
            Op::Add(..)   => "add",
            Op::Sub(..)   => "sub",
            Op::Mul(..)   => "mul",
            Op::Div(..)   => "div",
            Op::Neg(..)   => "neg",
            Op::Abs(..)   => "abs",
            Op::Sqrt(..)  => "sqrt",
            Op::Exp(..)   => "exp",
            Op::Ln(..)    => "ln",
            Op::Sin(..)   => "sin",
            Op::Cos(..)   => "cos",
            Op::Asin(..)  => "asin",
            Op::Acos(..)  => "acos",
            Op::Atan(..)  => "atan",
            Op::Sinh(..)  => "sinh",
            Op::Cosh(..)  => "cosh",
            Op::Pow(..)   => "pow",
            Op::Com{..}   => "com",
            Op::CExp{..}  => "cexp",
            Op::Ldp{..}   => "ldp",
            Op::Ldv{..}   => "ldv",
            Op::Stpp{..}  => "stpp",
            Op::Stpv{..}  => "stpv",
            Op::Stvp{..}  => "stvp",
            Op::Stvv{..}  => "stvv",
        }
    }
}
