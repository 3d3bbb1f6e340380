// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//! Bit-packed sparsity patterns and the forward/reverse Jacobian and reverse
//! Hessian sparsity sweeps.
//!
//! Link to [parent module](super::super)
// ----------------------------------------------------------------------------
//
use crate::base::Base;
use crate::error::{Error, Result};
use crate::op::{ArgRef, Op};
use super::ADFun;
//
const BITS : usize = u64::BITS as usize;
//
// BitRow
/// One row of a sparsity pattern, packed into `u64` words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitRow {
    words : Vec<u64>,
    len   : usize,
}
//
impl BitRow {
    /// a row of `len` bits, all clear
    pub fn new(len : usize) -> BitRow {
        BitRow{ words : vec![0u64; len.div_ceil(BITS)], len }
    }
    //
    /// number of bits in this row
    pub fn len(&self) -> usize { self.len }
    //
    /// true if this row has no bits
    pub fn is_empty(&self) -> bool { self.len == 0 }
    //
    pub fn get(&self, i : usize) -> bool {
        (self.words[i / BITS] >> (i % BITS)) & 1 == 1
    }
    //
    pub fn set(&mut self, i : usize) {
        self.words[i / BITS] |= 1u64 << (i % BITS);
    }
    //
    /// in-place union; returns true if this row changed
    pub fn union_assign(&mut self, other : &BitRow) -> bool {
        let mut changed = false;
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            let merged = *a | *b;
            if merged != *a { changed = true; }
            *a = merged;
        }
        changed
    }
    //
    /// indices of every set bit, ascending
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0 .. self.len).filter(|&i| self.get(i))
    }
}
//
impl<B : Base + 'static> ADFun<B> {
    /// Propagates a pattern over the independents (one [BitRow] per
    /// independent, all of the same width `q`) forward through the tape,
    /// returning one `BitRow` per dependent.
    ///
    /// Row `j` of `px` is the set of "directions" that independent `j`
    /// couples to; the result's row `i` is the set of directions dependent
    /// `i` couples to.
    ///
    /// If `trace` is true, a trace of the sparsity calculation is printed
    /// on standard output.
    pub fn forward_jac_sparsity(&self, px : &[BitRow], trace : bool) -> Result<Vec<BitRow>> {
        if px.len() != self.n_dom {
            return Err(Error::ArityMismatch{ expected : self.n_dom, found : px.len() });
        }
        let q = px.first().map_or(0, |row| row.len());
        if trace {
            println!("Begin Trace: forward_jac_sparsity: n_dom = {}, q = {}", self.n_dom, q);
        }
        let n_row = self.ops.len() + 1;
        let mut row_set = vec![BitRow::new(q); n_row];
        // vec_sparsity[vec_id] accumulates the union of every value ever
        // stored (at a variable index) into that VecAD; a variable-indexed
        // load's sparsity is the union of that accumulator, since which
        // slot it actually reads is only resolved at `forward(0, ..)`.
        let mut vec_sparsity = vec![BitRow::new(q); self.vecad_init.len()];
        for i in 0 .. self.ops.len() {
            let op  = self.ops[i];
            let row = i + 1;
            if !op.has_result() {
                if let Op::Stpv{ vec_id, value, .. } | Op::Stvv{ vec_id, value, .. } = op
                    && let ArgRef::Var(a) = value
                {
                    let r = row_set[a as usize].clone();
                    vec_sparsity[vec_id as usize].union_assign(&r);
                }
                continue;
            }
            if let Op::Inv = op {
                row_set[row] = px[row - 1].clone();
                continue;
            }
            if let Op::Ldv{ vec_id, .. } = op {
                row_set[row] = vec_sparsity[vec_id as usize].clone();
                continue;
            }
            let mut acc = BitRow::new(q);
            for arg in unary_binary_operands(op) {
                if let ArgRef::Var(a) = arg { let r = row_set[a as usize].clone(); acc.union_assign(&r); }
            }
            row_set[row] = acc;
            if trace {
                let set : Vec<usize> = row_set[row].iter_ones().collect();
                println!("{}, {}, {:?}", row, op.name(), set);
            }
        }
        let mut py = Vec::with_capacity(self.dep_ad_type.len());
        for &addr in &self.dep_index_or_zero() {
            py.push(row_set[addr].clone());
        }
        if trace { println!("End Trace: forward_jac_sparsity, n_pattern = {}", py.len()); }
        Ok(py)
    }
    //
    /// Propagates a pattern over the dependents backward through the tape,
    /// returning one [BitRow] per independent.
    ///
    /// If `trace` is true, a trace of the sparsity calculation is printed
    /// on standard output.
    pub fn reverse_jac_sparsity(&self, py : &[BitRow], trace : bool) -> Result<Vec<BitRow>> {
        if py.len() != self.dep_ad_type.len() {
            return Err(Error::ArityMismatch{ expected : self.dep_ad_type.len(), found : py.len() });
        }
        let q = py.first().map_or(0, |row| row.len());
        if trace {
            println!("Begin Trace: reverse_jac_sparsity: n_dom = {}, q = {}", self.n_dom, q);
        }
        let n_row = self.ops.len() + 1;
        let mut row_set = vec![BitRow::new(q); n_row];
        let mut vec_sparsity = vec![BitRow::new(q); self.vecad_init.len()];
        for (i, dep_type) in self.dep_ad_type.iter().enumerate() {
            if *dep_type == crate::ad::ADType::Variable {
                let row = self.dep_index[i] as usize;
                let py_i = py[i].clone();
                row_set[row].union_assign(&py_i);
            }
        }
        for i in (0 .. self.ops.len()).rev() {
            let op  = self.ops[i];
            let row = i + 1;
            if !op.has_result() {
                if let Op::Stpv{ vec_id, value, .. } | Op::Stvv{ vec_id, value, .. } = op
                    && let ArgRef::Var(a) = value
                {
                    let v = vec_sparsity[vec_id as usize].clone();
                    row_set[a as usize].union_assign(&v);
                }
                continue;
            }
            if let Op::Inv = op { continue; }
            if let Op::Ldv{ vec_id, .. } = op {
                let here = row_set[row].clone();
                vec_sparsity[vec_id as usize].union_assign(&here);
                continue;
            }
            let here = row_set[row].clone();
            for arg in unary_binary_operands(op) {
                if let ArgRef::Var(a) = arg { row_set[a as usize].union_assign(&here); }
            }
            if trace {
                let set : Vec<usize> = here.iter_ones().collect();
                println!("{}, {}, {:?}", row, op.name(), set);
            }
        }
        let mut px = Vec::with_capacity(self.n_dom);
        for j in 0 .. self.n_dom { px.push(row_set[j + 1].clone()); }
        if trace { println!("End Trace: reverse_jac_sparsity, n_pattern = {}", px.len()); }
        Ok(px)
    }
    //
    /// Reverse Hessian sparsity for a weighted sum of the dependents: `py`
    /// selects which output directions are summed with nonzero weight;
    /// `px` is the already-computed forward Jacobian sparsity of the `q`
    /// directions over the independents. Returns a `q x q` pattern (one row
    /// per independent) of potential second partials.
    ///
    /// Binary ops pass their operand rows' Hessian sets through unchanged,
    /// except multiplication, which additionally couples each operand's own
    /// Jacobian row to the other's (a genuine `d^2(u*v)/du dv` term); any
    /// nonlinear unary op self-couples its operand's Jacobian row (a
    /// `d^2 f(u)/du^2` term). Linear ops (`Add`, `Sub`, `Neg`) contribute no
    /// coupling of their own.
    ///
    /// If `trace` is true, a trace of the sparsity calculation is printed
    /// on standard output.
    pub fn reverse_hes_sparsity(&self, px : &[BitRow], py : &[bool], trace : bool) -> Result<Vec<BitRow>> {
        if px.len() != self.n_dom {
            return Err(Error::ArityMismatch{ expected : self.n_dom, found : px.len() });
        }
        if py.len() != self.dep_ad_type.len() {
            return Err(Error::ArityMismatch{ expected : self.dep_ad_type.len(), found : py.len() });
        }
        let q = self.n_dom;
        if trace { println!("Begin Trace: reverse_hes_sparsity: n_dom = {}", q); }
        let n_row = self.ops.len() + 1;
        //
        // forward Jacobian sparsity of every tape row, reusing px for the
        // independents themselves
        let mut jac = vec![BitRow::new(q); n_row];
        for j in 0 .. self.n_dom { jac[j + 1] = px[j].clone(); }
        let mut vec_sparsity_jac = vec![BitRow::new(q); self.vecad_init.len()];
        for i in 0 .. self.ops.len() {
            let op  = self.ops[i];
            let row = i + 1;
            if !op.has_result() {
                if let Op::Stpv{ vec_id, value, .. } | Op::Stvv{ vec_id, value, .. } = op
                    && let ArgRef::Var(a) = value
                {
                    let r = jac[a as usize].clone();
                    vec_sparsity_jac[vec_id as usize].union_assign(&r);
                }
                continue;
            }
            if matches!(op, Op::Inv) { continue; }
            if let Op::Ldv{ vec_id, .. } = op {
                jac[row] = vec_sparsity_jac[vec_id as usize].clone();
                continue;
            }
            let mut acc = BitRow::new(q);
            for arg in unary_binary_operands(op) {
                if let ArgRef::Var(a) = arg { let r = jac[a as usize].clone(); acc.union_assign(&r); }
            }
            jac[row] = acc;
        }
        //
        // boolean reverse-Jacobian reachability of the selected weighted sum
        let mut reachable = vec![false; n_row];
        for (i, dep_type) in self.dep_ad_type.iter().enumerate() {
            if py[i] && *dep_type == crate::ad::ADType::Variable {
                reachable[self.dep_index[i] as usize] = true;
            }
        }
        let mut hes = vec![BitRow::new(q); n_row];
        let mut vec_hes_sparsity = vec![BitRow::new(q); self.vecad_init.len()];
        for i in (0 .. self.ops.len()).rev() {
            let op  = self.ops[i];
            let row = i + 1;
            if !op.has_result() {
                if let Op::Stpv{ vec_id, value, .. } | Op::Stvv{ vec_id, value, .. } = op
                    && let ArgRef::Var(a) = value
                {
                    reachable[a as usize] = true;
                    let v = vec_hes_sparsity[vec_id as usize].clone();
                    hes[a as usize].union_assign(&v);
                }
                continue;
            }
            if !reachable[row] { continue; }
            let here = hes[row].clone();
            match op {
                Op::Ldv{ vec_id, .. } => {
                    // a VecAD load is treated as a pure passthrough: no
                    // quadratic coupling of its own, per spec section 9's
                    // "d v[x] / dx is zero" convention for the index.
                    vec_hes_sparsity[vec_id as usize].union_assign(&here);
                }
                Op::Mul(l, r) => {
                    if let ArgRef::Var(a) = l {
                        reachable[a as usize] = true;
                        hes[a as usize].union_assign(&here);
                        if let ArgRef::Var(b) = r { let jb = jac[b as usize].clone(); hes[a as usize].union_assign(&jb); }
                    }
                    if let ArgRef::Var(b) = r {
                        reachable[b as usize] = true;
                        hes[b as usize].union_assign(&here);
                        if let ArgRef::Var(a) = l { let ja = jac[a as usize].clone(); hes[b as usize].union_assign(&ja); }
                    }
                }
                _ if self.op_is_nonlinear_unary(op) => {
                    if let Some(ArgRef::Var(a)) = unary_operand(op) {
                        reachable[a as usize] = true;
                        hes[a as usize].union_assign(&here);
                        let ja = jac[a as usize].clone();
                        hes[a as usize].union_assign(&ja);
                    }
                }
                _ => {
                    for arg in unary_binary_operands(op) {
                        if let ArgRef::Var(a) = arg {
                            reachable[a as usize] = true;
                            hes[a as usize].union_assign(&here);
                        }
                    }
                }
            }
            if trace {
                let set : Vec<usize> = here.iter_ones().collect();
                println!("{}, {}, {:?}", row, op.name(), set);
            }
        }
        let mut result = Vec::with_capacity(q);
        for j in 0 .. q { result.push(hes[j + 1].clone()); }
        if trace { println!("End Trace: reverse_hes_sparsity, n_pattern = {}", result.len()); }
        Ok(result)
    }
    //
    fn op_is_nonlinear_unary(&self, op : Op) -> bool {
        matches!(op,
            Op::Exp(_) | Op::Ln(_) | Op::Sqrt(_) | Op::Sin(_) | Op::Cos(_) |
            Op::Sinh(_) | Op::Cosh(_) | Op::Asin(_) | Op::Acos(_) | Op::Atan(_) |
            Op::Pow(_, _)
        )
    }
    //
    fn dep_index_or_zero(&self) -> Vec<usize> {
        self.dep_ad_type.iter().enumerate().map(|(i, t)| {
            match t {
                crate::ad::ADType::Variable  => self.dep_index[i] as usize,
                crate::ad::ADType::Parameter => 0,
            }
        }).collect()
    }
}
//
fn unary_operand(op : Op) -> Option<ArgRef> {
    match op {
        Op::Neg(u) | Op::Abs(u) | Op::Sqrt(u) | Op::Exp(u) | Op::Ln(u) |
        Op::Sin(u) | Op::Cos(u) | Op::Asin(u) | Op::Acos(u) | Op::Atan(u) |
        Op::Sinh(u) | Op::Cosh(u) | Op::Pow(u, _) => Some(u),
        _ => None,
    }
}
//
/// Operands whose sparsity flows into `op`'s own row. `Ldv` is handled
/// separately by its caller (via a per-`vec_id` accumulator fed by the
/// stores into that VecAD) since its own `index` argument carries no
/// sparsity of the *value* read — only of which slot is read, which by
/// convention contributes nothing to the result (see spec section 9).
fn unary_binary_operands(op : Op) -> Vec<ArgRef> {
    match op {
        Op::Add(l, r) | Op::Sub(l, r) | Op::Mul(l, r) | Op::Div(l, r) => vec![l, r],
        Op::Com{ left, .. } => vec![left],
        Op::CExp{ if_true, if_false, .. } => vec![if_true, if_false],
        _ => unary_operand(op).into_iter().collect(),
    }
}
