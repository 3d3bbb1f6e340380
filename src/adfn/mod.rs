// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//! This pub module defines `ADFun<B>`, the frozen operation sequence
//! produced by stopping a recording, and its forward/reverse sweeps.
//!
//! Link to [parent module](super)
// ----------------------------------------------------------------------------
//
use crate::ad::{AD, ADType};
use crate::base::Base;
use crate::error::{Error, Result};
use crate::op::{ArgRef, Op};
use crate::tape::{with_tape, RecorderState};
#[cfg(doc)]
use crate::doc_generic_v;
//
pub mod sparsity;
pub mod drivers;
//
// ADFun
/// A frozen, replayable operation sequence: the result of recording a
/// function of `domain_len()` independent variables and `range_len()`
/// dependent values, then calling [ADFun::new].
///
/// * B : see [doc_generic_v]
///
/// An `ADFun` owns its own copy of the tape's operators, parameter pool and
/// `VecAD` initial contents — it no longer refers to the thread-local
/// recorder at all, so it can outlive the recording that produced it and be
/// swept (`forward`/`reverse`) repeatedly at different domain points.
pub struct ADFun<B> {
    //
    // ops
    ops : Vec<Op>,
    //
    // cop
    cop : Vec<B>,
    //
    // vecad_init
    vecad_init : Vec<Vec<B>>,
    //
    // n_dom
    n_dom : usize,
    //
    // dep_ad_type, dep_index
    /// per dependent: whether it is a parameter (its value never varies
    /// with the domain) or a variable (a tape address)
    dep_ad_type : Vec<ADType>,
    /// per dependent: a `cop` index if `Parameter`, a tape address if
    /// `Variable`
    dep_index : Vec<u32>,
    //
    // taylor, cols
    /// Taylor coefficient matrix, row-major, `(ops.len() + 1)` rows (row
    /// zero is an unused sentinel matching tape address zero) by `cols`
    /// columns; row `r`, column `k` is the order `k` Taylor coefficient of
    /// the variable at tape address `r`.
    taylor : Vec<B>,
    cols : usize,
    //
    // order_stored
    /// highest Taylor order currently stored, or `None` if `forward` has
    /// never been called
    order_stored : Option<usize>,
    //
    // companion
    /// per-row scratch series for operators whose Taylor recurrence needs
    /// a companion sequence (`sin`/`cos`, `sinh`/`cosh`, and the `1 ± u^2`
    /// series behind `atan`/`asin`/`acos`); grown in lock-step with
    /// `taylor`'s columns. Empty for every row that does not need one.
    companion : Vec<Vec<B>>,
    //
    // resolved
    /// for `Ldv` and `CExp` rows: the operand alias resolved, once, the
    /// first time `forward(0, ..)` ran; `None` until then or for rows that
    /// are not `Ldv`/`CExp`.
    resolved : Vec<Option<ArgRef>>,
    //
    // vecad_base
    /// starting `cop` offset of each `VecAD`'s initial contents, filled in
    /// by the first `forward(0, ..)` call
    vecad_base : Vec<u32>,
    vecad_registered : bool,
    //
    // compare_change
    /// number of recorded `Com` operators whose replayed comparison
    /// disagreed with the value recorded at `ADFun::new` time
    compare_change : usize,
}
//
impl<B> ADFun<B> {
    /// number of independent variables
    pub fn domain_len(&self) -> usize { self.n_dom }
    //
    /// number of dependent values
    pub fn range_len(&self) -> usize { self.dep_ad_type.len() }
    //
    /// number of variables on the tape, including the unused address-zero
    /// sentinel
    pub fn size(&self) -> usize { self.ops.len() + 1 }
    //
    /// highest Taylor order currently stored (`0` if `forward` has never
    /// been called)
    pub fn order(&self) -> usize { self.order_stored.unwrap_or(0) }
    //
    /// an estimate, in bytes, of the memory this `ADFun` is holding for its
    /// Taylor coefficient table
    pub fn memory(&self) -> usize {
        self.taylor.len() * std::mem::size_of::<B>()
    }
    //
    /// number of recorded comparisons whose replayed outcome has ever
    /// disagreed with the value recorded when this `ADFun` was built
    pub fn compare_change(&self) -> usize { self.compare_change }
}
//
impl<B : Clone> ADFun<B> {
    /// the `i`-th constant parameter recorded on the tape; mostly useful
    /// for tests and debugging
    pub fn parameter(&self, i : usize) -> Result<B> {
        self.cop.get(i).cloned().ok_or(Error::IndexOutOfRange{ index : i, limit : self.cop.len() })
    }
}
// ----------------------------------------------------------------------------
// ADFun::new
//
impl<B : Base + 'static> ADFun<B> {
    /// Stops the active recording on this thread and freezes it into an
    /// `ADFun`.
    ///
    /// * x : the independent vector returned by [crate::independent], in
    ///   the same order.
    /// * y : the dependent values computed from `x` during the recording.
    ///
    /// # Example
    /// ```
    /// use rustad::{independent, ADFun};
    /// let ax = independent(vec![1.0, 2.0]).unwrap();
    /// let ay = vec![ &ax[0] + &ax[1] ];
    /// let f = ADFun::new(ax, ay).unwrap();
    /// assert_eq!( f.domain_len(), 2 );
    /// ```
    pub fn new(x : Vec<AD<B>>, y : Vec<AD<B>>) -> Result<ADFun<B>> {
        if y.is_empty() {
            return Err(Error::ArityMismatch{ expected : 1, found : 0 });
        }
        with_tape::<B, _, _>(|tape| {
            if tape.state != RecorderState::Recording {
                return Err(Error::NotRecording);
            }
            for (position, ax) in x.iter().enumerate() {
                let expect_index = (position + 1) as u32;
                if ax.tape_id != tape.tape_id
                    || ax.index != expect_index
                    || !ax.is_variable()
                {
                    return Err(Error::IndependentDrift{ position });
                }
            }
            let mut dep_ad_type = Vec::with_capacity(y.len());
            let mut dep_index   = Vec::with_capacity(y.len());
            for ay in &y {
                if ay.is_variable() && ay.tape_id == tape.tape_id {
                    dep_ad_type.push(ADType::Variable);
                    dep_index.push(ay.index);
                } else {
                    dep_ad_type.push(ADType::Parameter);
                    tape.cop.push(ay.value());
                    dep_index.push((tape.cop.len() - 1) as u32);
                }
            }
            let n_dom       = tape.n_dom;
            let ops         = std::mem::take(&mut tape.ops);
            let cop         = std::mem::take(&mut tape.cop);
            let vecad_init  = std::mem::take(&mut tape.vecad_init);
            let n_row       = ops.len() + 1;
            tape.state = RecorderState::Empty;
            tape.n_dom = 0;
            Ok(ADFun {
                ops,
                cop,
                vecad_init,
                n_dom,
                dep_ad_type,
                dep_index,
                taylor        : vec![B::zero(); n_row],
                cols          : 1,
                order_stored  : None,
                companion     : vec![Vec::new(); n_row],
                resolved      : vec![None; n_row],
                vecad_base    : Vec::new(),
                vecad_registered : false,
                compare_change   : 0,
            })
        })
    }
}
// ----------------------------------------------------------------------------
// small row helpers
//
impl<B : Base + 'static> ADFun<B> {
    fn row_at(&self, row : usize, k : usize) -> B {
        self.taylor[row * self.cols + k]
    }
    fn set_row_at(&mut self, row : usize, k : usize, value : B) {
        self.taylor[row * self.cols + k] = value;
    }
    //
    /// the order `k` coefficient of an operand: a constant parameter is
    /// `cop[idx]` at order zero and zero at every higher order; a variable
    /// reads its row of the Taylor table.
    fn value_at(&self, arg : ArgRef, k : usize) -> B {
        match arg {
            ArgRef::Con(idx) => if k == 0 { self.cop[idx as usize] } else { B::zero() },
            ArgRef::Var(addr) => self.row_at(addr as usize, k),
        }
    }
    //
    fn grow_cols(&mut self, new_cols : usize) {
        if new_cols <= self.cols { return; }
        let n_row = self.ops.len() + 1;
        let mut grown = vec![B::zero(); n_row * new_cols];
        for row in 0 .. n_row {
            for k in 0 .. self.cols {
                grown[row * new_cols + k] = self.taylor[row * self.cols + k];
            }
        }
        self.taylor = grown;
        self.cols   = new_cols;
    }
}
mod forward;
mod reverse;
