// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//! This pub module defines `VecAD<B>`, an indexed tape vector: element
//! accesses at a runtime (variable) index are recorded as operations so
//! that table lookups driven by the independents stay part of the tape.
//!
//! Link to [parent module](super)
// ----------------------------------------------------------------------------
//
use crate::ad::{AD, ADType, check_active, to_arg};
use crate::base::Base;
use crate::tape::{IndexT, RecorderState, with_tape};
use crate::op::Op;
#[cfg(doc)]
use crate::doc_generic_v;
//
/// sentinel meaning "not yet registered with any recording"
const NOT_REGISTERED : u32 = u32::MAX;
//
// VecAD
/// An indexed tape vector; see spec section 3.1.
///
/// * B : see [doc_generic_v]
///
/// Parameter-indexed accesses (`usize`) never need a tape operation: which
/// slot they touch is already known at record time, so they are handled by
/// direct substitution on `slot`. Variable-indexed accesses (`&AD<B>`)
/// record an `Ldv`/`Stvp`/`Stvv` operator; the slot actually touched
/// depends on the replayed value of the index, so it is resolved once
/// during the recorded function's first `forward(0, ..)` call and cached
/// (see `adfn::resolve_alias`) — the partial of the result with respect to
/// the index is, by the convention spec section 9 documents, zero.
pub struct VecAD<B> {
    pub(crate) vec_id          : u32,
    pub(crate) registered_tape : usize,
    pub(crate) slot            : Vec<AD<B>>,
}
//
impl<B : Base + 'static> VecAD<B> {
    /// creates a vector of the given initial (parameter) values
    pub fn new(init : Vec<B>) -> Self {
        Self {
            vec_id          : NOT_REGISTERED,
            registered_tape : 0,
            slot            : init.into_iter().map(AD::constant).collect(),
        }
    }
    //
    /// number of elements
    pub fn len(&self) -> usize { self.slot.len() }
    //
    /// true if there are no elements
    pub fn is_empty(&self) -> bool { self.slot.is_empty() }
    //
    // ensure_registered
    /// lazily registers this vector's current contents as the initial
    /// contents seen by the active recording, if not already registered
    /// for that recording
    fn ensure_registered(&mut self) {
        with_tape::<B, _, _>(|tape| {
            if tape.state == RecorderState::Recording && tape.tape_id != self.registered_tape {
                self.vec_id          = tape.vecad_init.len() as u32;
                self.registered_tape = tape.tape_id;
                tape.vecad_init.push(
                    self.slot.iter().map(|a| a.value()).collect()
                );
            }
        })
    }
    //
    /// reads slot `k`; never records a tape operation (the slot is always
    /// known at record time)
    pub fn get_p(&mut self, k : usize) -> AD<B> {
        self.slot[k]
    }
    //
    /// writes slot `k`; records a store operator so a later variable-index
    /// read can be resolved against the replayed contents of this vector
    pub fn set_p(&mut self, k : usize, value : AD<B>) {
        self.ensure_registered();
        with_tape::<B, _, _>(|tape| {
            if tape.state == RecorderState::Recording && tape.tape_id == self.registered_tape {
                let active = check_active(tape, &value);
                let value_arg = to_arg(tape, &value, active);
                let op = if active {
                    Op::Stpv{ vec_id : self.vec_id, slot : k, value : value_arg }
                } else {
                    Op::Stpp{ vec_id : self.vec_id, slot : k, value : value_arg }
                };
                tape.ops.push(op);
            }
        });
        self.slot[k] = value;
    }
    //
    /// reads the element at a (possibly variable) index
    pub fn get_v(&mut self, index : &AD<B>) -> AD<B> {
        if index.ad_type != ADType::Variable {
            let k = index.value().to_f64().round() as usize;
            return self.get_p(k);
        }
        self.ensure_registered();
        let k = index.value().to_f64().round() as usize;
        let value = self.slot[k].value();
        with_tape::<B, _, _>(|tape| {
            let index_active = check_active(tape, index);
            let index_arg = to_arg(tape, index, index_active);
            tape.ops.push(Op::Ldv{ vec_id : self.vec_id, index : index_arg });
            AD::variable(tape.tape_id, tape.ops.len() as IndexT, value)
        })
    }
    //
    /// writes the element at a (possibly variable) index
    pub fn set_v(&mut self, index : &AD<B>, value : AD<B>) {
        if index.ad_type != ADType::Variable {
            let k = index.value().to_f64().round() as usize;
            self.set_p(k, value);
            return;
        }
        self.ensure_registered();
        let k = index.value().to_f64().round() as usize;
        with_tape::<B, _, _>(|tape| {
            let index_active = check_active(tape, index);
            let value_active = check_active(tape, &value);
            let index_arg = to_arg(tape, index, index_active);
            let value_arg = to_arg(tape, &value, value_active);
            let op = if value_active {
                Op::Stvv{ vec_id : self.vec_id, index : index_arg, value : value_arg }
            } else {
                Op::Stvp{ vec_id : self.vec_id, index : index_arg, value : value_arg }
            };
            tape.ops.push(op);
        });
        self.slot[k] = value;
    }
}
