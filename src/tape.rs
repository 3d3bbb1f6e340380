// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//! This pub module defines the recorder: the thread-local tape a thread
//! records `AD<V>` operations onto, and the `independent` / `ADFun::new`
//! functions that bracket one recording.
//!
//! Link to [parent module](super)
// ---------------------------------------------------------------------------
//
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Mutex;
//
use crate::ad::AD;
use crate::op::Op;
use crate::error::{Error, Result};
#[cfg(doc)]
use crate::doc_generic_v;
#[cfg(doc)]
use crate::adfn::ADFun;
//
/// Used instead of `usize` to save space in the tape's operand and address
/// vectors.
pub type IndexT = u32;
// ---------------------------------------------------------------------------
// RecorderState
/// The state machine of a thread's recorder; see spec section 4.8 style
/// lifecycle: `Empty --independent--> Recording --ADFun::new--> Empty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RecorderState { Empty, Recording }
// ---------------------------------------------------------------------------
// Tape
/// `Tape` < *V* > is where an in-progress `AD<V>` operation sequence is
/// recorded.
///
/// * V : see [doc_generic_v]
pub struct Tape<V> {
    //
    // state
    pub(crate) state : RecorderState,
    //
    // tape_id
    /// a different tape_id is chosen for each recording; tape_id zero is
    /// never used by a recording (it is the "parameter" sentinel).
    pub(crate) tape_id : usize,
    //
    // n_dom
    /// number of independent variables in the current/last recording
    pub(crate) n_dom : usize,
    //
    // ops
    /// the recorded operation sequence, in topological (recording) order
    pub(crate) ops : Vec<Op>,
    //
    // cop
    /// the pool of constant parameters referenced by `ops`
    pub(crate) cop : Vec<V>,
    //
    // vecad_init
    /// initial contents, by vec_id, of every `VecAD` object that has
    /// participated in this recording
    pub(crate) vecad_init : Vec<Vec<V>>,
}
//
impl<V> Tape<V> {
    /// an empty, non-recording tape
    pub fn new() -> Self {
        Self {
            state      : RecorderState::Empty,
            tape_id    : 0,
            n_dom      : 0,
            ops        : Vec::new(),
            cop        : Vec::new(),
            vecad_init : Vec::new(),
        }
    }
}
// ---------------------------------------------------------------------------
// NEXT_TAPE_ID
/// The tape_id values that have been used are 1 .. NEXT_TAPE_ID.
/// (tape_id 0 is never used for a recording.)
pub(crate) static NEXT_TAPE_ID : Mutex<usize> = Mutex::new(1);
// ---------------------------------------------------------------------------
//
// a thread_local's backing static must have a single concrete type, so a
// tape keyed by the generic base type `V` (spec section 9, "dynamic
// dispatch over B": `f32`, `f64`, and recursively any `AD<V>`) cannot be
// declared as a nested item of a generic function. Instead, one per-thread
// registry holds a type-erased tape per distinct `V` that has ever recorded
// on this thread, downcast back to `Tape<V>` on every access.
thread_local! {
    static REGISTRY : RefCell< HashMap< TypeId, Box<dyn Any> > > = RefCell::new( HashMap::new() );
}
// ----------------------------------------------------------------------------
// with_tape
/// Runs `f` with mutable access to this thread's tape for base type `V`.
pub(crate) fn with_tape<V, F, R>(f : F) -> R
where
    V : Sized + 'static,
    F : FnOnce(&mut Tape<V>) -> R,
{
    REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        let boxed = registry.entry(TypeId::of::<V>())
            .or_insert_with(|| Box::new(RefCell::new(Tape::<V>::new())));
        let cell = boxed.downcast_ref::<RefCell<Tape<V>>>()
            .expect("tape registry type mismatch");
        let mut tape = cell.borrow_mut();
        f(&mut tape)
    })
}
// ----------------------------------------------------------------------------
// independent
//
/// Starts recording a new `AD<V>` operation sequence.
///
/// * Syntax :
/// ```text
///     avar_dom = independent(var_dom)
/// ```
///
/// * V : see [doc_generic_v]
///
/// * Recording : there must not currently be a recording in progress on
///   the current thread.
///
/// * var_dom : the values of the independent variables for use during the
///   recording.
///
/// * avar_dom : a vector of variables with the same length and values as
///   `var_dom`; dependencies with respect to these variables are recorded
///   on the tape for this thread.
///
/// # Example
/// ```
/// use rustad::{independent, ADFun};
/// let x = vec![1.0, 2.0];
/// let ax = independent(x).unwrap();
/// let ay = vec![ &ax[0] + &ax[1], &ax[0] * &ax[1] ];
/// let f = ADFun::new(ax, ay).unwrap();
/// assert_eq!( f.domain_len(), 2 );
/// assert_eq!( f.range_len(), 2 );
/// ```
pub fn independent<V>(var_dom : Vec<V>) -> Result< Vec< AD<V> > >
where
    V : Clone + Sized + 'static,
{
    let tape_id : usize;
    {
        let mut next_tape_id = NEXT_TAPE_ID.lock().unwrap();
        tape_id        = *next_tape_id;
        *next_tape_id += 1;
    }
    with_tape::<V, _, _>( |tape| {
        if tape.state == RecorderState::Recording {
            return Err(Error::AlreadyRecording);
        }
        assert_eq!(tape.ops.len(), 0);
        assert_eq!(tape.cop.len(), 0);
        assert_eq!(tape.vecad_init.len(), 0);
        //
        tape.tape_id = tape_id;
        tape.state   = RecorderState::Recording;
        tape.n_dom   = var_dom.len();
        for _ in 0 .. var_dom.len() {
            tape.ops.push(Op::Inv);
        }
        Ok(())
    } )?;
    let avar_dom = var_dom.into_iter().enumerate().map(
        |(index, value)| AD::variable(tape_id, (index + 1) as IndexT, value)
    ).collect();
    Ok(avar_dom)
}
//
// erase
/// Abandons an in-progress recording and returns the recorder to `Empty`.
/// Used for failure recovery, matching the state machine of spec section
/// 4.8.
pub fn erase<V>()
where V : Sized + 'static,
{
    with_tape::<V, _, _>( |tape| { *tape = Tape::new(); } );
}
