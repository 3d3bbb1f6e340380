// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//! This pub module defines the Error type returned at the public API
//! boundary.
//!
//! Link to [parent module](super)
// ----------------------------------------------------------------------------
//
// Error
/// The kinds of failure that can occur at the public API boundary.
///
/// Internal invariants that a caller obeying the public contract can never
/// trigger (tape bookkeeping, the arity of a recorded operator) are still
/// enforced with `assert!` / `debug_assert!`, matching the rest of this
/// crate. This enum is reserved for the failure modes a caller can actually
/// hit by misusing the recorder, an `ADFun`, or a driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// An operation was recorded while the current thread's recorder was
    /// not in the `Recording` state.
    NotRecording,
    //
    /// [crate::independent] was called while the current thread's recorder
    /// was already `Recording`.
    AlreadyRecording,
    //
    /// An `AD<B>` value's tape address refers to a recording that is no
    /// longer live.
    StaleTapeReference,
    //
    /// A vector argument to a public operation has the wrong length.
    ArityMismatch {
        /// the length that was expected
        expected : usize,
        /// the length that was found
        found    : usize,
    },
    //
    /// `forward(p, ..)` was called with `p` more than one past the
    /// highest order currently stored.
    OrderGap {
        /// order requested
        requested : usize,
        /// `order() + 1`, the highest order that can be requested
        limit     : usize,
    },
    //
    /// `reverse(p, ..)` was called before forward orders `0 .. p-1`
    /// were all stored.
    OrderMissing {
        /// order requested
        requested : usize,
        /// the highest order currently stored
        stored    : usize,
    },
    //
    /// A driver index (domain or range) is out of bounds.
    IndexOutOfRange {
        /// the index that was supplied
        index : usize,
        /// one past the largest valid index
        limit : usize,
    },
    //
    /// `ADFun::new` detected that one of the independent vector's entries
    /// no longer has the tape address it was assigned at
    /// [crate::independent] time.
    IndependentDrift {
        /// position in the independent vector
        position : usize,
    },
}
//
impl std::fmt::Display for Error {
    fn fmt(&self, f : &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::NotRecording =>
                write!(f, "operation recorded while not recording"),
            Error::AlreadyRecording =>
                write!(f, "independent called while already recording"),
            Error::StaleTapeReference =>
                write!(f, "AD value refers to a recording that is no longer live"),
            Error::ArityMismatch{expected, found} =>
                write!(f, "expected a vector of length {expected}, found {found}"),
            Error::OrderGap{requested, limit} =>
                write!(f, "forward order {requested} requested, at most {limit} allowed"),
            Error::OrderMissing{requested, stored} =>
                write!(f,
                    "reverse order {requested} requested, only {stored} forward orders stored"
                ),
            Error::IndexOutOfRange{index, limit} =>
                write!(f, "index {index} out of range, limit is {limit}"),
            Error::IndependentDrift{position} =>
                write!(f, "independent vector entry {position} no longer matches its tape address"),
        }
    }
}
//
impl std::error::Error for Error {}
//
/// Convenience alias for `Result<T, Error>` used throughout the public API.
pub type Result<T> = std::result::Result<T, Error>;
