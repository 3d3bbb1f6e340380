// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//! `rustad` is an operator-overloading automatic-differentiation library.
//!
//! A user writes a numerical algorithm once using the scalar type [AD], a
//! thread-local recorder captures every elementary operation into a tape,
//! and the recorded [ADFun] is then replayed to compute Taylor coefficients
//! (forward mode), adjoints (reverse mode), and Jacobian/Hessian sparsity
//! patterns and values, at a cost proportional to the recorded operation
//! sequence.
//!
//! # Example
//! ```
//! use rustad::{independent, ADFun};
//! let ax = independent(vec![1.0, 2.0]).unwrap();
//! let ay = vec![ &ax[0] * &ax[1] + &ax[0] ];
//! let mut f = ADFun::new(ax, ay).unwrap();
//! let y = f.forward(0, &[3.0, 4.0], false).unwrap();
//! assert_eq!(y, vec![15.0]);
//! ```
// ----------------------------------------------------------------------------
//
pub mod ad;
pub mod adfn;
pub mod base;
pub mod error;
pub(crate) mod op;
pub mod tape;
pub mod vecad;
//
pub use ad::{cexp, AD, ADType};
pub use adfn::sparsity::BitRow;
pub use adfn::ADFun;
pub use base::{doc_generic_v, Base};
pub use error::{Error, Result};
pub use tape::{independent, IndexT};
pub use vecad::VecAD;
//
// YEAR_MONTH_DAY
/// The date corresponding to this version of the software as year.month.day
///
/// # Example
/// ```
/// let version : &str = *rustad::YEAR_MONTH_DAY;
/// assert_eq!(version, "2026.7.31");
/// ```
pub static YEAR_MONTH_DAY: std::sync::LazyLock<&str> =
   std::sync::LazyLock::new( || "2026.7.31" );
