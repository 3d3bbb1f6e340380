// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//! Thin drivers composing the forward and reverse sweeps: `jacobian`,
//! `hessian`, `for_one`, `rev_one`, `for_two`, `rev_two`.
//!
//! Link to [parent module](super::super)
// ----------------------------------------------------------------------------
//
use crate::ad::ADType;
use crate::base::Base;
use crate::error::{Error, Result};
use super::ADFun;
//
impl<B : Base + 'static> ADFun<B> {
    /// The full Jacobian at `x`, row-major (`J[i * n + j] = dF_i/dx_j`).
    ///
    /// Chooses the forward sweep (one pass per independent) when
    /// `domain_len()` is at most the number of dependents that are actual
    /// variables (a parameter dependent needs no sweep pass at all), or the
    /// reverse sweep (one pass per dependent) otherwise.
    pub fn jacobian(&mut self, x : &[B]) -> Result<Vec<B>> {
        let n = self.domain_len();
        let m = self.range_len();
        let n_var_dep = self.dep_ad_type.iter().filter(|t| **t == ADType::Variable).count();
        self.forward(0, x, false)?;
        let mut jac = vec![B::zero(); m * n];
        if n <= n_var_dep {
            for j in 0 .. n {
                let mut e = vec![B::zero(); n];
                e[j] = B::one();
                let dy = self.forward(1, &e, false)?;
                for i in 0 .. m { jac[i * n + j] = dy[i]; }
            }
        } else {
            for i in 0 .. m {
                let mut w = vec![B::zero(); m];
                w[i] = B::one();
                let dw = self.reverse(1, &w, false)?;
                for j in 0 .. n { jac[i * n + j] = dw[j]; }
            }
        }
        Ok(jac)
    }
    //
    /// The Hessian of dependent `i` at `x`, row-major (`n * n`).
    pub fn hessian(&mut self, x : &[B], i : usize) -> Result<Vec<B>> {
        let n = self.domain_len();
        let m = self.range_len();
        if i >= m { return Err(Error::IndexOutOfRange{ index : i, limit : m }); }
        self.forward(0, x, false)?;
        let mut w = vec![B::zero(); m];
        w[i] = B::one();
        let mut hes = vec![B::zero(); n * n];
        for j in 0 .. n {
            let mut e = vec![B::zero(); n];
            e[j] = B::one();
            self.forward(1, &e, false)?;
            let dw = self.reverse(2, &w, false)?;
            for k in 0 .. n { hes[k * n + j] = dw[k * 2 + 1]; }
        }
        Ok(hes)
    }
    //
    /// First-order forward partial: `forward(0, x)` then `forward(1, e_j)`.
    pub fn for_one(&mut self, x : &[B], j : usize) -> Result<Vec<B>> {
        let n = self.domain_len();
        if j >= n { return Err(Error::IndexOutOfRange{ index : j, limit : n }); }
        self.forward(0, x, false)?;
        let mut e = vec![B::zero(); n];
        e[j] = B::one();
        self.forward(1, &e, false)
    }
    //
    /// First-order reverse partial: `forward(0, x)` then `reverse(1, e_i)`.
    pub fn rev_one(&mut self, x : &[B], i : usize) -> Result<Vec<B>> {
        let m = self.range_len();
        if i >= m { return Err(Error::IndexOutOfRange{ index : i, limit : m }); }
        self.forward(0, x, false)?;
        let mut w = vec![B::zero(); m];
        w[i] = B::one();
        self.reverse(1, &w, false)
    }
    //
    /// Second partials `d^2 F / dx_j dx_k` for every dependent, via
    /// `D_{jk} - D_{jj} - D_{kk}` off the diagonal (`2 D_{jj}` on it), where
    /// `D` is the order-2 forward coefficient from direction `e_j + e_k`.
    /// Diagonal passes are cached in `diag` across repeated calls with the
    /// same `j` or `k`.
    pub fn for_two(&mut self, x : &[B], j : usize, k : usize, diag : &mut Vec<Option<Vec<B>>>) -> Result<Vec<B>> {
        let n = self.domain_len();
        let m = self.range_len();
        if j >= n { return Err(Error::IndexOutOfRange{ index : j, limit : n }); }
        if k >= n { return Err(Error::IndexOutOfRange{ index : k, limit : n }); }
        if diag.len() < n { diag.resize(n, None); }
        if j == k {
            let djj = self.diag_entry(x, j, n, diag)?;
            return Ok(djj.into_iter().map(|v| v * B::from_f64(2.0)).collect());
        }
        let djj = self.diag_entry(x, j, n, diag)?;
        let dkk = self.diag_entry(x, k, n, diag)?;
        self.forward(0, x, false)?;
        let mut e = vec![B::zero(); n];
        e[j] = B::one();
        e[k] = B::one();
        self.forward(1, &e, false)?;
        let djk = self.forward(2, &vec![B::zero(); n], false)?;
        let mut result = Vec::with_capacity(m);
        for i in 0 .. m { result.push(djk[i] - djj[i] - dkk[i]); }
        Ok(result)
    }
    //
    fn diag_entry(&mut self, x : &[B], j : usize, n : usize, diag : &mut [Option<Vec<B>>]) -> Result<Vec<B>> {
        if diag[j].is_none() {
            self.forward(0, x, false)?;
            let mut e = vec![B::zero(); n];
            e[j] = B::one();
            self.forward(1, &e, false)?;
            let d = self.forward(2, &vec![B::zero(); n], false)?;
            diag[j] = Some(d);
        }
        Ok(diag[j].clone().unwrap())
    }
    //
    /// Second-order reverse partials `d^2 w^T F / dx_j dx_i` for a fixed
    /// `j`: one `forward(1, e_j)` then `reverse(2, e_i)`. Callers batching
    /// many `(i, j)` pairs should group by `j` to avoid repeating the
    /// `forward(1, ..)` pass.
    pub fn rev_two(&mut self, x : &[B], i : usize, j : usize) -> Result<Vec<B>> {
        let n = self.domain_len();
        let m = self.range_len();
        if i >= m { return Err(Error::IndexOutOfRange{ index : i, limit : m }); }
        if j >= n { return Err(Error::IndexOutOfRange{ index : j, limit : n }); }
        self.forward(0, x, false)?;
        let mut e = vec![B::zero(); n];
        e[j] = B::one();
        self.forward(1, &e, false)?;
        let mut w = vec![B::zero(); m];
        w[i] = B::one();
        self.reverse(2, &w, false)
    }
}
