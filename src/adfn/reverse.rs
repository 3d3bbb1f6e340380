// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//! The reverse sweep: given a weight vector on the dependent values,
//! propagates adjoints back through the recorded operators, in reverse
//! recording order, onto the independent vector's Taylor coefficients.
//!
//! Every operator whose forward Taylor recurrence is self-referential
//! (its own earlier-order coefficients feed its later ones — division,
//! square root, and every transcendental here) is reversed by walking
//! its defining recurrence from the highest requested order down to
//! zero, accumulating contributions directly into the same adjoint
//! storage a later (already-processed) operator wrote into; by the time
//! a given order is visited, every contribution aimed at it has already
//! landed.
// ----------------------------------------------------------------------------
//
use super::*;
//
impl<B : Base + 'static> ADFun<B> {
    /// Propagates the adjoint of a weighted sum of the dependent values
    /// back onto the Taylor coefficients of the independent vector.
    ///
    /// * p : number of orders to propagate; requires `order() >= p - 1`.
    /// * w : one weight per dependent value.
    /// * trace : if true, a trace of the sweep is printed on standard
    ///   output (one line per tape operator visited, in reverse order).
    ///
    /// Returns a `domain_len() * p` vector: entry `j * p + k` is the
    /// adjoint of the order `k` Taylor coefficient of independent `j`.
    pub fn reverse(&mut self, p : usize, w : &[B], trace : bool) -> Result<Vec<B>> {
        if w.len() != self.dep_ad_type.len() {
            return Err(Error::ArityMismatch{ expected : self.dep_ad_type.len(), found : w.len() });
        }
        if trace {
            println!("Begin Trace: reverse: p = {}, n_dom = {}", p, self.n_dom);
            println!("row, op");
        }
        let stored = self.order_stored.unwrap_or(0);
        if p == 0 || self.order_stored.is_none() || stored + 1 < p {
            return Err(Error::OrderMissing{ requested : p, stored });
        }
        let n_row = self.ops.len() + 1;
        let mut partial = vec![B::zero(); n_row * p];
        for i in 0 .. self.dep_ad_type.len() {
            if self.dep_ad_type[i] == ADType::Variable {
                let row = self.dep_index[i] as usize;
                partial[row * p + (p - 1)] += w[i];
            }
        }
        for i in (0 .. self.ops.len()).rev() {
            let op  = self.ops[i];
            let row = i + 1;
            if !op.has_result() { continue; }
            if trace { println!("{}, {}", row, op.name()); }
            match op {
                Op::Inv => {}
                Op::Add(l, r) => {
                    for k in 0 .. p {
                        let d = self.pget(&partial, row, k, p);
                        self.padd_arg(&mut partial, l, k, p, d);
                        self.padd_arg(&mut partial, r, k, p, d);
                    }
                }
                Op::Sub(l, r) => {
                    for k in 0 .. p {
                        let d = self.pget(&partial, row, k, p);
                        self.padd_arg(&mut partial, l, k, p, d);
                        self.padd_arg(&mut partial, r, k, p, -d);
                    }
                }
                Op::Neg(u) => {
                    for k in 0 .. p {
                        let d = self.pget(&partial, row, k, p);
                        self.padd_arg(&mut partial, u, k, p, -d);
                    }
                }
                Op::Mul(l, r) => {
                    for k in 0 .. p {
                        let d = self.pget(&partial, row, k, p);
                        for j in 0 ..= k {
                            let vj = self.value_at(r, k - j);
                            self.padd_arg(&mut partial, l, j, p, d * vj);
                            let uj = self.value_at(l, j);
                            self.padd_arg(&mut partial, r, k - j, p, d * uj);
                        }
                    }
                }
                Op::Div(l, r) => self.reverse_div(&mut partial, row, l, r, p),
                Op::Abs(u) => {
                    let u0   = self.value_at(u, 0);
                    let sign = if u0 >= B::zero() { B::one() } else { -B::one() };
                    for k in 0 .. p {
                        let d = self.pget(&partial, row, k, p);
                        self.padd_arg(&mut partial, u, k, p, sign * d);
                    }
                }
                Op::Sqrt(u) => self.reverse_sqrt(&mut partial, row, u, p),
                Op::Exp(u)  => self.reverse_exp(&mut partial, row, u, p),
                Op::Ln(u)   => self.reverse_ln(&mut partial, row, u, p),
                Op::Sin(u)  => self.reverse_paired(&mut partial, row, u, p, true,  false),
                Op::Cos(u)  => self.reverse_paired(&mut partial, row, u, p, false, true),
                Op::Sinh(u) => self.reverse_paired(&mut partial, row, u, p, true,  true),
                Op::Cosh(u) => self.reverse_paired(&mut partial, row, u, p, true,  true),
                Op::Atan(u) => self.reverse_atan(&mut partial, row, u, p),
                Op::Asin(u) => self.reverse_asin_acos(&mut partial, row, u, p, true),
                Op::Acos(u) => self.reverse_asin_acos(&mut partial, row, u, p, false),
                Op::Pow(u, n) => self.reverse_pow(&mut partial, row, u, n, p),
                Op::Com{ left, .. } => {
                    for k in 0 .. p {
                        let d = self.pget(&partial, row, k, p);
                        self.padd_arg(&mut partial, left, k, p, d);
                    }
                }
                Op::CExp{..} | Op::Ldv{..} => {
                    let alias = self.resolved[row].expect("resolved at forward order 0");
                    for k in 0 .. p {
                        let d = self.pget(&partial, row, k, p);
                        self.padd_arg(&mut partial, alias, k, p, d);
                    }
                }
                Op::Ldp{..} | Op::Stpp{..} | Op::Stpv{..} | Op::Stvp{..} | Op::Stvv{..} =>
                    unreachable!("store/compile-time-load operators have no result row"),
            }
        }
        let mut dw = vec![B::zero(); self.n_dom * p];
        for j in 0 .. self.n_dom {
            let row = j + 1;
            for k in 0 .. p {
                dw[j * p + k] = self.pget(&partial, row, p - 1 - k, p);
            }
        }
        if trace { println!("End Trace: reverse"); }
        Ok(dw)
    }
    //
    fn pget(&self, partial : &[B], row : usize, k : usize, p : usize) -> B {
        partial[row * p + k]
    }
    fn padd(&self, partial : &mut [B], row : usize, k : usize, p : usize, delta : B) {
        let at = row * p + k;
        partial[at] += delta;
    }
    fn padd_arg(&self, partial : &mut [B], arg : ArgRef, k : usize, p : usize, delta : B) {
        if let ArgRef::Var(a) = arg { self.padd(partial, a as usize, k, p, delta); }
    }
    //
    // reverse_div
    fn reverse_div(&self, partial : &mut [B], row : usize, l : ArgRef, r : ArgRef, p : usize) {
        let v0 = self.value_at(r, 0);
        for k in (0 .. p).rev() {
            let am = self.pget(partial, row, k, p);
            self.padd_arg(partial, l, k, p, am / v0);
            let yk = self.row_at(row, k);
            self.padd_arg(partial, r, 0, p, am * (-yk / v0));
            for j in 1 ..= k {
                let vj  = self.value_at(r, j);
                let ykj = self.row_at(row, k - j);
                self.padd_arg(partial, r, j, p, am * (-ykj / v0));
                self.padd(partial, row, k - j, p, am * (-vj / v0));
            }
        }
    }
    //
    // reverse_sqrt
    fn reverse_sqrt(&self, partial : &mut [B], row : usize, u : ArgRef, p : usize) {
        let y0 = self.row_at(row, 0);
        for k in (1 .. p).rev() {
            let am = self.pget(partial, row, k, p);
            self.padd_arg(partial, u, k, p, am / (B::from_f64(2.0) * y0));
            let yk = self.row_at(row, k);
            self.padd(partial, row, 0, p, am * (-yk / y0));
            for i in 1 .. k {
                let yki = self.row_at(row, k - i);
                self.padd(partial, row, i, p, am * (-yki / y0));
            }
        }
        let am0 = self.pget(partial, row, 0, p);
        self.padd_arg(partial, u, 0, p, am0 / (B::from_f64(2.0) * y0));
    }
    //
    // reverse_exp
    /// exp's own row is self-referential (`y' = y*u'`); no companion needed.
    fn reverse_exp(&self, partial : &mut [B], row : usize, u : ArgRef, p : usize) {
        for k in (1 .. p).rev() {
            let am = self.pget(partial, row, k, p);
            let kf = B::from_f64(k as f64);
            for j in 1 ..= k {
                let jf   = B::from_f64(j as f64);
                let coef = am * (jf / kf);
                let ykj  = self.row_at(row, k - j);
                self.padd_arg(partial, u, j, p, coef * ykj);
                let uj = self.value_at(u, j);
                self.padd(partial, row, k - j, p, coef * uj);
            }
        }
        let am0 = self.pget(partial, row, 0, p);
        let y0  = self.row_at(row, 0);
        self.padd_arg(partial, u, 0, p, am0 * y0);
    }
    //
    // reverse_ln
    fn reverse_ln(&self, partial : &mut [B], row : usize, u : ArgRef, p : usize) {
        let u0 = self.value_at(u, 0);
        for k in (1 .. p).rev() {
            let am = self.pget(partial, row, k, p);
            let kf = B::from_f64(k as f64);
            self.padd_arg(partial, u, k, p, am / u0);
            let yk = self.row_at(row, k);
            self.padd_arg(partial, u, 0, p, am * (-yk / u0));
            for j in 1 .. k {
                let jf  = B::from_f64(j as f64);
                let coef = am * (jf / kf) / u0;
                let ukj = self.value_at(u, k - j);
                self.padd(partial, row, j, p, -coef * ukj);
                let yj = self.row_at(row, j);
                self.padd_arg(partial, u, k - j, p, -coef * yj);
            }
        }
        let am0 = self.pget(partial, row, 0, p);
        self.padd_arg(partial, u, 0, p, am0 / u0);
    }
    //
    // reverse_pow
    /// Reverses `forward_pow`'s `u * y' = n * y * u'` recurrence.
    fn reverse_pow(&self, partial : &mut [B], row : usize, u : ArgRef, n : i32, p : usize) {
        let u0 = self.value_at(u, 0);
        let nf = B::from_f64(n as f64);
        for k in (1 .. p).rev() {
            let am = self.pget(partial, row, k, p);
            let kf = B::from_f64(k as f64);
            let denom = kf * u0;
            for j in 1 ..= k {
                let jf  = B::from_f64(j as f64);
                let ykj = self.row_at(row, k - j);
                let coef = (nf * jf - (kf - jf)) / denom;
                self.padd_arg(partial, u, j, p, am * coef * ykj);
            }
            for m in 0 .. k {
                let mf  = B::from_f64(m as f64);
                let ukm = self.value_at(u, k - m);
                let coef = (nf * (kf - mf) - mf) / denom;
                self.padd(partial, row, m, p, am * coef * ukm);
            }
            let yk = self.row_at(row, k);
            self.padd_arg(partial, u, 0, p, am * (-yk / u0));
        }
        let am0 = self.pget(partial, row, 0, p);
        self.padd_arg(partial, u, 0, p, am0 * nf * self.row_at(row, 0) / u0);
    }
    //
    // reverse_atan
    /// `companion[row]` holds `b = 1 + u^2`, built purely from `u`; its own
    /// adjoint is distributed into `u` via the ordinary product rule once
    /// the (self-referential) outer recurrence has been fully walked.
    fn reverse_atan(&self, partial : &mut [B], row : usize, u : ArgRef, p : usize) {
        let b0 = self.companion[row][0];
        let mut b_adj = vec![B::zero(); p];
        for k in (1 .. p).rev() {
            let am = self.pget(partial, row, k, p);
            let kf = B::from_f64(k as f64);
            self.padd_arg(partial, u, k, p, am / b0);
            let yk = self.row_at(row, k);
            b_adj[0] += am * (-yk / b0);
            for j in 1 .. k {
                let jf  = B::from_f64(j as f64);
                let coef = am * (jf / kf) / b0;
                let bkj = self.companion[row][k - j];
                self.padd(partial, row, j, p, -coef * bkj);
                let yj = self.row_at(row, j);
                b_adj[k - j] -= coef * yj;
            }
        }
        let am0 = self.pget(partial, row, 0, p);
        self.padd_arg(partial, u, 0, p, am0 / b0);
        self.distribute_square(partial, u, &b_adj, p, B::from_f64(2.0));
    }
    //
    // reverse_asin_acos
    /// `companion[row]` holds `b = sqrt(1 - u^2)`; `acos = -asin`, so the
    /// outer recurrence is run in terms of the un-negated quantity via a
    /// `sign` factor and converted back on every self-write.
    fn reverse_asin_acos(&self, partial : &mut [B], row : usize, u : ArgRef, p : usize, is_asin : bool) {
        let b0   = self.companion[row][0];
        let sign = if is_asin { B::one() } else { -B::one() };
        let mut b_adj = vec![B::zero(); p];
        for k in (1 .. p).rev() {
            let am = sign * self.pget(partial, row, k, p);
            let kf = B::from_f64(k as f64);
            self.padd_arg(partial, u, k, p, am / b0);
            let yk = sign * self.row_at(row, k);
            b_adj[0] += am * (-yk / b0);
            for j in 1 .. k {
                let jf   = B::from_f64(j as f64);
                let coef = am * (jf / kf) / b0;
                let bkj  = self.companion[row][k - j];
                self.padd(partial, row, j, p, sign * (-coef * bkj));
                let yj = sign * self.row_at(row, j);
                b_adj[k - j] -= coef * yj;
            }
        }
        let am0 = sign * self.pget(partial, row, 0, p);
        self.padd_arg(partial, u, 0, p, am0 / b0);
        //
        // distribute b_adj through the sqrt stage (b = sqrt(1 - u*u))
        let mut c_adj = vec![B::zero(); p];
        for k in (1 .. p).rev() {
            let bm = b_adj[k];
            c_adj[k] += bm / (B::from_f64(2.0) * b0);
            let bk = self.companion[row][k];
            b_adj[0] += bm * (-bk / b0);
            for i in 1 .. k {
                let bki = self.companion[row][k - i];
                b_adj[i] += bm * (-bki / b0);
            }
        }
        c_adj[0] += b_adj[0] / (B::from_f64(2.0) * b0);
        //
        // distribute c_adj through c = 1 - u*u into u
        self.distribute_square(partial, u, &c_adj, p, B::from_f64(-2.0));
    }
    //
    // reverse_paired
    /// Shared reverse for the `sin`/`cos` and `sinh`/`cosh` pairs: `row`
    /// holds `x` and `companion[row]` holds the mutually-recursive partner
    /// `c`; `x_sign`/`c_sign` pick out which of the two recurrences carries
    /// the leading minus sign (`cos`'s own row, and nothing else).
    fn reverse_paired(
        &self, partial : &mut [B], row : usize, u : ArgRef, p : usize,
        x_sign : bool, c_sign : bool,
    ) {
        let sx = if x_sign { B::one() } else { -B::one() };
        let sc = if c_sign { B::one() } else { -B::one() };
        let mut c_adj = vec![B::zero(); p];
        for m in (1 .. p).rev() {
            let mf = B::from_f64(m as f64);
            let am = self.pget(partial, row, m, p);
            for j in 1 ..= m {
                let jf   = B::from_f64(j as f64);
                let coef = sx * am * (jf / mf);
                let cmj  = self.companion[row][m - j];
                self.padd_arg(partial, u, j, p, coef * cmj);
                let uj = self.value_at(u, j);
                c_adj[m - j] += coef * uj;
            }
            let bm = c_adj[m];
            for j in 1 ..= m {
                let jf   = B::from_f64(j as f64);
                let coef = sc * bm * (jf / mf);
                let xmj  = self.row_at(row, m - j);
                self.padd_arg(partial, u, j, p, coef * xmj);
                let uj = self.value_at(u, j);
                self.padd(partial, row, m - j, p, coef * uj);
            }
        }
        let am0 = self.pget(partial, row, 0, p);
        let c0  = self.companion[row][0];
        let x0  = self.row_at(row, 0);
        self.padd_arg(partial, u, 0, p, am0 * sx * c0);
        self.padd_arg(partial, u, 0, p, c_adj[0] * sc * x0);
    }
    //
    /// Distributes the adjoint of `b[m] = sum_{i=0}^m u[i]*u[m-i]` (for
    /// `coef == 2`) or its negation (`coef == -2`) into `u`'s adjoint.
    fn distribute_square(&self, partial : &mut [B], u : ArgRef, b_adj : &[B], p : usize, coef : B) {
        for m in 0 .. p {
            let bm = b_adj[m];
            if let ArgRef::Var(_) = u {
                for i in 0 ..= m {
                    let ui = self.value_at(u, m - i);
                    self.padd_arg(partial, u, i, p, bm * coef * ui);
                }
            }
        }
    }
}
