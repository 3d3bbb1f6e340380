// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
// ---------------------------------------------------------------------------
//! The forward sweep: computes one more Taylor coefficient order for every
//! variable on the tape, in recording order.
// ----------------------------------------------------------------------------
//
use super::*;
//
impl<B : Base + 'static> ADFun<B> {
    /// Computes Taylor coefficient order `p` for every variable on the
    /// tape, given the order `p` coefficients of the independent vector.
    ///
    /// * p : the order being computed; must be at most `order() + 1`.
    /// * up : order `p` coefficients of the independent vector, one per
    ///   independent (for `p == 0` this is the domain point itself).
    /// * trace : if true, a trace of the sweep is printed on standard
    ///   output (one line per tape operator, plus the order-`p` coefficient
    ///   it computed).
    ///
    /// Returns the order `p` coefficients of the dependent vector.
    pub fn forward(&mut self, p : usize, up : &[B], trace : bool) -> Result<Vec<B>> {
        if up.len() != self.n_dom {
            return Err(Error::ArityMismatch{ expected : self.n_dom, found : up.len() });
        }
        if trace {
            println!("Begin Trace: forward: p = {}, n_dom = {}", p, self.n_dom);
            println!("row, op, value");
        }
        let limit = self.order_stored.map_or(0, |o| o + 1);
        if p > limit {
            return Err(Error::OrderGap{ requested : p, limit });
        }
        self.grow_cols(p + 1);
        if p == 0 {
            if !self.vecad_registered { self.register_vecad_init(); }
            // a fresh order-zero pass restarts the Taylor expansion at a
            // (possibly new) domain point; per-row companion series are
            // append-only, so they must be reset here or order p > 0 would
            // read stale entries left over from a previous expansion.
            for companion in self.companion.iter_mut() { companion.clear(); }
        }
        //
        // shadow[vec_id][slot] is the ArgRef currently occupying that slot,
        // rebuilt fresh each time since only the k == 0 pass needs it (a
        // later Ldv/CExp alias is resolved once and cached in `resolved`).
        let mut shadow : Vec<Vec<ArgRef>> = if p == 0 {
            self.vecad_base.iter().zip(self.vecad_init.iter()).map(
                |(&base, init)| (0 .. init.len()).map(
                    |j| ArgRef::Con(base + j as u32)
                ).collect()
            ).collect()
        } else {
            Vec::new()
        };
        //
        for i in 0 .. self.ops.len() {
            let op  = self.ops[i];
            let row = i + 1;
            if !op.has_result() {
                if p == 0 { self.replay_store(op, &mut shadow); }
                continue;
            }
            let value = match op {
                Op::Inv => {
                    let j = row - 1;
                    up[j]
                }
                Op::Add(l, r) => self.value_at(l, p) + self.value_at(r, p),
                Op::Sub(l, r) => self.value_at(l, p) - self.value_at(r, p),
                Op::Mul(l, r) => {
                    let mut acc = B::zero();
                    for j in 0 ..= p { acc += self.value_at(l, j) * self.value_at(r, p - j); }
                    acc
                }
                Op::Div(l, r) => {
                    let v0 = self.value_at(r, 0);
                    let mut acc = self.value_at(l, p);
                    for j in 1 ..= p { acc -= self.value_at(r, j) * self.row_at(row, p - j); }
                    acc / v0
                }
                Op::Neg(u) => -self.value_at(u, p),
                Op::Abs(u) => {
                    if p == 0 { Base::abs(self.value_at(u, 0)) }
                    else {
                        let u0 = self.value_at(u, 0);
                        let sign = if u0 >= B::zero() { B::one() } else { -B::one() };
                        sign * self.value_at(u, p)
                    }
                }
                Op::Sqrt(u) => self.forward_sqrt(row, u, p),
                Op::Exp(u)  => self.forward_exp(row, u, p),
                Op::Ln(u)   => self.forward_ln(row, u, p),
                Op::Sin(u)  => self.forward_sin_cos(row, u, p, true),
                Op::Cos(u)  => self.forward_sin_cos(row, u, p, false),
                Op::Sinh(u) => self.forward_sinh_cosh(row, u, p, true),
                Op::Cosh(u) => self.forward_sinh_cosh(row, u, p, false),
                Op::Atan(u) => self.forward_atan(row, u, p),
                Op::Asin(u) => self.forward_asin_acos(row, u, p, true),
                Op::Acos(u) => self.forward_asin_acos(row, u, p, false),
                Op::Com{ op, left, right, result } => {
                    if p == 0 {
                        let replay = op.eval(self.value_at(left, 0), self.value_at(right, 0));
                        if replay != result { self.compare_change += 1; }
                    }
                    self.value_at(left, p)
                }
                Op::CExp{ cmp, left, right, if_true, if_false } => {
                    if p == 0 {
                        let cond = cmp.eval(self.value_at(left, 0), self.value_at(right, 0));
                        let alias = if cond { if_true } else { if_false };
                        self.resolved[row] = Some(alias);
                    }
                    let alias = self.resolved[row].expect("CExp resolved at order 0");
                    self.value_at(alias, p)
                }
                Op::Ldv{ vec_id, index } => {
                    if p == 0 {
                        let k = self.value_at(index, 0).to_f64().round() as usize;
                        let alias = shadow[vec_id as usize][k];
                        self.resolved[row] = Some(alias);
                    }
                    let alias = self.resolved[row].expect("Ldv resolved at order 0");
                    self.value_at(alias, p)
                }
                Op::Pow(u, n) => self.forward_pow(row, u, n, p),
                Op::Ldp{..} => unreachable!("Ldp is resolved by direct substitution, never tape-recorded"),
                Op::Stpp{..} | Op::Stpv{..} | Op::Stvp{..} | Op::Stvv{..} => unreachable!("handled above"),
            };
            self.set_row_at(row, p, value);
            if trace { println!("{}, {}, {}", row, op.name(), value); }
        }
        self.order_stored = Some(p);
        if trace { println!("End Trace: forward"); }
        //
        let mut dy = Vec::with_capacity(self.dep_ad_type.len());
        for i in 0 .. self.dep_ad_type.len() {
            let value = match self.dep_ad_type[i] {
                ADType::Parameter => if p == 0 { self.cop[self.dep_index[i] as usize] } else { B::zero() },
                ADType::Variable  => self.row_at(self.dep_index[i] as usize, p),
            };
            dy.push(value);
        }
        Ok(dy)
    }
    //
    /// Registers every `VecAD`'s initial contents into `cop`, once, the
    /// first time `forward(0, ..)` runs.
    fn register_vecad_init(&mut self) {
        self.vecad_base.clear();
        for init in &self.vecad_init {
            self.vecad_base.push(self.cop.len() as u32);
            for value in init { self.cop.push(*value); }
        }
        self.vecad_registered = true;
    }
    //
    /// Replays a store operator into the `k == 0` shadow table (parameter
    /// and variable indexed stores alike; the slot touched by a
    /// variable-indexed store is resolved against the order-zero index,
    /// exactly like `Ldv`).
    fn replay_store(&self, op : Op, shadow : &mut [Vec<ArgRef>]) {
        match op {
            Op::Stpp{ vec_id, slot, value } | Op::Stpv{ vec_id, slot, value } => {
                shadow[vec_id as usize][slot] = value;
            }
            Op::Stvp{ vec_id, index, value } | Op::Stvv{ vec_id, index, value } => {
                let k = self.value_at(index, 0).to_f64().round() as usize;
                shadow[vec_id as usize][k] = value;
            }
            _ => unreachable!(),
        }
    }
    //
    // forward_sqrt
    fn forward_sqrt(&mut self, row : usize, u : ArgRef, p : usize) -> B {
        if p == 0 { return Base::sqrt(self.value_at(u, 0)); }
        let y0 = self.row_at(row, 0);
        let mut acc = self.value_at(u, p);
        for j in 1 .. p { acc -= self.row_at(row, j) * self.row_at(row, p - j); }
        acc / (B::from_f64(2.0) * y0)
    }
    //
    // forward_exp
    fn forward_exp(&mut self, row : usize, u : ArgRef, p : usize) -> B {
        if p == 0 { return Base::exp(self.value_at(u, 0)); }
        let mut acc = B::zero();
        for j in 1 ..= p {
            acc += B::from_f64(j as f64) * self.value_at(u, j) * self.row_at(row, p - j);
        }
        acc / B::from_f64(p as f64)
    }
    //
    // forward_ln
    fn forward_ln(&mut self, row : usize, u : ArgRef, p : usize) -> B {
        if p == 0 { return Base::ln(self.value_at(u, 0)); }
        let u0 = self.value_at(u, 0);
        let mut acc = B::from_f64(p as f64) * self.value_at(u, p);
        for j in 1 .. p {
            acc -= B::from_f64(j as f64) * self.row_at(row, j) * self.value_at(u, p - j);
        }
        acc / (B::from_f64(p as f64) * u0)
    }
    //
    // forward_sin_cos
    /// `is_sin == true` computes the `Sin` op's own row (companion holds
    /// cos); `is_sin == false` computes the `Cos` op's own row (companion
    /// holds sin). Each op maintains its own companion independently, even
    /// if another op in the tape takes the same argument.
    fn forward_sin_cos(&mut self, row : usize, u : ArgRef, p : usize, is_sin : bool) -> B {
        let sign = if is_sin { B::one() } else { -B::one() };
        if p == 0 {
            let u0 = self.value_at(u, 0);
            let own       = if is_sin { Base::sin(u0) } else { Base::cos(u0) };
            let companion = if is_sin { Base::cos(u0) } else { Base::sin(u0) };
            self.companion[row].push(companion);
            return own;
        }
        let mut acc = B::zero();
        for j in 1 ..= p {
            let comp = self.companion[row][p - j];
            acc += B::from_f64(j as f64) * self.value_at(u, j) * comp;
        }
        let own = sign * (acc / B::from_f64(p as f64));
        //
        let mut comp_acc = B::zero();
        for j in 1 ..= p {
            comp_acc += B::from_f64(j as f64) * self.value_at(u, j) * self.row_at(row, p - j);
        }
        let companion = -sign * (comp_acc / B::from_f64(p as f64));
        self.companion[row].push(companion);
        own
    }
    //
    // forward_sinh_cosh
    fn forward_sinh_cosh(&mut self, row : usize, u : ArgRef, p : usize, is_sinh : bool) -> B {
        if p == 0 {
            let u0 = self.value_at(u, 0);
            let own       = if is_sinh { Base::sinh(u0) } else { Base::cosh(u0) };
            let companion = if is_sinh { Base::cosh(u0) } else { Base::sinh(u0) };
            self.companion[row].push(companion);
            return own;
        }
        let mut acc = B::zero();
        for j in 1 ..= p {
            let comp = self.companion[row][p - j];
            acc += B::from_f64(j as f64) * self.value_at(u, j) * comp;
        }
        let own = acc / B::from_f64(p as f64);
        //
        let mut comp_acc = B::zero();
        for j in 1 ..= p {
            comp_acc += B::from_f64(j as f64) * self.value_at(u, j) * self.row_at(row, p - j);
        }
        let companion = comp_acc / B::from_f64(p as f64);
        self.companion[row].push(companion);
        own
    }
    //
    // forward_atan
    /// `companion[row]` holds `b = 1 + u^2`.
    fn forward_atan(&mut self, row : usize, u : ArgRef, p : usize) -> B {
        if p == 0 {
            let u0 = self.value_at(u, 0);
            self.companion[row].push(B::one() + u0 * u0);
            return Base::atan(u0);
        }
        let mut b_p = B::zero();
        for j in 0 ..= p { b_p += self.value_at(u, j) * self.value_at(u, p - j); }
        self.companion[row].push(b_p);
        let b0 = self.companion[row][0];
        let mut acc = B::from_f64(p as f64) * self.value_at(u, p);
        for j in 1 .. p {
            acc -= B::from_f64(j as f64) * self.row_at(row, j) * self.companion[row][p - j];
        }
        acc / (B::from_f64(p as f64) * b0)
    }
    //
    // forward_asin_acos
    /// `companion[row]` holds `b = sqrt(1 - u^2)`. `acos = pi/2 - asin`, so
    /// for `k >= 1` the two recurrences agree up to an overall sign; rather
    /// than compute the `asin`-shaped value and negate it afterwards (which
    /// would disagree with the sign already baked into this row's earlier,
    /// stored orders), the sign is folded into the leading term so the
    /// stored row stays self-consistent at every order.
    fn forward_asin_acos(&mut self, row : usize, u : ArgRef, p : usize, is_asin : bool) -> B {
        let sign = if is_asin { B::one() } else { -B::one() };
        if p == 0 {
            let u0 = self.value_at(u, 0);
            let c0 = B::one() - u0 * u0;
            self.companion[row].push(Base::sqrt(c0));
            return if is_asin { Base::asin(u0) } else { Base::acos(u0) };
        }
        let mut c_p = B::zero();
        for j in 0 ..= p { c_p += self.value_at(u, j) * self.value_at(u, p - j); }
        c_p = -c_p;
        let b0 = self.companion[row][0];
        let mut b_acc = c_p;
        for j in 1 .. p {
            b_acc -= self.companion[row][j] * self.companion[row][p - j];
        }
        let b_p = b_acc / (B::from_f64(2.0) * b0);
        self.companion[row].push(b_p);
        //
        let mut acc = sign * B::from_f64(p as f64) * self.value_at(u, p);
        for j in 1 .. p {
            acc -= B::from_f64(j as f64) * self.row_at(row, j) * self.companion[row][p - j];
        }
        acc / (B::from_f64(p as f64) * b0)
    }
    //
    // forward_pow
    /// `y = u^n` for a fixed integer `n`; derived from `u * y' = n * y * u'`
    /// the same way `forward_ln` is derived from `u' = u * y'`, so it needs
    /// no domain restriction on `u0` the way a `log`/`exp` decomposition
    /// would (that would break for a negative base).
    fn forward_pow(&mut self, row : usize, u : ArgRef, n : i32, p : usize) -> B {
        if p == 0 { return Base::powi(self.value_at(u, 0), n); }
        let u0 = self.value_at(u, 0);
        let nf = B::from_f64(n as f64);
        let mut s1 = B::zero();
        for i in 0 .. p {
            let coef = B::from_f64((p - i) as f64);
            s1 += coef * self.row_at(row, i) * self.value_at(u, p - i);
        }
        let mut s2 = B::zero();
        for i in 1 .. p {
            let coef = B::from_f64((p - i) as f64);
            s2 += coef * self.value_at(u, i) * self.row_at(row, p - i);
        }
        (nf * s1 - s2) / (B::from_f64(p as f64) * u0)
    }
}
