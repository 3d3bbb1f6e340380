// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell

use rustad::{independent, ADFun, BitRow, VecAD};

#[test]
fn vecad_variable_index_round_trip() {
    let ax = independent::<f64>(vec![9.0]).unwrap();
    let x0 = ax[0];
    //
    let mut v = VecAD::new((0 .. 10).map(|i| (10 - i) as f64).collect());
    let s = x0.sin();
    for k in 0 .. 10 {
        let cur = v.get_p(k);
        v.set_p(k, s * cur);
    }
    let z0 = v.get_v(&x0);
    //
    let mut f = ADFun::new(ax, vec![z0]).unwrap();
    //
    for i in 0 .. 10 {
        let x = i as f64;
        let y0 = f.forward(0, &[x], false).unwrap();
        let expect = x.sin() * (10 - i) as f64;
        assert!((y0[0] - expect).abs() < 1e-12, "i={i}: {} vs {expect}", y0[0]);
        //
        let y1 = f.forward(1, &[1.0], false).unwrap();
        let expect_d = x.cos() * (10 - i) as f64;
        assert!((y1[0] - expect_d).abs() < 1e-10, "i={i}: {} vs {expect_d}", y1[0]);
    }
}

// A load at a variable index must pick up sparsity from every value ever
// stored into that VecAD at a variable index, not just from the index
// expression itself.
#[test]
fn vecad_load_sparsity_includes_stored_value() {
    let ax = independent::<f64>(vec![5.0, 7.0]).unwrap();
    let x0 = ax[0];
    let x1 = ax[1];
    //
    let mut v = VecAD::new(vec![0.0, 0.0]);
    v.set_p(0, x1);
    let idx = rustad::AD::constant(0.0) * x0;
    let y = v.get_v(&idx);
    //
    let f = ADFun::new(ax, vec![y]).unwrap();
    let mut px = Vec::new();
    for j in 0 .. 2 {
        let mut row = BitRow::new(2);
        row.set(j);
        px.push(row);
    }
    let py = f.forward_jac_sparsity(&px, false).unwrap();
    let ones : Vec<usize> = py[0].iter_ones().collect();
    assert!(ones.contains(&1), "expected x1 in the sparsity of the loaded value, got {:?}", ones);
}
