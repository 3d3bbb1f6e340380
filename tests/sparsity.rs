// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell

use rustad::{independent, ADFun, BitRow};

#[test]
fn jacobian_and_hessian_sparsity() {
    let ax = independent::<f64>(vec![1.0, 2.0, 3.0]).unwrap();
    let ay = vec![ ax[0] * ax[1] + ax[2] ];
    let f = ADFun::new(ax, ay).unwrap();
    //
    let mut px = Vec::new();
    for j in 0 .. 3 {
        let mut row = BitRow::new(3);
        row.set(j);
        px.push(row);
    }
    let py = f.forward_jac_sparsity(&px, false).unwrap();
    assert_eq!(py.len(), 1);
    let ones : Vec<usize> = py[0].iter_ones().collect();
    assert_eq!(ones, vec![0, 1, 2]);
    //
    let hes = f.reverse_hes_sparsity(&px, &[true], false).unwrap();
    assert_eq!(hes.len(), 3);
    assert_eq!(hes[0].iter_ones().collect::<Vec<_>>(), vec![1]);
    assert_eq!(hes[1].iter_ones().collect::<Vec<_>>(), vec![0]);
    assert!(hes[2].is_empty() || hes[2].iter_ones().next().is_none());
}
