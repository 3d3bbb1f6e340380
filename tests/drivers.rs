// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell

use rustad::{independent, ADFun};

// f(x0, x1) = [x0*x0*x1, x0 + x1*x1*x1]
fn build() -> ADFun<f64> {
    let ax = independent(vec![2.0, 3.0]).unwrap();
    let x0 = ax[0];
    let x1 = ax[1];
    let ay = vec![ x0 * x0 * x1, x0 + x1 * x1 * x1 ];
    ADFun::new(ax, ay).unwrap()
}

#[test]
fn jacobian_matches_hand_derivative() {
    let mut f = build();
    let x = [2.0, 3.0];
    let jac = f.jacobian(&x).unwrap();
    // df0/dx0 = 2 x0 x1, df0/dx1 = x0^2, df1/dx0 = 1, df1/dx1 = 3 x1^2
    let expect = [2.0 * 2.0 * 3.0, 2.0 * 2.0, 1.0, 3.0 * 3.0 * 3.0];
    for k in 0 .. 4 {
        assert!((jac[k] - expect[k]).abs() < 1e-10, "k={k}: {} vs {}", jac[k], expect[k]);
    }
}

#[test]
fn for_one_and_rev_one_agree_with_jacobian() {
    let mut f = build();
    let x = [2.0, 3.0];
    let jac = f.jacobian(&x).unwrap();
    //
    let col0 = f.for_one(&x, 0).unwrap();
    assert!((col0[0] - jac[0]).abs() < 1e-10);
    assert!((col0[1] - jac[2]).abs() < 1e-10);
    //
    let row1 = f.rev_one(&x, 1).unwrap();
    assert!((row1[0] - jac[2]).abs() < 1e-10);
    assert!((row1[1] - jac[3]).abs() < 1e-10);
}

#[test]
fn hessian_of_first_output() {
    let mut f = build();
    let x = [2.0, 3.0];
    // f0 = x0^2 x1; d2f0/dx0^2 = 2 x1, d2f0/dx0dx1 = 2 x0, d2f0/dx1^2 = 0
    let hes = f.hessian(&x, 0).unwrap();
    assert!((hes[0] - 2.0 * 3.0).abs() < 1e-9);
    assert!((hes[1] - 2.0 * 2.0).abs() < 1e-9);
    assert!((hes[2] - 2.0 * 2.0).abs() < 1e-9);
    assert!(hes[3].abs() < 1e-9);
}

#[test]
fn for_two_matches_hessian() {
    let mut f = build();
    let x = [2.0, 3.0];
    let hes = f.hessian(&x, 0).unwrap();
    let mut diag = Vec::new();
    let d00 = f.for_two(&x, 0, 0, &mut diag).unwrap();
    assert!((d00[0] - hes[0]).abs() < 1e-9);
    let d01 = f.for_two(&x, 0, 1, &mut diag).unwrap();
    assert!((d01[0] - hes[1]).abs() < 1e-9);
    let d11 = f.for_two(&x, 1, 1, &mut diag).unwrap();
    assert!((d11[0] - hes[3]).abs() < 1e-9);
}

#[test]
fn rev_two_matches_hessian() {
    let mut f = build();
    let x = [2.0, 3.0];
    let hes = f.hessian(&x, 0).unwrap();
    let d = f.rev_two(&x, 0, 0).unwrap();
    // d is reverse(2, ..)'s raw output: d[idx*2 + k], order k=1 is the
    // second-order adjoint coefficient for domain index idx.
    assert!((d[1] - hes[0]).abs() < 1e-9);
    assert!((d[3] - hes[2]).abs() < 1e-9);
}
