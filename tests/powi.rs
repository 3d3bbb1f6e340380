// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell

use rustad::{independent, ADFun};

#[test]
fn powi_forward_taylor_coefficients() {
    // y = u^3, u(t) = 2 + t, so y(t) = (2+t)^3 and
    // y_0 = 8, y_1 = 12, y_2 = 6, y_3 = 1 .
    let ax = independent::<f64>(vec![2.0]).unwrap();
    let ay = vec![ ax[0].powi(3) ];
    let mut f = ADFun::new(ax, ay).unwrap();
    //
    let y0 = f.forward(0, &[2.0], false).unwrap();
    assert!((y0[0] - 8.0).abs() < 1e-12);
    let y1 = f.forward(1, &[1.0], false).unwrap();
    assert!((y1[0] - 12.0).abs() < 1e-12);
    let y2 = f.forward(2, &[0.0], false).unwrap();
    assert!((y2[0] - 6.0).abs() < 1e-10);
    let y3 = f.forward(3, &[0.0], false).unwrap();
    assert!((y3[0] - 1.0).abs() < 1e-9);
}

#[test]
fn powi_negative_base_is_not_nan() {
    // a log/exp decomposition of pow would produce NaN here; the dedicated
    // opcode must not.
    let ax = independent::<f64>(vec![-2.0]).unwrap();
    let ay = vec![ ax[0].powi(3) ];
    let mut f = ADFun::new(ax, ay).unwrap();
    let y0 = f.forward(0, &[-2.0], false).unwrap();
    assert!((y0[0] - (-8.0)).abs() < 1e-12);
    let y1 = f.forward(1, &[1.0], false).unwrap();
    assert!((y1[0] - 12.0).abs() < 1e-12, "dy/du = 3u^2 = 12 at u=-2, got {}", y1[0]);
}

#[test]
fn powi_second_order_reverse_matches_hessian() {
    // y = u^4, d2y/du2 = 12 u^2
    let ax = independent::<f64>(vec![1.5]).unwrap();
    let ay = vec![ ax[0].powi(4) ];
    let mut f = ADFun::new(ax, ay).unwrap();
    let hes = f.hessian(&[1.5], 0).unwrap();
    let expect = 12.0 * 1.5_f64.powi(2);
    assert!((hes[0] - expect).abs() < 1e-8, "{} vs {expect}", hes[0]);
}

#[test]
fn powi_negative_exponent_reverse_matches_hand_derivative() {
    // y = u^-2, dy/du = -2 u^-3
    let ax = independent::<f64>(vec![2.0]).unwrap();
    let ay = vec![ ax[0].powi(-2) ];
    let mut f = ADFun::new(ax, ay).unwrap();
    //
    let y0 = f.forward(0, &[2.0], false).unwrap();
    assert!((y0[0] - 0.25).abs() < 1e-12);
    let dw = f.reverse(1, &[1.0], false).unwrap();
    let expect = -2.0 * 2.0_f64.powi(-3);
    assert!((dw[0] - expect).abs() < 1e-10, "{} vs {expect}", dw[0]);
}
