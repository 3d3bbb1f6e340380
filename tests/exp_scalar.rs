// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell

use rustad::{independent, ADFun};

fn factorial(n : u32) -> f64 {
    (1 ..= n).map(|k| k as f64).product::<f64>().max(1.0)
}

#[test]
fn exp_forward_taylor_coefficients() {
    let e = 1.0_f64.exp();
    let ax = independent::<f64>(vec![1.0]).unwrap();
    let ay = vec![ ax[0].exp() ];
    let mut f = ADFun::new(ax, ay).unwrap();
    //
    let y0 = f.forward(0, &[1.0], false).unwrap();
    assert_eq!(y0, vec![e]);
    //
    // u(t) = 1 + t, so y(t) = e^(1+t) = e * e^t and y_k = e / k! .
    for k in 1 ..= 4 {
        let uk = if k == 1 { 1.0 } else { 0.0 };
        let yk = f.forward(k, &[uk], false).unwrap();
        let expect = e / factorial(k as u32);
        assert!((yk[0] - expect).abs() < 1e-12 * e, "order {k}: {} vs {expect}", yk[0]);
    }
}

#[test]
fn exp_reverse_matches_finite_differences() {
    let ax = independent::<f64>(vec![1.0]).unwrap();
    let ay = vec![ ax[0].exp() ];
    let mut f = ADFun::new(ax, ay).unwrap();
    //
    let base = [1.0, 1.0, 0.0, 0.0, 0.0];
    let order4 = |f : &mut ADFun<f64>, u : &[f64; 5]| -> f64 {
        let mut y4 = 0.0;
        for k in 0 .. 5 {
            let yk = f.forward(k, &[u[k]], false).unwrap();
            if k == 4 { y4 = yk[0]; }
        }
        y4
    };
    let _ = order4(&mut f, &base);
    let dw = f.reverse(5, &[1.0], false).unwrap();
    assert_eq!(dw.len(), 5);
    //
    // dw[k] is the partial with respect to order (p - 1 - k), highest order
    // first; see the readout in `reverse`.
    let eps = 1e-5;
    for k in 0 .. 5 {
        let order = 4 - k;
        let mut up = base;
        up[order] += eps;
        let gp = order4(&mut f, &up);
        let mut um = base;
        um[order] -= eps;
        let gm = order4(&mut f, &um);
        let slope = (gp - gm) / (2.0 * eps);
        assert!(
            (dw[k] - slope).abs() < 1e-5 * slope.abs().max(1.0),
            "dw[{k}] (order {order}): reverse {} vs finite-difference {slope}", dw[k]
        );
    }
}
