// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell

use rustad::{independent, ADFun};

#[test]
fn atan_tan_round_trip() {
    let ax = independent::<f64>(vec![1.0_f64]).unwrap();
    let u  = ax[0];
    let z  = u.sin() / u.cos();
    let ay = vec![ z.atan() ];
    let mut f = ADFun::new(ax, ay).unwrap();
    //
    let y0 = f.forward(0, &[1.0], false).unwrap();
    assert!((y0[0] - 1.0).abs() < 1e-10);
    //
    let y1 = f.forward(1, &[1.0], false).unwrap();
    assert!((y1[0] - 1.0).abs() < 1e-10);
    //
    let y2 = f.forward(2, &[0.0], false).unwrap();
    assert!(y2[0].abs() < 1e-10);
    //
    let dw = f.reverse(2, &[1.0], false).unwrap();
    assert!((dw[0] - 1.0).abs() < 1e-10);
    assert!(dw[1].abs() < 1e-10);
}
