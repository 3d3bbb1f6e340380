// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell

use rustad::{independent, ADFun};

#[test]
fn chained_multiplication() {
    let ax = independent::<f64>(vec![0.5]).unwrap();
    let u  = ax[0];
    let ay = vec![ u * 1.0 * 2.0 * 3.0 * 4.0 * u ];
    let mut f = ADFun::new(ax, ay).unwrap();
    //
    let y0 = f.forward(0, &[0.5], false).unwrap();
    assert!((y0[0] - 6.0).abs() < 1e-12);
    //
    let y1 = f.forward(1, &[1.0], false).unwrap();
    assert!((y1[0] - 24.0).abs() < 1e-12);
    //
    let y2 = f.forward(2, &[0.0], false).unwrap();
    assert!((y2[0] - 24.0).abs() < 1e-12);
}
