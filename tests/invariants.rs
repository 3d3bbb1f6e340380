// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell

use rustad::{independent, ADFun, Error, VecAD};

#[test]
fn empty_range_is_rejected() {
    let ax = independent::<f64>(vec![1.0]).unwrap();
    let err = match ADFun::new(ax, Vec::new()) {
        Err(e) => e,
        Ok(_)  => panic!("expected an empty range to be rejected"),
    };
    assert!(matches!(err, Error::ArityMismatch{..}));
}

#[test]
fn independent_on_empty_vector_is_accepted() {
    let ax : Vec<rustad::AD<f64>> = independent(Vec::new()).unwrap();
    assert!(ax.is_empty());
    let f = ADFun::new(ax, vec![rustad::AD::constant(3.0)]).unwrap();
    assert_eq!(f.domain_len(), 0);
    assert_eq!(f.range_len(), 1);
}

#[test]
fn nan_propagates_without_trapping() {
    let ax = independent::<f64>(vec![1.0]).unwrap();
    let ay = vec![ ax[0] + ax[0] ];
    let mut f = ADFun::new(ax, ay).unwrap();
    let y = f.forward(0, &[f64::NAN], false).unwrap();
    assert!(y[0].is_nan());
}

#[test]
fn vecad_boundary_index_records_a_valid_op() {
    let ax = independent::<f64>(vec![9.0]).unwrap();
    let mut v = VecAD::new((0 .. 10).map(|i| i as f64).collect());
    // force registration so the boundary index has a store to resolve against
    v.set_p(0, rustad::AD::constant(0.0));
    let z = v.get_v(&ax[0]);
    let mut f = ADFun::new(ax, vec![z]).unwrap();
    let y = f.forward(0, &[9.0], false).unwrap();
    assert_eq!(y[0], 9.0);
}

#[test]
fn reverse_before_forward_order_fails() {
    let ax = independent::<f64>(vec![1.0]).unwrap();
    let ay = vec![ ax[0] * ax[0] ];
    let mut f = ADFun::new(ax, ay).unwrap();
    f.forward(0, &[2.0], false).unwrap();
    let err = f.reverse(2, &[1.0], false).unwrap_err();
    assert!(matches!(err, Error::OrderMissing{..}));
}
