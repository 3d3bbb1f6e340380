// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025-26 Bradley M. Bell
//
// Records determinant-by-LU-factorization (no pivoting; the fixture matrix
// is strictly diagonally dominant so every pivot stays nonzero) and checks
// the reverse-mode gradient against the cofactor matrix.

use rustad::{independent, ADFun};

fn lu_determinant<T>(mut a : [[T; 4]; 4]) -> T
where
    T : Copy + std::ops::Sub<Output = T> + std::ops::Mul<Output = T> + std::ops::Div<Output = T>,
{
    for k in 0 .. 4 {
        for i in (k + 1) .. 4 {
            let factor = a[i][k] / a[k][k];
            for j in k .. 4 {
                a[i][j] = a[i][j] - factor * a[k][j];
            }
        }
    }
    let mut det = a[0][0];
    for i in 1 .. 4 { det = det * a[i][i]; }
    det
}

fn det3(m : [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

fn cofactor(a : &[[f64; 4]; 4], row : usize, col : usize) -> f64 {
    let mut minor = [[0.0; 3]; 3];
    let mut mi = 0;
    for i in 0 .. 4 {
        if i == row { continue; }
        let mut mj = 0;
        for j in 0 .. 4 {
            if j == col { continue; }
            minor[mi][mj] = a[i][j];
            mj += 1;
        }
        mi += 1;
    }
    let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
    sign * det3(minor)
}

#[test]
fn determinant_lu_gradient_matches_cofactors() {
    let a : [[f64; 4]; 4] = [
        [10.0, 1.0, 2.0, 1.0],
        [1.0, 10.0, 1.0, 2.0],
        [2.0, 1.0, 10.0, 1.0],
        [1.0, 2.0, 1.0, 10.0],
    ];
    let x : Vec<f64> = a.iter().flatten().copied().collect();
    let ax = independent(x.clone()).unwrap();
    let mut am = [[ax[0]; 4]; 4];
    for i in 0 .. 4 { for j in 0 .. 4 { am[i][j] = ax[i * 4 + j]; } }
    let d = lu_determinant(am);
    let mut f = ADFun::new(ax, vec![d]).unwrap();
    //
    f.forward(0, &x, false).unwrap();
    let grad = f.reverse(1, &[1.0], false).unwrap();
    for i in 0 .. 4 {
        for j in 0 .. 4 {
            let expect = cofactor(&a, i, j);
            let got    = grad[i * 4 + j];
            assert!(
                (got - expect).abs() < 1e-9 * expect.abs().max(1.0),
                "grad[{i}][{j}]: {got} vs {expect}"
            );
        }
    }
}
