// ─────────────────────────────────────────────────────────────────────
// DIPC Control — Eigenvalue Routines
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// License: MIT OR Apache-2.0
// ─────────────────────────────────────────────────────────────────────
//! Eigenvalues without a LAPACK backend: elimination Hessenberg
//! reduction followed by the Francis double-shift QR iteration for
//! general real matrices, and cyclic Jacobi sweeps for symmetric ones.
//! Sized for the ≤ ~40-state augmented systems of this workspace.

use ndarray::Array2;
use num_complex::Complex64;

use dipc_types::error::{ControlError, Result};

const MAX_QR_ITERATIONS: usize = 30;
const MAX_JACOBI_SWEEPS: usize = 100;

/// Eigenvalues of a general real square matrix.
pub fn eigenvalues(a: &Array2<f64>) -> Result<Vec<Complex64>> {
    if a.nrows() != a.ncols() {
        return Err(ControlError::DimensionMismatch(format!(
            "eigenvalue input must be square, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    let n = a.nrows();
    if n == 0 {
        return Ok(Vec::new());
    }
    let mut h = a.clone();
    hessenberg(&mut h);
    hqr(h)
}

/// Spectral radius `max |λ|`.
pub fn spectral_radius(a: &Array2<f64>) -> Result<f64> {
    Ok(eigenvalues(a)?
        .iter()
        .map(|l| l.norm())
        .fold(0.0, f64::max))
}

/// Reduce to upper Hessenberg form by stabilized elementary similarity
/// transforms, then clear the annihilated entries.
fn hessenberg(a: &mut Array2<f64>) {
    let n = a.nrows();
    for m in 1..n.saturating_sub(1) {
        // Pivot on the largest entry of the column below the diagonal.
        let mut pivot = m;
        for row in m..n {
            if a[[row, m - 1]].abs() > a[[pivot, m - 1]].abs() {
                pivot = row;
            }
        }
        let x = a[[pivot, m - 1]];
        if pivot != m {
            for j in m - 1..n {
                a.swap([pivot, j], [m, j]);
            }
            for i in 0..n {
                a.swap([i, pivot], [i, m]);
            }
        }
        if x == 0.0 {
            continue;
        }
        for i in m + 1..n {
            let y = a[[i, m - 1]] / x;
            if y == 0.0 {
                continue;
            }
            for j in m - 1..n {
                a[[i, j]] -= y * a[[m, j]];
            }
            for r in 0..n {
                let add = y * a[[r, i]];
                a[[r, m]] += add;
            }
        }
    }
    // Entries below the subdiagonal are dead after the reduction.
    for i in 2..n {
        for j in 0..i - 1 {
            a[[i, j]] = 0.0;
        }
    }
}

/// Francis double-shift QR on an upper Hessenberg matrix.
fn hqr(mut a: Array2<f64>) -> Result<Vec<Complex64>> {
    let n = a.nrows();
    let mut eigs: Vec<Complex64> = Vec::with_capacity(n);

    let mut anorm = 0.0;
    for i in 0..n {
        for j in i.saturating_sub(1)..n {
            anorm += a[[i, j]].abs();
        }
    }

    let mut nn = n as isize - 1;
    let mut t = 0.0;
    while nn >= 0 {
        let nnu = nn as usize;
        let mut its = 0;
        loop {
            // Look for a negligible subdiagonal entry.
            let mut l = nnu;
            while l >= 1 {
                let mut s = a[[l - 1, l - 1]].abs() + a[[l, l]].abs();
                if s == 0.0 {
                    s = anorm;
                }
                if a[[l, l - 1]].abs() <= f64::EPSILON * s {
                    a[[l, l - 1]] = 0.0;
                    break;
                }
                l -= 1;
            }

            let mut x = a[[nnu, nnu]];
            if l == nnu {
                // One real root.
                eigs.push(Complex64::new(x + t, 0.0));
                nn -= 1;
                break;
            }

            let mut y = a[[nnu - 1, nnu - 1]];
            let mut w = a[[nnu, nnu - 1]] * a[[nnu - 1, nnu]];
            if l == nnu - 1 {
                // A 2x2 block has converged.
                let p = 0.5 * (y - x);
                let q = p * p + w;
                let z = q.abs().sqrt();
                let x = x + t;
                if q >= 0.0 {
                    let z = p + z.copysign(p);
                    let first = x + z;
                    let second = if z != 0.0 { x - w / z } else { x };
                    eigs.push(Complex64::new(first, 0.0));
                    eigs.push(Complex64::new(second, 0.0));
                } else {
                    eigs.push(Complex64::new(x + p, z));
                    eigs.push(Complex64::new(x + p, -z));
                }
                nn -= 2;
                break;
            }

            if its == MAX_QR_ITERATIONS {
                return Err(ControlError::EigenFailure {
                    iterations: MAX_QR_ITERATIONS,
                });
            }
            if its == 10 || its == 20 {
                // Exceptional shift to break limit cycles.
                t += x;
                for i in 0..=nnu {
                    a[[i, i]] -= x;
                }
                let s = a[[nnu, nnu - 1]].abs() + a[[nnu - 1, nnu - 2]].abs();
                x = 0.75 * s;
                y = x;
                w = -0.4375 * s * s;
            }
            its += 1;

            // Look back for two consecutive small subdiagonals to start
            // the implicit double shift.
            let (m, p0, q0, r0) = {
                let mut m = nnu - 2;
                loop {
                    let z = a[[m, m]];
                    let r = x - z;
                    let s = y - z;
                    let mut p = (r * s - w) / a[[m + 1, m]] + a[[m, m + 1]];
                    let mut q = a[[m + 1, m + 1]] - z - r - s;
                    let mut rr = a[[m + 2, m + 1]];
                    let scale = p.abs() + q.abs() + rr.abs();
                    p /= scale;
                    q /= scale;
                    rr /= scale;
                    if m == l {
                        break (m, p, q, rr);
                    }
                    let u = a[[m, m - 1]].abs() * (q.abs() + rr.abs());
                    let v =
                        p.abs() * (a[[m - 1, m - 1]].abs() + z.abs() + a[[m + 1, m + 1]].abs());
                    if u <= f64::EPSILON * v {
                        break (m, p, q, rr);
                    }
                    m -= 1;
                }
            };
            for i in m + 2..=nnu {
                a[[i, i - 2]] = 0.0;
                if i != m + 2 {
                    a[[i, i - 3]] = 0.0;
                }
            }

            // Double QR sweep over rows m..nn.
            for k in m..nnu {
                let (mut p, mut q, mut r);
                if k != m {
                    p = a[[k, k - 1]];
                    q = a[[k + 1, k - 1]];
                    r = if k != nnu - 1 { a[[k + 2, k - 1]] } else { 0.0 };
                    x = p.abs() + q.abs() + r.abs();
                    if x != 0.0 {
                        p /= x;
                        q /= x;
                        r /= x;
                    }
                } else {
                    p = p0;
                    q = q0;
                    r = r0;
                }
                let s = (p * p + q * q + r * r).sqrt().copysign(p);
                if s == 0.0 {
                    continue;
                }
                if k == m {
                    if l != m {
                        a[[k, k - 1]] = -a[[k, k - 1]];
                    }
                } else {
                    a[[k, k - 1]] = -s * x;
                }
                p += s;
                x = p / s;
                y = q / s;
                let z = r / s;
                q /= p;
                r /= p;
                for j in k..=nnu {
                    let mut pp = a[[k, j]] + q * a[[k + 1, j]];
                    if k != nnu - 1 {
                        pp += r * a[[k + 2, j]];
                        a[[k + 2, j]] -= pp * z;
                    }
                    a[[k + 1, j]] -= pp * y;
                    a[[k, j]] -= pp * x;
                }
                let mmin = nnu.min(k + 3);
                for i in l..=mmin {
                    let mut pp = x * a[[i, k]] + y * a[[i, k + 1]];
                    if k != nnu - 1 {
                        pp += z * a[[i, k + 2]];
                        a[[i, k + 2]] -= pp * r;
                    }
                    a[[i, k + 1]] -= pp * q;
                    a[[i, k]] -= pp;
                }
            }
        }
    }
    Ok(eigs)
}

/// Eigenvalues of a symmetric matrix, ascending. The input is
/// symmetrized first; definiteness checks feed off this.
pub fn symmetric_eigenvalues(a: &Array2<f64>) -> Result<Vec<f64>> {
    if a.nrows() != a.ncols() {
        return Err(ControlError::DimensionMismatch(format!(
            "symmetric eigenvalue input must be square, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    let n = a.nrows();
    if n == 0 {
        return Ok(Vec::new());
    }
    let mut m = (a + &a.t()) * 0.5;
    let scale = m.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())).max(1.0);

    for _ in 0..MAX_JACOBI_SWEEPS {
        let mut off = 0.0;
        for p in 0..n {
            for q in p + 1..n {
                off += m[[p, q]] * m[[p, q]];
            }
        }
        if off.sqrt() <= 1e-14 * scale {
            let mut diag: Vec<f64> = (0..n).map(|i| m[[i, i]]).collect();
            diag.sort_by(f64::total_cmp);
            return Ok(diag);
        }
        for p in 0..n - 1 {
            for q in p + 1..n {
                let apq = m[[p, q]];
                if apq.abs() <= 1e-300 {
                    continue;
                }
                let theta = (m[[q, q]] - m[[p, p]]) / (2.0 * apq);
                let t = if theta == 0.0 {
                    1.0
                } else {
                    theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt())
                };
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;
                for k in 0..n {
                    let akp = m[[k, p]];
                    let akq = m[[k, q]];
                    m[[k, p]] = c * akp - s * akq;
                    m[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = m[[p, k]];
                    let aqk = m[[q, k]];
                    m[[p, k]] = c * apk - s * aqk;
                    m[[q, k]] = s * apk + c * aqk;
                }
            }
        }
    }
    Err(ControlError::EigenFailure {
        iterations: MAX_JACOBI_SWEEPS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sorted_real(mut eigs: Vec<Complex64>) -> Vec<f64> {
        eigs.sort_by(|a, b| a.re.total_cmp(&b.re));
        eigs.iter().map(|e| e.re).collect()
    }

    #[test]
    fn test_diagonal() {
        let a = array![[3.0, 0.0], [0.0, -1.0]];
        let eigs = sorted_real(eigenvalues(&a).unwrap());
        assert!((eigs[0] + 1.0).abs() < 1e-10);
        assert!((eigs[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_companion_real_roots() {
        // Companion of (λ+1)(λ+2) = λ² + 3λ + 2.
        let a = array![[0.0, 1.0], [-2.0, -3.0]];
        let eigs = sorted_real(eigenvalues(&a).unwrap());
        assert!((eigs[0] + 2.0).abs() < 1e-10);
        assert!((eigs[1] + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_rotation_complex_pair() {
        let a = array![[0.0, 1.0], [-1.0, 0.0]];
        let mut eigs = eigenvalues(&a).unwrap();
        eigs.sort_by(|a, b| a.im.total_cmp(&b.im));
        assert!(eigs[0].re.abs() < 1e-10 && (eigs[0].im + 1.0).abs() < 1e-10);
        assert!(eigs[1].re.abs() < 1e-10 && (eigs[1].im - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_companion_4x4() {
        // Companion of (λ+1)(λ+2)(λ+3)(λ+4)
        //   = λ⁴ + 10λ³ + 35λ² + 50λ + 24.
        let a = array![
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [-24.0, -50.0, -35.0, -10.0],
        ];
        let eigs = sorted_real(eigenvalues(&a).unwrap());
        for (got, want) in eigs.iter().zip([-4.0, -3.0, -2.0, -1.0]) {
            assert!((got - want).abs() < 1e-8, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_mixed_spectrum() {
        // Block diagonal: rotation (±2i scaled) plus real −5.
        let a = array![
            [0.0, 2.0, 0.0],
            [-2.0, 0.0, 0.0],
            [0.0, 0.0, -5.0],
        ];
        let eigs = eigenvalues(&a).unwrap();
        let n_complex = eigs.iter().filter(|e| e.im.abs() > 1e-9).count();
        assert_eq!(n_complex, 2);
        assert!(eigs.iter().any(|e| (e.re + 5.0).abs() < 1e-9));
        assert!(eigs
            .iter()
            .filter(|e| e.im.abs() > 1e-9)
            .all(|e| (e.im.abs() - 2.0).abs() < 1e-9));
    }

    #[test]
    fn test_spectral_radius() {
        let a = array![[0.5, 0.0], [0.0, -0.9]];
        assert!((spectral_radius(&a).unwrap() - 0.9).abs() < 1e-10);
    }

    #[test]
    fn test_symmetric_known_spectrum() {
        // Eigenvalues of [[2,1],[1,2]] are 1 and 3.
        let a = array![[2.0, 1.0], [1.0, 2.0]];
        let eigs = symmetric_eigenvalues(&a).unwrap();
        assert!((eigs[0] - 1.0).abs() < 1e-10);
        assert!((eigs[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_symmetric_indefinite_detected() {
        let a = array![
            [1.0, 0.0, 0.0],
            [0.0, -0.5, 0.0],
            [0.0, 0.0, 4.0],
        ];
        let eigs = symmetric_eigenvalues(&a).unwrap();
        assert!((eigs[0] + 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_symmetric_agrees_with_general() {
        let a = array![
            [4.0, 1.0, 0.5],
            [1.0, 3.0, -0.2],
            [0.5, -0.2, 1.0],
        ];
        let sym = symmetric_eigenvalues(&a).unwrap();
        let gen = sorted_real(eigenvalues(&a).unwrap());
        for (s, g) in sym.iter().zip(gen.iter()) {
            assert!((s - g).abs() < 1e-7, "jacobi {s} vs qr {g}");
        }
    }
}
