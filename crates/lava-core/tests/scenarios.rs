use lava_core::prelude::*;
use lava_core::{CoreError, GeneralSolution};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn square(rows: &[&[f64]]) -> SquareMatrix {
    SquareMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
}

fn matrix(rows: &[&[f64]]) -> Matrix {
    Matrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
}

fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < tol, "{actual:?} vs {expected:?}");
    }
}

#[test]
fn column_vectors_and_dot_product() {
    init_logging();
    let a = matrix(&[
        &[5.0, 4.0, 6.0, 7.0],
        &[1.0, 0.0, 3.0, 8.0],
        &[0.0, 0.0, 7.0, 9.0],
        &[3.0, 0.0, 0.0, 2.0],
    ]);
    let first = a.column(1).unwrap();
    assert_eq!(first.get(1).unwrap(), 1.0);
    assert_eq!(first.dot(&a.column(4).unwrap()).unwrap(), 49.0);
}

#[test]
fn triangular_eigenvalues_are_exact() {
    init_logging();
    let a = square(&[&[1.0, 2.0, 3.0], &[0.0, 4.0, 5.0], &[0.0, 0.0, 6.0]]);
    assert_eq!(a.eigenvalues().unwrap(), &[1.0, 4.0, 6.0]);
}

#[test]
fn null_space_of_singular_matrix() {
    init_logging();
    let a = matrix(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
    let ns = a.null_space();
    assert_eq!(ns.size(), 1);
    let v = ns.get(0).unwrap();
    assert!(v.approx_eq(&Vector::new(vec![1.0, -2.0, 1.0])));
    assert!(ops::mul_vector(&a, v).unwrap().is_zero());
    assert_eq!(a.rank() + a.nullity(), a.width());
}

#[test]
fn solve_underdetermined_system() {
    init_logging();
    let a = matrix(&[
        &[1.0, 0.0, 1.0, 0.0],
        &[0.0, 2.0, 2.0, 2.0],
        &[4.0, -2.0, 2.0, -2.0],
    ]);
    let b = Vector::new(vec![2.0, -10.0, 18.0]);
    let x = a.solve(&b).unwrap().unwrap();
    assert_close(x.as_slice(), &[2.0, -5.0, 0.0, 0.0], 1e-9);

    let general: GeneralSolution = a.general_solution(&b).unwrap().unwrap();
    assert_eq!(general.free_columns(), &[2, 3]);
    let other = general.evaluate(&[1.0, -2.0]).unwrap();
    assert!(ops::mul_vector(&a, &other).unwrap().approx_eq(&b));
}

#[test]
fn inconsistent_system_has_no_solution() {
    init_logging();
    let a = matrix(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
    let b = Vector::new(vec![12.0, 16.0, 9.0]);
    assert!(a.solve(&b).unwrap().is_none());
}

#[test]
fn qr_of_reference_matrix() {
    init_logging();
    let a = square(&[
        &[12.0, -51.0, 4.0],
        &[6.0, 167.0, -68.0],
        &[-4.0, 24.0, -41.0],
    ]);
    let qr = a.qr().unwrap();
    assert_close(
        qr.r().as_slice(),
        &[14.0, 21.0, -14.0, 0.0, 175.0, -70.0, 0.0, 0.0, 35.0],
        1e-9,
    );
    let qtq = ops::matmul(qr.q().transpose(), qr.q()).unwrap();
    assert!(qtq.approx_eq(&SquareMatrix::identity(3)));
}

#[test]
fn eigenvalues_of_general_matrix() {
    init_logging();
    let a = square(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[8.0, 8.0, 9.0]]);
    assert_close(a.eigenvalues().unwrap(), &[16.2787, -1.4095, 0.1308], 1e-3);
    for pair in a.eigenpairs().unwrap() {
        let av = ops::mul_vector(&a, pair.vector()).unwrap();
        assert!(av.approx_eq(&pair.vector().scaled(pair.value())));
    }
}

#[test]
fn similar_matrices() {
    init_logging();
    let a = square(&[
        &[-13.0, -8.0, -4.0],
        &[12.0, 7.0, 4.0],
        &[24.0, 16.0, 7.0],
    ]);
    let d = square(&[&[-1.0, 0.0, 0.0], &[0.0, 3.0, 0.0], &[0.0, 0.0, -1.0]]);
    assert!(a.similar(&d).unwrap());
    assert!(a.is_diagonalisable().unwrap());
}

#[test]
fn similarity_tolerance_follows_config() {
    init_logging();
    let d = square(&[&[1.0, 0.0], &[0.0, 2.0]]);
    let near = square(&[&[1.005, 0.0], &[0.0, 2.0]]);
    let far = square(&[&[1.02, 0.0], &[0.0, 2.0]]);
    assert!(d.similar(&near).unwrap());
    assert!(!d.similar(&far).unwrap());

    let strict = Config::from_json(r#"{ "similarity_factor": 10 }"#).unwrap();
    assert!(!d.with_config(strict).similar(&near).unwrap());
}

#[test]
fn diagonalisation_gives_fast_powers() {
    init_logging();
    let a = square(&[&[1.0, 2.0, 0.0], &[0.0, 3.0, 0.0], &[2.0, 4.0, -2.0]]);
    let diag = a.diagonalise().unwrap().unwrap();
    let pd = ops::matmul(diag.p(), diag.d()).unwrap();
    let pdp = ops::matmul(&pd, diag.p_inverse()).unwrap();
    assert!(pdp.approx_eq(&a));

    let direct = ops::pow(&a, 10).unwrap();
    let fast = diag.power(10).unwrap();
    for (x, y) in direct.as_slice().iter().zip(fast.as_slice()) {
        assert!((x - y).abs() < 1e-6 * x.abs().max(1.0));
    }
}

#[test]
fn non_convergent_matrix_reports_error() {
    init_logging();
    let cfg = Config::from_json(r#"{ "max_iterations": 50 }"#).unwrap();
    let rotation = square(&[&[0.0, -1.0], &[1.0, 0.0]]).with_config(cfg);
    assert!(matches!(
        rotation.eigenvalues(),
        Err(CoreError::NoConvergence { iterations: 50 })
    ));
}

#[test]
fn change_of_basis_between_vector_sets() {
    init_logging();
    let b: VectorSet = vec![Vector::new(vec![-9.0, 1.0]), Vector::new(vec![-5.0, -1.0])]
        .into_iter()
        .collect();
    let c: VectorSet = vec![Vector::new(vec![1.0, -4.0]), Vector::new(vec![3.0, -5.0])]
        .into_iter()
        .collect();
    let p = b.change_of_basis(&c).unwrap();
    assert_close(p.as_slice(), &[6.0, 4.0, -5.0, -3.0], 1e-9);

    // coordinates in `c` map back to the original vectors of `b`
    for (j, v) in b.iter().enumerate() {
        let coords = p.column(j + 1).unwrap();
        assert!(c.coordinates(&coords).unwrap().approx_eq(v));
    }
}

#[test]
fn mutation_invalidates_derived_state() {
    init_logging();
    let mut a = square(&[&[1.0, 2.0], &[2.0, 4.0]]);
    assert_eq!(a.rank(), 1);
    assert!(a.inverse().is_err());
    a.set(2, 2, 5.0).unwrap();
    assert_eq!(a.rank(), 2);
    assert!((a.determinant() - 1.0).abs() < 1e-12);
    assert!(a.inverse().is_ok());
}
