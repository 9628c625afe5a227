//! Cross-estimator consistency on simulated endogenous data.
//!
//! - manual two-step OLS reproduces direct 2SLS point estimates
//! - LIML and 2SLS agree closely on a strongly identified design and
//!   coincide when exactly identified
//! - over-identification p-values are proper probabilities

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use si_core::{CovarianceType, FittedModel, OverIdTest};
use si_inference::{Design, IvEstimator, iv_fit, ols_fit};

struct Sample {
    y: Vec<f64>,
    exog: Design,
    endog: Design,
    instruments: Design,
}

fn simulate(n: usize, seed: u64) -> Sample {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let std = Normal::new(0.0, 1.0).unwrap();
    let (mut y, mut w, mut x, mut z1, mut z2) = (vec![], vec![], vec![], vec![], vec![]);
    for _ in 0..n {
        let (a, b, c): (f64, f64, f64) = (std.sample(&mut rng), std.sample(&mut rng), std.sample(&mut rng));
        let u: f64 = std.sample(&mut rng);
        let v: f64 = std.sample(&mut rng);
        let xi = 0.5 + a + 0.7 * b + 0.3 * c + v + 0.5 * u;
        y.push(1.0 + 2.0 * xi - 0.5 * c + u);
        w.push(c);
        x.push(xi);
        z1.push(a);
        z2.push(b);
    }
    Sample {
        y,
        exog: Design::from_columns(n, vec![("w".into(), w)]).unwrap().with_intercept(),
        endog: Design::from_columns(n, vec![("x".into(), x)]).unwrap(),
        instruments: Design::from_columns(n, vec![("z1".into(), z1), ("z2".into(), z2)]).unwrap(),
    }
}

#[test]
fn two_step_matches_direct_2sls() {
    let s = simulate(200, 7);
    let n = s.y.len();

    let first = ols_fit(
        &s.endog.column(0),
        &s.exog.hstack(&s.instruments).unwrap(),
        "x",
        CovarianceType::HC3,
    )
    .unwrap();
    let proxy = Design::from_columns(n, vec![("x".into(), first.fitted.clone())]).unwrap();
    let second = ols_fit(&s.y, &s.exog.hstack(&proxy).unwrap(), "y", CovarianceType::HC3).unwrap();

    let direct = iv_fit(
        &s.y,
        &s.exog,
        &s.endog,
        &s.instruments,
        "y",
        IvEstimator::TwoSls,
        CovarianceType::HC0,
    )
    .unwrap();

    assert_eq!(second.names, direct.names);
    for (a, b) in second.coefficients.iter().zip(&direct.coefficients) {
        assert_relative_eq!(*a, *b, max_relative = 1e-6);
    }
    // Second-stage residuals absorb the first-stage error; structural ones do not.
    assert!(second.ssr() > direct.ssr());
}

#[test]
fn liml_close_to_2sls_with_strong_instruments() {
    let s = simulate(400, 11);
    let fit = |e| iv_fit(&s.y, &s.exog, &s.endog, &s.instruments, "y", e, CovarianceType::HC0).unwrap();
    let tsls = fit(IvEstimator::TwoSls);
    let liml = fit(IvEstimator::Liml);

    assert!(liml.kappa >= 1.0);
    let (b_tsls, _, _) = tsls.coefficient("x").unwrap();
    let (b_liml, se_liml, _) = liml.coefficient("x").unwrap();
    assert!((b_tsls - b_liml).abs() < se_liml, "2SLS={b_tsls}, LIML={b_liml}");
    assert!((b_liml - 2.0).abs() < 4.0 * se_liml, "LIML={b_liml}, se={se_liml}");
}

#[test]
fn liml_equals_2sls_when_exactly_identified() {
    let s = simulate(200, 13);
    let n = s.y.len();
    let z1 = Design::from_columns(n, vec![("z1".into(), s.instruments.column(0))]).unwrap();
    let fit = |e| iv_fit(&s.y, &s.exog, &s.endog, &z1, "y", e, CovarianceType::HC0).unwrap();
    let tsls = fit(IvEstimator::TwoSls);
    let liml = fit(IvEstimator::Liml);

    assert_relative_eq!(liml.kappa, 1.0, epsilon = 1e-8);
    for (a, b) in liml.coefficients.iter().zip(&tsls.coefficients) {
        assert_relative_eq!(*a, *b, max_relative = 1e-6);
    }
    assert_eq!(liml.overid(), Some(OverIdTest::NotApplicable));
}

#[test]
fn overid_p_value_is_a_probability() {
    for seed in [1, 2, 3] {
        let s = simulate(150, seed);
        let res = iv_fit(
            &s.y,
            &s.exog,
            &s.endog,
            &s.instruments,
            "y",
            IvEstimator::TwoSls,
            CovarianceType::HC0,
        )
        .unwrap();
        match res.overid() {
            Some(OverIdTest::Test { df, p_value, .. }) => {
                assert_eq!(df, 1);
                assert!((0.0..=1.0).contains(&p_value));
            }
            other => panic!("expected a test, got {other:?}"),
        }
    }
}

#[test]
fn ols_is_biased_under_endogeneity() {
    let s = simulate(400, 5);
    let x = s.exog.hstack(&s.endog).unwrap();
    let ols = ols_fit(&s.y, &x, "y", CovarianceType::HC1).unwrap();
    let iv = iv_fit(
        &s.y,
        &s.exog,
        &s.endog,
        &s.instruments,
        "y",
        IvEstimator::TwoSls,
        CovarianceType::HC0,
    )
    .unwrap();
    let (b_ols, _, _) = ols.coefficient("x").unwrap();
    let (b_iv, _, _) = iv.coefficient("x").unwrap();
    // Cov(x, u) > 0 pushes OLS upwards.
    assert!(b_ols > b_iv, "OLS={b_ols}, IV={b_iv}");
}
