#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use chrono::NaiveDate;
use dynadj_rs::internals::algorithms::reconstruction::PseudoInverseReconstructor;
use dynadj_rs::internals::algorithms::sampling::{draw_subsample, step_rng, step_seed};
use dynadj_rs::internals::algorithms::selection::{
    AnalogSelector, DistanceRecord, ExclusionPolicy, SearchTarget,
};
use dynadj_rs::internals::math::linalg::SingularValuePolicy;
use dynadj_rs::internals::primitives::errors::AdjustmentError;
use dynadj_rs::internals::primitives::grid::{FieldSeries, Grid, PairedSeries};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Five yearly steps on a 2×2 grid.
fn training() -> PairedSeries<f64> {
    let grid = Grid::new(vec![10.0, 20.0], vec![0.0, 10.0]).unwrap();
    let dates: Vec<NaiveDate> = (0..5).map(|y| date(2000 + y, 1, 1)).collect();
    let circulation = vec![
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        1.0, 1.0, 1.0, 1.0, //
        10.0, 10.0, 10.0, 10.0,
    ];
    let response = vec![
        1.0, 2.0, 3.0, 4.0, //
        0.0, 1.0, 0.0, 1.0, //
        2.0, 0.0, 2.0, 0.0, //
        1.0, 1.0, 0.0, 0.0, //
        5.0, 5.0, 5.0, 5.0,
    ];
    PairedSeries::new(
        FieldSeries::new(grid.clone(), dates.clone(), circulation).unwrap(),
        FieldSeries::new(grid, dates, response).unwrap(),
    )
    .unwrap()
}

const TARGET: [f64; 4] = [1.0, 2.0, 0.5, 0.0];

// ============================================================================
// Reconstruction Tests
// ============================================================================

#[test]
fn test_exact_fit_with_full_rank_analogues() {
    let training = training();
    let recon = PseudoInverseReconstructor::new(&training, 4, SingularValuePolicy::default());

    let result = recon
        .reconstruct_from(date(2010, 1, 1), &TARGET, vec![0, 1, 2, 3])
        .unwrap();

    for (r, t) in result.circulation.iter().zip(TARGET.iter()) {
        assert_relative_eq!(r, t, epsilon = 1e-12);
    }
    let expected_coefficients = [1.0, 2.0, 0.5, 0.0];
    for (c, e) in result.coefficients.iter().zip(expected_coefficients.iter()) {
        assert_relative_eq!(c, e, epsilon = 1e-12);
    }
    // 1·R0 + 2·R1 + 0.5·R2
    let expected_response = [2.0, 4.0, 4.0, 6.0];
    for (r, e) in result.response.iter().zip(expected_response.iter()) {
        assert_relative_eq!(r, e, epsilon = 1e-12);
    }
    assert_eq!(result.truncated, 0);
}

#[test]
fn test_target_equal_to_one_analogue() {
    let training = training();
    let recon = PseudoInverseReconstructor::new(&training, 4, SingularValuePolicy::default());
    let target = training.circulation().field(2).to_vec();

    let result = recon
        .reconstruct_from(date(2010, 1, 1), &target, vec![0, 1, 2, 3])
        .unwrap();

    let expected_coefficients = [0.0, 0.0, 1.0, 0.0];
    for (c, e) in result.coefficients.iter().zip(expected_coefficients.iter()) {
        assert_relative_eq!(c, e, epsilon = 1e-12);
    }
    for (r, e) in result.response.iter().zip(training.response().field(2)) {
        assert_relative_eq!(r, e, epsilon = 1e-12);
    }
}

#[test]
fn test_two_analogue_least_squares() {
    let training = training();
    let recon = PseudoInverseReconstructor::new(&training, 2, SingularValuePolicy::default());

    // Gram [[1, 1], [1, 4]], rhs [2, 3.5] => x = [1.5, 0.5]
    let result = recon
        .reconstruct_from(date(2010, 1, 1), &TARGET, vec![1, 3])
        .unwrap();
    assert_eq!(result.analogs, vec![1, 3]);
    assert_relative_eq!(result.coefficients[0], 1.5, epsilon = 1e-12);
    assert_relative_eq!(result.coefficients[1], 0.5, epsilon = 1e-12);

    let expected_circulation = [0.5, 2.0, 0.5, 0.5];
    let expected_response = [0.5, 2.0, 0.0, 1.5];
    for k in 0..4 {
        assert_relative_eq!(result.circulation[k], expected_circulation[k], epsilon = 1e-12);
        assert_relative_eq!(result.response[k], expected_response[k], epsilon = 1e-12);
    }
}

#[test]
fn test_unconditional_policy_rejects_singular_design() {
    let training = training();
    let recon = PseudoInverseReconstructor::new(&training, 2, SingularValuePolicy::Unconditional);

    // The same analogue twice: one singular value is (numerically) zero.
    let result = recon.reconstruct_from(date(2010, 1, 1), &TARGET, vec![3, 3]);
    match result {
        Err(err) => assert_eq!(
            err,
            AdjustmentError::NonFiniteCoefficients {
                date: date(2010, 1, 1)
            }
        ),
        // Round-off may leave a tiny but non-zero singular value; the
        // coefficients are then finite but huge.
        Ok(it) => assert!(it.coefficients.iter().any(|c| c.abs() > 1e6)),
    }

    let regularised = PseudoInverseReconstructor::new(&training, 2, SingularValuePolicy::default())
        .reconstruct_from(date(2010, 1, 1), &TARGET, vec![3, 3])
        .unwrap();
    assert_eq!(regularised.truncated, 1);
    // Minimum-norm split of the weight 3.5 / 4 over both copies.
    assert_relative_eq!(regularised.coefficients[0], 0.4375, epsilon = 1e-12);
    assert_relative_eq!(regularised.coefficients[1], 0.4375, epsilon = 1e-12);
}

#[test]
fn test_random_subsample_comes_from_pool() {
    let training = training();
    let target = SearchTarget::external(date(2010, 1, 1));
    let selector = AnalogSelector::new(4, ExclusionPolicy::SameYear);
    let mut records: Vec<DistanceRecord<f64>> = (0..5)
        .map(|index| DistanceRecord {
            index,
            distance: index as f64,
        })
        .collect();
    let pool = selector
        .select(&target, training.dates(), &mut records)
        .unwrap();

    let recon = PseudoInverseReconstructor::new(&training, 3, SingularValuePolicy::default());
    let mut rng = step_rng(7, 0, 0);
    for _ in 0..20 {
        let it = recon
            .reconstruct(target.date, &TARGET, &pool, &mut rng)
            .unwrap();
        assert_eq!(it.analogs.len(), 3);
        assert!(it.analogs.iter().all(|j| pool.indices().contains(j)));
        let mut unique = it.analogs.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 3);
    }
}

// ============================================================================
// Sampling Tests
// ============================================================================

#[test]
fn test_subsample_draws_are_reproducible() {
    let a = draw_subsample(&mut step_rng(42, 1, 17), 150, 100);
    let b = draw_subsample(&mut step_rng(42, 1, 17), 150, 100);
    assert_eq!(a, b);
    assert!(a.iter().all(|&p| p < 150));
}

#[test]
fn test_step_seeds_differ() {
    assert_ne!(step_seed(42, 0, 0), step_seed(42, 0, 1));
    assert_ne!(step_seed(42, 0, 0), step_seed(42, 1, 0));
    assert_ne!(step_seed(42, 0, 0), step_seed(43, 0, 0));
}

#[test]
fn test_full_subsample_is_permutation() {
    let mut drawn = draw_subsample(&mut step_rng(1, 0, 0), 10, 10);
    drawn.sort_unstable();
    assert_eq!(drawn, (0..10).collect::<Vec<_>>());
}
