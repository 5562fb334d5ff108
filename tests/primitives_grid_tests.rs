use chrono::NaiveDate;
use dynadj_rs::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn grid() -> Grid {
    Grid::new(vec![-10.0, 0.0, 10.0], vec![350.0, 355.0]).unwrap()
}

// ============================================================================
// Grid Tests
// ============================================================================

#[test]
fn test_grid_layout() {
    let grid = grid();
    assert_eq!(grid.n_lat(), 3);
    assert_eq!(grid.n_lon(), 2);
    assert_eq!(grid.n_points(), 6);
    assert_eq!(grid.lats(), &[-10.0, 0.0, 10.0]);
}

#[test]
fn test_latitudes_must_ascend() {
    let err = Grid::new(vec![10.0, 0.0], vec![0.0]).unwrap_err();
    assert_eq!(err, AdjustmentError::InvalidLatitude { index: 1, value: 0.0 });
    assert_eq!(err.kind(), ErrorKind::DataContract);

    let err = Grid::new(vec![0.0, 95.0], vec![0.0]).unwrap_err();
    assert_eq!(err, AdjustmentError::InvalidLatitude { index: 1, value: 95.0 });
}

#[test]
fn test_longitudes_must_be_flipped() {
    let err = Grid::new(vec![0.0], vec![-10.0, 0.0]).unwrap_err();
    assert_eq!(err, AdjustmentError::InvalidLongitude { index: 0, value: -10.0 });

    let err = Grid::new(vec![0.0], vec![10.0, 10.0]).unwrap_err();
    assert_eq!(err, AdjustmentError::InvalidLongitude { index: 1, value: 10.0 });
}

#[test]
fn test_empty_grid() {
    let err = Grid::new(vec![], vec![0.0]).unwrap_err();
    assert_eq!(err, AdjustmentError::EmptyInput("grid coordinates"));
}

// ============================================================================
// Field Series Tests
// ============================================================================

#[test]
fn test_field_access_is_row_major() {
    let dates = vec![date(2000, 1, 1), date(2000, 2, 1)];
    let values: Vec<f64> = (0..12).map(f64::from).collect();
    let series = FieldSeries::new(grid(), dates, values).unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series.field(1), &[6.0, 7.0, 8.0, 9.0, 10.0, 11.0]);
    // Point (j = 2, i = 1) of step 0 sits at 2 * n_lon + 1.
    assert_eq!(series.field(0)[2 * 2 + 1], 5.0);
    assert_eq!(series.date(1), date(2000, 2, 1));
}

#[test]
fn test_value_count_must_match() {
    let err = FieldSeries::new(grid(), vec![date(2000, 1, 1)], vec![0.0; 5]).unwrap_err();
    assert_eq!(
        err,
        AdjustmentError::ShapeMismatch {
            series: "field series",
            expected: 6,
            got: 5,
        }
    );
}

#[test]
fn test_dates_must_strictly_ascend() {
    let dates = vec![date(2000, 1, 1), date(2000, 1, 1)];
    let err = FieldSeries::new(grid(), dates, vec![0.0; 12]).unwrap_err();
    assert_eq!(
        err,
        AdjustmentError::UnorderedDates {
            index: 1,
            date: date(2000, 1, 1),
        }
    );
}

#[test]
fn test_non_finite_values_rejected() {
    let mut values = vec![0.0; 12];
    values[7] = f64::NAN;
    let dates = vec![date(2000, 1, 1), date(2000, 2, 1)];
    let err = FieldSeries::new(grid(), dates, values).unwrap_err();
    assert_eq!(
        err,
        AdjustmentError::NonFiniteValue {
            series: "field series",
            offset: 7,
        }
    );
}

#[test]
fn test_from_fields() {
    let fields = vec![
        GridField::new(date(2000, 1, 1), vec![1.0; 6]),
        GridField::new(date(2000, 1, 2), vec![2.0; 6]),
    ];
    let series = FieldSeries::from_fields(grid(), fields).unwrap();
    assert_eq!(series.values().len(), 12);
    assert_eq!(series.field(1), &[2.0; 6]);

    let bad = vec![GridField::new(date(2000, 1, 1), vec![1.0; 4])];
    assert!(matches!(
        FieldSeries::from_fields(grid(), bad),
        Err(AdjustmentError::ShapeMismatch { expected: 6, got: 4, .. })
    ));
}

// ============================================================================
// Paired Series Tests
// ============================================================================

#[test]
fn test_paired_series_may_use_different_grids() {
    let dates = vec![date(2000, 1, 1), date(2000, 2, 1)];
    let coarse = Grid::new(vec![0.0], vec![0.0]).unwrap();
    let circulation = FieldSeries::new(grid(), dates.clone(), vec![1.0; 12]).unwrap();
    let response = FieldSeries::new(coarse, dates, vec![2.0; 2]).unwrap();

    let paired = PairedSeries::new(circulation, response).unwrap();
    assert_eq!(paired.len(), 2);
    assert_eq!(paired.response().grid().n_points(), 1);
}

#[test]
fn test_paired_series_length_mismatch() {
    let circulation =
        FieldSeries::new(grid(), vec![date(2000, 1, 1), date(2000, 2, 1)], vec![1.0; 12]).unwrap();
    let response = FieldSeries::new(grid(), vec![date(2000, 1, 1)], vec![1.0; 6]).unwrap();
    let err = PairedSeries::new(circulation, response).unwrap_err();
    assert_eq!(
        err,
        AdjustmentError::LengthMismatch {
            circulation: 2,
            response: 1,
        }
    );
}

#[test]
fn test_paired_series_timestamp_mismatch() {
    let circulation =
        FieldSeries::new(grid(), vec![date(2000, 1, 1), date(2000, 2, 1)], vec![1.0; 12]).unwrap();
    let response =
        FieldSeries::new(grid(), vec![date(2000, 1, 1), date(2000, 3, 1)], vec![1.0; 12]).unwrap();
    let err = PairedSeries::new(circulation, response).unwrap_err();
    assert_eq!(
        err,
        AdjustmentError::TimestampMismatch {
            index: 1,
            circulation: date(2000, 2, 1),
            response: date(2000, 3, 1),
        }
    );
}
