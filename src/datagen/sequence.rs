//! Arithmetic sequence generation

use crate::constants::MAX_NUM_BLOCKS;
use crate::error::{DatagenError, Result};
use crate::matrix::MatrixBlock;

/// Adjusts the default increment for descending sequences
///
/// An increment of exactly 1 becomes -1 when `from > to`; anything else is
/// returned unchanged.
pub fn update_seq_incr(from: f64, to: f64, incr: f64) -> f64 {
    if from > to && incr == 1.0 {
        -1.0
    } else {
        incr
    }
}

/// Fills `out` with the column vector `from, from + incr, ...`
///
/// The row count is `1 + floor((to - from) / incr)`; `to` is included only
/// when repeated increments reach it exactly. The output is always dense.
///
/// # Errors
///
/// `Argument` if `incr == 0`, if `incr` points away from `to`, or if any
/// argument is not finite.
pub fn generate_sequence(out: &mut MatrixBlock, from: f64, to: f64, incr: f64) -> Result<()> {
    if (from > to && incr > 0.0) || (from < to && incr < 0.0) || incr == 0.0 {
        return Err(DatagenError::Argument(format!(
            "Wrong sequence increment: from={}, to={}, incr={}",
            from, to, incr
        )));
    }
    if !from.is_finite() || !to.is_finite() || !incr.is_finite() {
        return Err(DatagenError::Argument(format!(
            "Sequence bounds must be finite: from={}, to={}, incr={}",
            from, to, incr
        )));
    }

    let lrows = 1.0 + ((to - from) / incr).floor();
    if lrows > MAX_NUM_BLOCKS as f64 {
        return Err(DatagenError::Dimension(format!(
            "sequence of {} rows exceeds the maximum integer size",
            lrows
        )));
    }
    let rows = lrows as usize;

    out.reset(rows, 1, false, rows as u64);
    out.allocate_dense_block();
    {
        let mut region = out.full_region()?;
        let mut cur = from;
        for i in 0..rows {
            region.put(i, 0, cur);
            cur += incr;
        }
    }
    out.recompute_non_zeros();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(out: &MatrixBlock) -> Vec<f64> {
        (0..out.n_rows()).map(|i| out.get(i, 0)).collect()
    }

    #[test]
    fn test_inclusive_end() {
        let mut out = MatrixBlock::new(0, 0, false);
        generate_sequence(&mut out, 0.0, 1.0, 0.5).unwrap();
        assert_eq!(column(&out), vec![0.0, 0.5, 1.0]);
        assert_eq!(out.n_cols(), 1);
        assert!(!out.is_sparse());
    }

    #[test]
    fn test_unreached_end_excluded() {
        let mut out = MatrixBlock::new(0, 0, false);
        generate_sequence(&mut out, 0.0, 1.0, 0.6).unwrap();
        assert_eq!(column(&out), vec![0.0, 0.6]);
    }

    #[test]
    fn test_descending() {
        let mut out = MatrixBlock::new(0, 0, false);
        let incr = update_seq_incr(5.0, 1.0, 1.0);
        assert_eq!(incr, -1.0);
        generate_sequence(&mut out, 5.0, 1.0, incr).unwrap();
        assert_eq!(column(&out), vec![5.0, 4.0, 3.0, 2.0, 1.0]);
        assert_eq!(out.nnz(), 5);
    }

    #[test]
    fn test_nnz_counts_zero_entry() {
        let mut out = MatrixBlock::new(0, 0, false);
        generate_sequence(&mut out, -2.0, 2.0, 1.0).unwrap();
        assert_eq!(column(&out), vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(out.nnz(), 4);
    }

    #[test]
    fn test_invalid_increments() {
        let mut out = MatrixBlock::new(0, 0, false);
        assert!(matches!(
            generate_sequence(&mut out, 0.0, 1.0, 0.0),
            Err(DatagenError::Argument(_))
        ));
        assert!(matches!(
            generate_sequence(&mut out, 5.0, 1.0, 1.0),
            Err(DatagenError::Argument(_))
        ));
        assert!(matches!(
            generate_sequence(&mut out, 1.0, 5.0, -1.0),
            Err(DatagenError::Argument(_))
        ));
        assert!(generate_sequence(&mut out, 0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_single_element() {
        let mut out = MatrixBlock::new(0, 0, false);
        generate_sequence(&mut out, 3.0, 3.0, 2.0).unwrap();
        assert_eq!(column(&out), vec![3.0]);
    }
}
