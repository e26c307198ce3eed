use log::warn;

use crate::{
    constants::{COV_ENTRIES, COV_PREFIX, COV_ROWS},
    covariance::{Covariance, CovarianceMatrix},
    orbfit::labelled_values,
    orbprep_errors::OrbprepError,
};

/// Values carried by each ` COV` row after its label.
const VALUES_PER_ROW: usize = 3;

/// Decode the covariance rows of an OrbFit Cartesian block.
///
/// The rows are the lines starting with ` COV`. Seven rows of three values hold
/// the 21 upper-triangular entries in row-major order:
///
/// ```text
///  COV  c11 c12 c13
///  COV  c14 c15 c16
///  COV  c22 c23 c24
///  COV  c25 c26 c33
///  COV  c34 c35 c36
///  COV  c44 c45 c46
///  COV  c55 c56 c66
/// ```
///
/// Arguments
/// -----------------
/// * `block` – lines of the Cartesian block (see [`crate::orbfit::record_reader::last_block`]).
/// * `source_name` – file or object name, used in diagnostics.
///
/// Return
/// ----------
/// * [`Covariance::Present`] when exactly seven rows are found.
/// * [`Covariance::Absent`] for any other row count; a warning is logged.
/// * [`OrbprepError::MalformedRecord`] when one of the seven rows does not carry
///   three numeric values.
pub fn decode_covariance(block: &[String], source_name: &str) -> Result<Covariance, OrbprepError> {
    let rows: Vec<&String> = block
        .iter()
        .filter(|line| line.starts_with(COV_PREFIX))
        .collect();

    if rows.len() != COV_ROWS {
        warn!(
            "Empty covariance matrix for {source_name}: {} COV rows found, {COV_ROWS} expected",
            rows.len()
        );
        return Ok(Covariance::Absent);
    }

    let mut values = [0.0; COV_ENTRIES];
    for (row_idx, row) in rows.iter().enumerate() {
        let (_, row_values) = labelled_values(row)
            .map_err(|reason| OrbprepError::malformed(source_name, format!("COV row: {reason}")))?;
        if row_values.len() != VALUES_PER_ROW {
            return Err(OrbprepError::malformed(
                source_name,
                format!(
                    "COV row {} holds {} values, expected {VALUES_PER_ROW}",
                    row_idx + 1,
                    row_values.len()
                ),
            ));
        }
        let start = row_idx * VALUES_PER_ROW;
        values[start..start + VALUES_PER_ROW].copy_from_slice(&row_values);
    }

    Ok(Covariance::Present(CovarianceMatrix::from_upper_triangle(
        &values,
    )))
}

#[cfg(test)]
mod covariance_decoder_test {
    use super::*;
    use crate::cartesian_state::Component;
    use rstest::rstest;

    fn cov_rows(n: usize) -> Vec<String> {
        let mut block = vec![
            "! Cartesian position and velocity vectors".to_string(),
            " CAR  1.0 2.0 3.0 0.1 0.2 0.3".to_string(),
            " MJD     58936.999199216 TDT".to_string(),
        ];
        for row in 0..n {
            let base = (row * 3) as f64;
            block.push(format!(
                " COV   {:.15E}  {:.15E}  {:.15E}",
                base + 1.0,
                base + 2.0,
                base + 3.0
            ));
        }
        block
    }

    #[test]
    fn test_seven_rows_give_full_matrix() {
        let cov = decode_covariance(&cov_rows(7), "test").unwrap();
        let cov = cov.as_matrix().unwrap();
        let expected: Vec<f64> = (1..=21).map(|v| v as f64).collect();
        assert_eq!(cov.upper_triangle().to_vec(), expected);
        assert_eq!(cov.get(Component::Vz, Component::Vz), 21.0);
        assert_eq!(cov.get(Component::Z, Component::Y), 8.0);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(6)]
    #[case(8)]
    fn test_wrong_row_count_is_absent(#[case] n: usize) {
        let cov = decode_covariance(&cov_rows(n), "test").unwrap();
        assert_eq!(cov, Covariance::Absent);
    }

    #[test]
    fn test_fortran_exponent() {
        let mut block = cov_rows(7);
        block[3] = " COV   1.0D-08  2.0d-09  3.0E-10".to_string();
        let cov = decode_covariance(&block, "test").unwrap();
        let cov = cov.as_matrix().unwrap();
        assert_eq!(cov.get(Component::X, Component::X), 1.0e-8);
        assert_eq!(cov.get(Component::X, Component::Y), 2.0e-9);
    }

    #[test]
    fn test_short_row_is_malformed() {
        let mut block = cov_rows(7);
        block[5] = " COV   1.0  2.0".to_string();
        let err = decode_covariance(&block, "30101").unwrap_err();
        assert_eq!(
            err,
            OrbprepError::malformed("30101", "COV row 3 holds 2 values, expected 3")
        );
    }

    #[test]
    fn test_non_numeric_row_is_malformed() {
        let mut block = cov_rows(7);
        block[4] = " COV   1.0  abc  3.0".to_string();
        assert!(matches!(
            decode_covariance(&block, "30101"),
            Err(OrbprepError::MalformedRecord { .. })
        ));
    }
}
