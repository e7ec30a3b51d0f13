//! Loading trained parameters from a `policy_weights.json` export.
//!
//! ```json
//! {
//!   "frac_bits": 32,
//!   "w1": [[...8 values...], ...50 rows...],
//!   "b1": [...50 values...],
//!   "w2": [[...50...], ...70 rows...],
//!   "b2": null,
//!   "w3": [[...70...], ...11 rows...],
//!   "b3": [...11...]
//! }
//! ```
//!
//! Values are raw fixed-point bit patterns in the target precision, rows
//! ordered `[output_neuron][input_neuron]`. A `null` or missing bias
//! disables that layer's bias.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ModelError, ModelResult};
use crate::fixed::FixedPoint;
use crate::network::ModelParams;

#[derive(Debug, Deserialize)]
struct RawModel {
    frac_bits: u32,
    w1: Vec<Vec<i64>>,
    #[serde(default)]
    b1: Option<Vec<i64>>,
    w2: Vec<Vec<i64>>,
    #[serde(default)]
    b2: Option<Vec<i64>>,
    w3: Vec<Vec<i64>>,
    #[serde(default)]
    b3: Option<Vec<i64>>,
}

/// Parse and validate a weights document.
pub fn parse_model<T: FixedPoint>(json: &str) -> ModelResult<Box<ModelParams<T>>> {
    let raw: RawModel = serde_json::from_str(json)?;
    if raw.frac_bits != T::FRAC_BITS {
        return Err(ModelError::PrecisionMismatch { expected: T::FRAC_BITS, found: raw.frac_bits });
    }

    let mut params = Box::new(ModelParams::<T>::zeroed());
    fill_matrix("w1", &raw.w1, &mut params.w1)?;
    fill_matrix("w2", &raw.w2, &mut params.w2)?;
    fill_matrix("w3", &raw.w3, &mut params.w3)?;
    params.b1 = bias_vector("b1", raw.b1.as_deref())?;
    params.b2 = bias_vector("b2", raw.b2.as_deref())?;
    params.b3 = bias_vector("b3", raw.b3.as_deref())?;

    log::debug!("parsed policy model ({} fractional bits)", T::FRAC_BITS);
    Ok(params)
}

/// Read and parse a weights file.
pub fn load_model<T: FixedPoint>(path: impl AsRef<Path>) -> ModelResult<Box<ModelParams<T>>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .map_err(|source| ModelError::Io { path: path.to_path_buf(), source })?;
    let params = parse_model(&json)?;
    log::info!("loaded policy model from {}", path.display());
    Ok(params)
}

fn fill_matrix<T: FixedPoint, const ROWS: usize, const COLS: usize>(
    tensor: &'static str,
    rows: &[Vec<i64>],
    out: &mut [[T; COLS]; ROWS],
) -> ModelResult<()> {
    if rows.len() != ROWS {
        return Err(ModelError::ShapeMismatch { tensor, expected: ROWS, found: rows.len() });
    }
    for (r, (src, dst)) in rows.iter().zip(out.iter_mut()).enumerate() {
        if src.len() != COLS {
            return Err(ModelError::RowMismatch { tensor, row: r, expected: COLS, found: src.len() });
        }
        for (c, (&value, slot)) in src.iter().zip(dst.iter_mut()).enumerate() {
            *slot = to_fixed(tensor, r * COLS + c, value)?;
        }
    }
    Ok(())
}

fn bias_vector<T: FixedPoint, const N: usize>(
    tensor: &'static str,
    values: Option<&[i64]>,
) -> ModelResult<Option<[T; N]>> {
    let Some(values) = values else {
        return Ok(None);
    };
    if values.len() != N {
        return Err(ModelError::ShapeMismatch { tensor, expected: N, found: values.len() });
    }
    let mut out = [T::ZERO; N];
    for (i, (&value, slot)) in values.iter().zip(out.iter_mut()).enumerate() {
        *slot = to_fixed(tensor, i, value)?;
    }
    Ok(Some(out))
}

fn to_fixed<T: FixedPoint>(tensor: &'static str, index: usize, value: i64) -> ModelResult<T> {
    if value < T::MIN_BITS || value > T::MAX_BITS {
        return Err(ModelError::ValueOutOfRange { tensor, index, value });
    }
    Ok(T::from_bits(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{Q16, Q32};
    use crate::network::{HIDDEN_1_SIZE, HIDDEN_2_SIZE, INPUT_SIZE, OUTPUT_SIZE};
    use serde_json::json;

    fn document(frac_bits: u32) -> serde_json::Value {
        let mut w1 = vec![vec![0i64; INPUT_SIZE]; HIDDEN_1_SIZE];
        w1[3][5] = 1 << frac_bits;
        json!({
            "frac_bits": frac_bits,
            "w1": w1,
            "b1": vec![7i64; HIDDEN_1_SIZE],
            "w2": vec![vec![0i64; HIDDEN_1_SIZE]; HIDDEN_2_SIZE],
            "b2": null,
            "w3": vec![vec![-2i64; HIDDEN_2_SIZE]; OUTPUT_SIZE],
        })
    }

    #[test]
    fn test_parse_valid_document() {
        let params = parse_model::<Q32>(&document(32).to_string()).unwrap();
        assert_eq!(params.w1[3][5], Q32::ONE);
        assert_eq!(params.b1, Some([Q32::from_raw(7); HIDDEN_1_SIZE]));
        assert_eq!(params.b2, None);
        assert_eq!(params.b3, None);
        assert_eq!(params.w3[10][69], Q32::from_raw(-2));
    }

    #[test]
    fn test_precision_mismatch() {
        let err = parse_model::<Q16>(&document(32).to_string()).unwrap_err();
        assert!(matches!(err, ModelError::PrecisionMismatch { expected: 16, found: 32 }));
    }

    #[test]
    fn test_shape_mismatch() {
        let mut doc = document(16);
        doc["w2"] = json!(vec![vec![0i64; HIDDEN_1_SIZE]; 3]);
        let err = parse_model::<Q16>(&doc.to_string()).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { tensor: "w2", expected: 70, found: 3 }));

        let mut doc = document(16);
        doc["w1"][4] = json!([1, 2]);
        let err = parse_model::<Q16>(&doc.to_string()).unwrap_err();
        assert!(matches!(err, ModelError::RowMismatch { tensor: "w1", row: 4, .. }));

        let mut doc = document(16);
        doc["b3"] = json!([0, 0]);
        let err = parse_model::<Q16>(&doc.to_string()).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { tensor: "b3", .. }));
    }

    #[test]
    fn test_value_out_of_range() {
        let mut doc = document(16);
        doc["b1"][2] = json!(1i64 << 40);
        let err = parse_model::<Q16>(&doc.to_string()).unwrap_err();
        assert!(matches!(err, ModelError::ValueOutOfRange { tensor: "b1", index: 2, .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_model::<Q32>("{\"frac_bits\": 32").unwrap_err();
        assert!(matches!(err, ModelError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy_weights.json");
        std::fs::write(&path, document(32).to_string()).unwrap();

        let params = load_model::<Q32>(&path).unwrap();
        assert_eq!(params.w1[3][5], Q32::ONE);

        let err = load_model::<Q32>(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }
}
