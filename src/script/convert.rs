//! Conversions across the script boundary.
//!
//! Script arrays are `Vec<Dynamic>`; the rest of the crate only sees
//! `Vec<f64>`. Integers widen to floats, anything else is rejected.

use rhai::{Array, Dynamic, Map};

use crate::data::binding::Environment;
use crate::error::ScriptError;

/// A script array element that is not a number.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NonNumeric {
    pub index: usize,
    pub type_name: &'static str,
}

pub(crate) fn number(value: &Dynamic) -> Option<f64> {
    value
        .as_float()
        .ok()
        .or_else(|| value.as_int().ok().map(|i| i as f64))
}

pub(crate) fn array_to_vec(array: &Array) -> Result<Vec<f64>, NonNumeric> {
    array
        .iter()
        .enumerate()
        .map(|(index, v)| {
            number(v).ok_or(NonNumeric {
                index,
                type_name: v.type_name(),
            })
        })
        .collect()
}

pub(crate) fn vec_to_array(values: &[f64]) -> Array {
    values.iter().map(|&v| Dynamic::from_float(v)).collect()
}

/// Object map exposed to scripts as `data`.
pub(crate) fn environment_to_map(env: &Environment<'_>) -> Map {
    env.iter()
        .map(|column| {
            (
                column.name().into(),
                Dynamic::from_array(vec_to_array(column.values())),
            )
        })
        .collect()
}

/// Validate a script's final value and turn it into column data.
pub(crate) fn result_to_column(value: Dynamic) -> Result<Vec<f64>, ScriptError> {
    if !value.is_array() {
        return Err(ScriptError::WrongResultType(value.type_name().to_string()));
    }
    let type_name = value.type_name();
    let array = value
        .try_cast::<Array>()
        .ok_or_else(|| ScriptError::WrongResultType(type_name.to_string()))?;
    if array.is_empty() {
        return Err(ScriptError::EmptyResult);
    }
    array_to_vec(&array).map_err(|e| ScriptError::NonNumericElement {
        index: e.index,
        type_name: e.type_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::binding::DataBinding;
    use crate::data::model::{DerivedColumn, SourceDataSet};
    use crate::data::store::DerivedColumnStore;

    #[test]
    fn integers_widen_to_floats() {
        let array: Array = vec![Dynamic::from_int(2), Dynamic::from_float(0.5)];
        assert_eq!(array_to_vec(&array), Ok(vec![2.0, 0.5]));
    }

    #[test]
    fn non_numeric_elements_are_rejected() {
        let array: Array = vec![Dynamic::from_float(1.0), Dynamic::from("x")];
        let err = array_to_vec(&array).unwrap_err();
        assert_eq!(err.index, 1);
    }

    #[test]
    fn result_must_be_a_non_empty_array() {
        assert!(matches!(
            result_to_column(Dynamic::from_int(5)),
            Err(ScriptError::WrongResultType(_))
        ));
        assert_eq!(
            result_to_column(Dynamic::from_array(Array::new())),
            Err(ScriptError::EmptyResult)
        );
        assert_eq!(
            result_to_column(Dynamic::from_array(vec_to_array(&[1.0, 2.0]))),
            Ok(vec![1.0, 2.0])
        );
    }

    #[test]
    fn environment_becomes_object_map() {
        let binding = DataBinding::new(SourceDataSet::from_columns([("Temp", vec![1.0, 2.0])]));
        let mut store = DerivedColumnStore::new();
        store.upsert(DerivedColumn::new("Temp2", vec![4.0], "return [4.0];"));

        let map = environment_to_map(&binding.environment(&store));
        assert_eq!(map.len(), 2);
        let temp = map.get("Temp").unwrap().clone().into_array().unwrap();
        assert_eq!(array_to_vec(&temp), Ok(vec![1.0, 2.0]));
    }
}
