use std::collections::BTreeMap;

use super::DecodingError;
use super::wire::{from_str, validated};
use crate::domain::{ParameterValues, Parameters};

pub(crate) const PARAMETERS_FIELD: &str = "parameters";

/// `{"<recipient>": "<value>", ..., "default": "<value>"}`
pub(crate) type WireParameterValues = BTreeMap<String, String>;
pub(crate) type WireParameters = BTreeMap<String, WireParameterValues>;

pub fn encode_parameter_values(values: &ParameterValues) -> WireParameterValues {
    let mut wire = values.substitutions().clone();
    if let Some(default_value) = values.default_value() {
        wire.insert(
            ParameterValues::DEFAULT_KEY.to_owned(),
            default_value.to_owned(),
        );
    }
    wire
}

pub fn decode_parameter_values_json(json: &str) -> Result<ParameterValues, DecodingError> {
    let wire: WireParameterValues = from_str(json)?;
    parameter_values_from_wire(wire)
}

fn parameter_values_from_wire(
    mut wire: WireParameterValues,
) -> Result<ParameterValues, DecodingError> {
    let default_value = wire.remove(ParameterValues::DEFAULT_KEY);
    validated(PARAMETERS_FIELD, ParameterValues::new(wire, default_value))
}

/// Empty parameter sets are omitted from the wire.
pub(crate) fn parameters_to_wire(parameters: &Parameters) -> Option<WireParameters> {
    if parameters.is_empty() {
        return None;
    }
    Some(encode_parameters(parameters))
}

pub(crate) fn encode_parameters(parameters: &Parameters) -> WireParameters {
    parameters
        .iter()
        .map(|(name, values)| (name.clone(), encode_parameter_values(values)))
        .collect()
}

pub(crate) fn decode_parameters(wire: WireParameters) -> Result<Parameters, DecodingError> {
    wire.into_iter()
        .map(|(name, values)| Ok((name, parameter_values_from_wire(values)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_emitted_under_reserved_key() {
        let mut substitutions = BTreeMap::new();
        substitutions.insert("123".to_owned(), "A".to_owned());
        let values = ParameterValues::new(substitutions, Some("B".to_owned())).unwrap();

        let json = serde_json::to_string(&encode_parameter_values(&values)).unwrap();
        assert_eq!(json, r#"{"123":"A","default":"B"}"#);
    }

    #[test]
    fn absent_default_omits_key() {
        let mut substitutions = BTreeMap::new();
        substitutions.insert("123".to_owned(), "A".to_owned());
        let values = ParameterValues::new(substitutions, None).unwrap();

        let json = serde_json::to_string(&encode_parameter_values(&values)).unwrap();
        assert_eq!(json, r#"{"123":"A"}"#);
    }

    #[test]
    fn decode_splits_default_from_substitutions() {
        let values = decode_parameter_values_json(r#"{"123":"A","456":"C","default":"B"}"#)
            .unwrap();
        assert_eq!(values.default_value(), Some("B"));
        assert_eq!(values.substitutions().len(), 2);
        assert_eq!(values.resolve("456"), Some("C"));

        let values = decode_parameter_values_json("{}").unwrap();
        assert_eq!(values, ParameterValues::default());
    }

    #[test]
    fn decode_rejects_non_string_values() {
        let err = decode_parameter_values_json(r#"{"123": 5}"#).unwrap_err();
        assert!(matches!(err, DecodingError::InvalidType { .. }));
        assert_eq!(err.field(), Some("123"));

        let err = decode_parameter_values_json(r#"["A"]"#).unwrap_err();
        assert!(matches!(err, DecodingError::Json(_)));
    }

    #[test]
    fn empty_parameter_sets_are_omitted() {
        assert!(parameters_to_wire(&Parameters::new()).is_none());

        let mut parameters = Parameters::new();
        parameters.insert("name".to_owned(), ParameterValues::with_default("friend"));
        let wire = parameters_to_wire(&parameters).unwrap();
        assert_eq!(wire["name"]["default"], "friend");
        assert_eq!(decode_parameters(wire).unwrap(), parameters);
    }
}
