//! Mapping from a raw consumption reading to the model's input vector.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of inputs the prediction model expects.
pub const FEATURE_COUNT: usize = 7;

/// Daily consumption reading plus the calendar fields of the simulated day.
///
/// Values are carried exactly as Acquire sent them. A missing field is
/// `null` and is forwarded as a gap in its slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default)]
    pub consumo_hoy: Value,
    #[serde(default)]
    pub consumo_ayer: Value,
    #[serde(default)]
    pub consumo_antes_ayer: Value,
    #[serde(default)]
    pub dia_semana: Value,
    #[serde(default)]
    pub mes: Value,
    #[serde(default)]
    pub dia_del_mes: Value,
}

impl Reading {
    /// Read the six fields out of an Acquire `data` value. Never fails: a
    /// value without a field, or that is not an object at all, yields `null`.
    pub fn from_data(data: &Value) -> Self {
        let field = |key: &str| data.get(key).cloned().unwrap_or(Value::Null);
        Self {
            consumo_hoy: field("consumo_hoy"),
            consumo_ayer: field("consumo_ayer"),
            consumo_antes_ayer: field("consumo_antes_ayer"),
            dia_semana: field("dia_semana"),
            mes: field("mes"),
            dia_del_mes: field("dia_del_mes"),
        }
    }
}

/// Positional model input. The order matches the one the model was trained on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector([Value; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }
}

impl From<&Reading> for FeatureVector {
    fn from(reading: &Reading) -> Self {
        FeatureVector([
            reading.consumo_hoy.clone(),
            reading.consumo_ayer.clone(),
            reading.consumo_antes_ayer.clone(),
            reading.dia_semana.clone(),
            reading.mes.clone(),
            reading.dia_del_mes.clone(),
            // unused model slot
            Value::from(0),
        ])
    }
}

/// Build the feature vector for one reading.
pub fn featurise(reading: &Reading) -> FeatureVector {
    FeatureVector::from(reading)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn integers_keep_their_representation() {
        let reading = Reading::from_data(&json!({
            "consumo_hoy": 10,
            "consumo_ayer": 12.5,
            "consumo_antes_ayer": 9,
            "dia_semana": 1,
            "mes": 1,
            "dia_del_mes": 1
        }));
        let features = featurise(&reading);
        assert_eq!(
            serde_json::to_string(&features).unwrap(),
            "[10,12.5,9,1,1,1,0]"
        );
    }

    #[test]
    fn missing_field_leaves_a_gap() {
        let reading = Reading::from_data(&json!({
            "consumo_ayer": 12,
            "consumo_antes_ayer": 9,
            "dia_semana": 1,
            "mes": null,
            "dia_del_mes": 1
        }));
        let features = featurise(&reading);
        assert_eq!(
            serde_json::to_value(&features).unwrap(),
            json!([null, 12, 9, 1, null, 1, 0])
        );
    }

    #[test]
    fn non_numeric_fields_pass_through_unchanged() {
        let reading = Reading::from_data(&json!({
            "consumo_hoy": "10.50",
            "consumo_ayer": 12,
            "dia_semana": true
        }));
        assert_eq!(
            serde_json::to_value(featurise(&reading)).unwrap(),
            json!(["10.50", 12, null, true, null, null, 0])
        );
    }

    #[test]
    fn non_object_data_yields_only_gaps() {
        for data in [json!(5), json!("reading"), json!([1, 2, 3])] {
            let features = featurise(&Reading::from_data(&data));
            assert_eq!(
                serde_json::to_value(&features).unwrap(),
                json!([null, null, null, null, null, null, 0]),
                "{data}"
            );
        }
    }
}
