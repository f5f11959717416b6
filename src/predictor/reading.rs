//! Reading - validated, typed sensor input

use serde_json::Value;

use super::PipelineError;
use crate::constants::{HUMIDITY_FIELD, MATERIAL_TYPE_FIELD, TEMPERATURE_FIELD};
use crate::models::PredictRequest;

/// One validated sensor reading, ready for preprocessing
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
    pub material_type: String,
}

impl Reading {
    /// Validate a raw request.
    ///
    /// Presence is checked for every required field before any coercion,
    /// so `{}` reports both fields at once.
    pub fn from_request(req: PredictRequest, default_material: &str) -> Result<Self, PipelineError> {
        let mut missing = Vec::new();
        if req.temperature.is_none() {
            missing.push(TEMPERATURE_FIELD);
        }
        if req.humidity.is_none() {
            missing.push(HUMIDITY_FIELD);
        }

        let (Some(temperature), Some(humidity)) = (req.temperature, req.humidity) else {
            return Err(PipelineError::MissingFields(missing));
        };

        let material_type = match req.material_type {
            None => default_material.to_string(),
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(PipelineError::InvalidCategory {
                    field: MATERIAL_TYPE_FIELD,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            temperature: coerce_number(TEMPERATURE_FIELD, &temperature)?,
            humidity: coerce_number(HUMIDITY_FIELD, &humidity)?,
            material_type,
        })
    }

    /// Numeric value by training column name
    pub fn numeric(&self, field: &str) -> Option<f64> {
        match field {
            TEMPERATURE_FIELD => Some(self.temperature),
            HUMIDITY_FIELD => Some(self.humidity),
            _ => None,
        }
    }

    /// Categorical value by training column name
    pub fn categorical(&self, field: &str) -> Option<&str> {
        match field {
            MATERIAL_TYPE_FIELD => Some(self.material_type.as_str()),
            _ => None,
        }
    }
}

/// Coerce a JSON number or numeric string to a finite float
fn coerce_number(field: &'static str, value: &Value) -> Result<f64, PipelineError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(PipelineError::InvalidNumber {
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> PredictRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_valid_reading() {
        let reading = Reading::from_request(
            request(json!({ "Temperature (°C)": 35.0, "Humidity (%)": 55 })),
            "Food Waste",
        )
        .unwrap();

        assert_eq!(reading.temperature, 35.0);
        assert_eq!(reading.humidity, 55.0);
        assert_eq!(reading.material_type, "Food Waste");
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let reading = Reading::from_request(
            request(json!({ "Temperature (°C)": " 41.5 ", "Humidity (%)": "60" })),
            "Food Waste",
        )
        .unwrap();

        assert_eq!(reading.temperature, 41.5);
        assert_eq!(reading.humidity, 60.0);
    }

    #[test]
    fn test_empty_body_names_both_fields() {
        let err = Reading::from_request(PredictRequest::default(), "Food Waste").unwrap_err();

        match &err {
            PipelineError::MissingFields(fields) => {
                assert_eq!(fields, &vec![TEMPERATURE_FIELD, HUMIDITY_FIELD]);
            }
            other => panic!("Expected MissingFields, got {:?}", other),
        }
        let msg = err.to_string();
        assert!(msg.contains("Temperature (°C)"));
        assert!(msg.contains("Humidity (%)"));
    }

    #[test]
    fn test_missing_checked_before_coercion() {
        // "hot" is not numeric, but the missing humidity is reported first
        let err = Reading::from_request(request(json!({ "Temperature (°C)": "hot" })), "Food Waste")
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingFields(ref f) if f == &vec![HUMIDITY_FIELD]));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let err = Reading::from_request(
            request(json!({ "Temperature (°C)": "hot", "Humidity (%)": 50 })),
            "Food Waste",
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidNumber { field: TEMPERATURE_FIELD, .. }));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_non_finite_rejected() {
        for bad in [json!("NaN"), json!("inf"), json!(true), json!([1.0])] {
            let err = Reading::from_request(
                request(json!({ "Temperature (°C)": 30, "Humidity (%)": bad })),
                "Food Waste",
            )
            .unwrap_err();
            assert!(matches!(err, PipelineError::InvalidNumber { field: HUMIDITY_FIELD, .. }));
        }
    }

    #[test]
    fn test_material_type_override() {
        let reading = Reading::from_request(
            request(json!({ "Temperature (°C)": 30, "Humidity (%)": 40, "Material Type": "Manure" })),
            "Food Waste",
        )
        .unwrap();
        assert_eq!(reading.categorical(MATERIAL_TYPE_FIELD), Some("Manure"));

        let err = Reading::from_request(
            request(json!({ "Temperature (°C)": 30, "Humidity (%)": 40, "Material Type": 7 })),
            "Food Waste",
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidCategory { .. }));
    }

    #[test]
    fn test_field_lookup() {
        let reading = Reading {
            temperature: 1.0,
            humidity: 2.0,
            material_type: "Food Waste".into(),
        };
        assert_eq!(reading.numeric(TEMPERATURE_FIELD), Some(1.0));
        assert_eq!(reading.numeric(HUMIDITY_FIELD), Some(2.0));
        assert_eq!(reading.numeric("pH"), None);
        assert_eq!(reading.categorical("Region"), None);
    }
}
