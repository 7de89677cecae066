//! Built-in command handlers.
//!
//! Handlers are thin: they decode parameters, drive the [`HostDocument`]
//! contract, and report what was placed. Everything transactional or
//! concurrency-related lives in the executor.

use serde_json::{Map, Value};

use crate::host::{ComponentSpec, HostDocument};

use super::errors::HandlerError;

const SLIDER_KIND: &str = "GH_NumberSlider";
const SLIDER_NICKNAME: &str = "Slider";

/// Places a numeric slider on the canvas.
///
/// Optional numeric params: `min` (default 0), `max` (default 1), `value`
/// (default 0.5), `x` and `y` (default 100 each).
pub(crate) fn create_slider(
    document: &dyn HostDocument,
    params: &Map<String, Value>,
) -> Result<Value, HandlerError> {
    let min = number_param(params, "min")?.unwrap_or(0.0);
    let max = number_param(params, "max")?.unwrap_or(1.0);
    let value = number_param(params, "value")?.unwrap_or(0.5);
    let x = number_param(params, "x")?.unwrap_or(100.0);
    let y = number_param(params, "y")?.unwrap_or(100.0);

    if min > max {
        return Err(HandlerError::invalid_param(
            "min",
            format!("minimum {min} exceeds maximum {max}"),
        ));
    }
    let value = value.clamp(min, max);

    let spec = ComponentSpec {
        kind: SLIDER_KIND.to_string(),
        nickname: SLIDER_NICKNAME.to_string(),
        init_code: Some(format!("{min:?} < {value:?} < {max:?}")),
        pivot: (x, y),
    };
    let info = document.add_component(spec)?;
    document.recompute();
    Ok(serde_json::to_value(info)?)
}

/// Reads an optional numeric parameter.
fn number_param(
    params: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<f64>, HandlerError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| HandlerError::invalid_param(name, format!("expected a number, got {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StubHostDocument;
    use serde_json::json;

    fn params(entries: &[(&str, Value)]) -> Map<String, Value> {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn defaults_match_the_original_placement() {
        let document = StubHostDocument::default();
        let result = create_slider(&document, &Map::new()).expect("slider placed");
        assert_eq!(result["type"], SLIDER_KIND);
        assert_eq!(result["name"], SLIDER_NICKNAME);
        assert_eq!(result["x"], json!(100.0));
        assert_eq!(result["y"], json!(100.0));
        assert!(!result["id"].as_str().unwrap_or_default().is_empty());
        assert_eq!(document.recomputes(), 1);
        let placed = document.components();
        assert_eq!(placed.len(), 1);
    }

    #[test]
    fn honours_explicit_params() {
        let document = StubHostDocument::default();
        let params = params(&[
            ("min", json!(-5.0)),
            ("max", json!(5.0)),
            ("value", json!(2.5)),
            ("x", json!(20.0)),
            ("y", json!(40.0)),
        ]);
        let result = create_slider(&document, &params).expect("slider placed");
        assert_eq!(result["x"], json!(20.0));
        assert_eq!(result["y"], json!(40.0));
    }

    #[test]
    fn rejects_inverted_range() {
        let document = StubHostDocument::default();
        let params = params(&[("min", json!(2.0)), ("max", json!(1.0))]);
        let error = create_slider(&document, &params).expect_err("range invalid");
        assert!(matches!(error, HandlerError::InvalidParam { name: "min", .. }));
        assert!(document.components().is_empty());
    }

    #[rstest::rstest]
    #[case("min", json!("low"))]
    #[case("value", json!([1.0]))]
    #[case("x", json!("left"))]
    fn rejects_non_numeric_params(#[case] name: &'static str, #[case] value: Value) {
        let document = StubHostDocument::default();
        let params = params(&[(name, value)]);
        let error = create_slider(&document, &params).expect_err("param invalid");
        assert!(matches!(error, HandlerError::InvalidParam { name: got, .. } if got == name));
        assert!(document.components().is_empty());
    }

    #[test]
    fn propagates_host_rejection() {
        let document = StubHostDocument::default();
        document.reject_components();
        let error = create_slider(&document, &Map::new()).expect_err("host rejects");
        assert!(matches!(error, HandlerError::Host(_)));
        assert_eq!(document.recomputes(), 0);
    }
}
