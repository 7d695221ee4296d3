#![forbid(unsafe_code)]

use std::sync::{LazyLock, RwLock};

use nd_core::{ConfigError, ParseConfig, StructuredDiagnostic};
use nd_parser::{ParseResult, net_summary_json, parse_with_config};
use nd_render_gojs::{GoJsModel, project};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;

/// Everything a browser caller needs from one parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WasmParseOutput {
    pub success: bool,
    pub diagnostics: Vec<StructuredDiagnostic>,
    pub model: GoJsModel,
}

impl WasmParseOutput {
    fn new(parsed: &ParseResult) -> Self {
        Self {
            success: parsed.is_success(),
            diagnostics: parsed.structured_diagnostics(),
            model: project(&parsed.net),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RuntimeInitConfig {
    parser: ParserConfigOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ParserConfigOverrides {
    comment_prefix: Option<String>,
}

static RUNTIME_CONFIG: LazyLock<RwLock<ParseConfig>> =
    LazyLock::new(|| RwLock::new(ParseConfig::default()));

fn read_runtime_config() -> ParseConfig {
    match RUNTIME_CONFIG.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn write_runtime_config(config: ParseConfig) {
    match RUNTIME_CONFIG.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => {
            let mut guard = poisoned.into_inner();
            *guard = config;
        }
    }
}

fn js_error(message: impl Into<String>) -> JsValue {
    JsValue::from_str(&message.into())
}

fn parse_js_value_or_default<T>(value: Option<JsValue>) -> Result<T, JsValue>
where
    T: for<'de> Deserialize<'de> + Default,
{
    match value {
        None => Ok(T::default()),
        Some(raw) if raw.is_undefined() || raw.is_null() => Ok(T::default()),
        Some(raw) => {
            #[cfg(target_arch = "wasm32")]
            {
                serde_wasm_bindgen::from_value(raw)
                    .map_err(|err| js_error(format!("invalid config: {err}")))
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = raw;
                Ok(T::default())
            }
        }
    }
}

fn to_js_value<T>(value: &T) -> Result<JsValue, JsValue>
where
    T: Serialize,
{
    #[cfg(target_arch = "wasm32")]
    {
        serde_wasm_bindgen::to_value(value)
            .map_err(|err| js_error(format!("failed to serialize response: {err}")))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        serde_json::to_string(value)
            .map(|json| JsValue::from_str(&json))
            .map_err(|err| js_error(format!("failed to serialize response: {err}")))
    }
}

fn merge_parse_config(
    base: &ParseConfig,
    overrides: &ParserConfigOverrides,
) -> Result<ParseConfig, ConfigError> {
    let mut merged = base.clone();
    if let Some(prefix) = overrides.comment_prefix.as_ref() {
        merged.comment_prefix = prefix.clone();
    }
    merged.validate()?;
    Ok(merged)
}

/// Parse and project `input` with an explicit configuration.
#[must_use]
pub fn parse_netdsl(input: &str, config: &ParseConfig) -> WasmParseOutput {
    WasmParseOutput::new(&parse_with_config(input, config))
}

/// Set the configuration used by every later call.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn init(config: Option<JsValue>) -> Result<(), JsValue> {
    let overrides: RuntimeInitConfig = parse_js_value_or_default(config)?;
    let next = merge_parse_config(&read_runtime_config(), &overrides.parser)
        .map_err(|err| js_error(format!("invalid parser config: {err}")))?;
    write_runtime_config(next);
    Ok(())
}

/// `{ success, diagnostics, model }` for `input`.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = parse))]
pub fn parse_js(input: &str, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    let overrides: RuntimeInitConfig = parse_js_value_or_default(config)?;
    let config = merge_parse_config(&read_runtime_config(), &overrides.parser)
        .map_err(|err| js_error(format!("invalid parser config: {err}")))?;
    to_js_value(&parse_netdsl(input, &config))
}

/// Only the GoJS model, ready for `go.Model.fromJson`.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = project))]
pub fn project_js(input: &str) -> Result<JsValue, JsValue> {
    let output = parse_netdsl(input, &read_runtime_config());
    to_js_value(&output.model)
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(js_name = summary))]
#[must_use]
pub fn summary_js(input: &str) -> String {
    net_summary_json(&parse_with_config(input, &read_runtime_config()))
}

/// Rendered diagnostic lines as a JS array of strings.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = diagnosticLines)]
pub fn diagnostic_lines_js(input: &str) -> js_sys::Array {
    parse_with_config(input, &read_runtime_config())
        .rendered_diagnostics()
        .into_iter()
        .map(|line| JsValue::from_str(&line))
        .collect()
}

#[cfg(test)]
mod tests {
    use nd_core::ParseConfig;

    use super::{ParserConfigOverrides, merge_parse_config, parse_netdsl, summary_js};

    #[test]
    fn parse_output_bundles_diagnostics_and_model() {
        let output = parse_netdsl("node a A\nnode a\nedge e a a\n", &ParseConfig::default());
        assert!(!output.success);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].code, 5);
        assert_eq!((output.diagnostics[0].line, output.diagnostics[0].column), (2, 6));
        assert_eq!(output.model.nodes().count(), 1);
        assert_eq!(output.model.links().count(), 1);
    }

    #[test]
    fn output_serializes_with_camel_case_envelope() {
        let output = parse_netdsl("node a\n", &ParseConfig::default());
        let json = serde_json::to_value(&output).expect("encode output");
        assert_eq!(json["success"], true);
        assert_eq!(json["diagnostics"][0]["display"], "Success");
        assert_eq!(json["model"]["nodeDataArray"][0]["key"], "a");
    }

    #[test]
    fn merge_applies_and_validates_comment_prefix() {
        let overrides = ParserConfigOverrides {
            comment_prefix: Some("#".to_string()),
        };
        let merged =
            merge_parse_config(&ParseConfig::default(), &overrides).expect("valid prefix");
        assert_eq!(merged.comment_prefix, "#");

        let overrides = ParserConfigOverrides {
            comment_prefix: Some(String::new()),
        };
        assert!(merge_parse_config(&ParseConfig::default(), &overrides).is_err());

        let untouched = merge_parse_config(&merged, &ParserConfigOverrides::default())
            .expect("no overrides");
        assert_eq!(untouched, merged);
    }

    #[test]
    fn summary_reports_counts() {
        let summary = summary_js("node a\nnode b\nedge e a b\n");
        assert!(summary.contains("\"node_count\":2"));
        assert!(summary.contains("\"edge_count\":1"));
    }
}
