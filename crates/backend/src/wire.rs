//! JSON wire format for the subprocess prover.
//!
//! One verification query is one request on the prover's stdin and one
//! response on its stdout. The prover may print log lines before the
//! response, so parsing starts at the first `{`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use game_fv_contract::ContractSpec;

use crate::error::BackendError;
use crate::verdict::{Counterexample, Verdict};

/// One verification query.
#[derive(Debug, Serialize)]
pub struct VerifyRequest<'a> {
    /// Compiled module under test.
    pub module: &'a PathBuf,
    /// Reference-spec source the contract's `Apply` terms resolve against.
    pub reference_spec: Option<&'a PathBuf>,
    /// Name of the function under contract.
    pub function: &'a str,
    /// The contract itself.
    pub contract: &'a ContractSpec,
    /// Whether the prover should discard cached state from earlier runs.
    pub fresh_state: bool,
}

/// One assignment in a reported counterexample.
#[derive(Debug, Serialize, Deserialize)]
pub struct WireAssignment {
    pub name: String,
    pub value: String,
}

/// The prover's answer.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// `"proved"`, `"refuted"`, or `"unknown"`.
    pub result: String,
    #[serde(default)]
    pub counterexample: Option<Vec<WireAssignment>>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Parse the prover's stdout/stderr into a `Verdict`.
pub fn parse_response(stdout: &str, stderr: &str) -> Result<Verdict, BackendError> {
    let stdout = stdout.trim();

    if stderr.contains("timeout") || stdout == "timeout" {
        return Ok(Verdict::Unknown("timeout".to_string()));
    }

    if stdout.is_empty() {
        return Err(BackendError::ParseError(format!(
            "empty prover output. stderr: {stderr}"
        )));
    }

    // Skip any log noise before the JSON object.
    let start = stdout.find('{').ok_or_else(|| {
        BackendError::ParseError(format!("no JSON object in prover output: {stdout}"))
    })?;
    let end = stdout.rfind('}').ok_or_else(|| {
        BackendError::ParseError(format!("unterminated JSON object in prover output: {stdout}"))
    })?;

    let response: VerifyResponse = serde_json::from_str(&stdout[start..=end])
        .map_err(|e| BackendError::ParseError(format!("malformed prover response: {e}")))?;

    match response.result.as_str() {
        "proved" => Ok(Verdict::Proved),
        "refuted" => {
            let cex = response.counterexample.map(|assignments| {
                Counterexample::with_assignments(
                    assignments.into_iter().map(|a| (a.name, a.value)).collect(),
                )
            });
            Ok(Verdict::Refuted(cex))
        }
        "unknown" => Ok(Verdict::Unknown(
            response.reason.unwrap_or_else(|| "unknown".to_string()),
        )),
        other => Err(BackendError::ParseError(format!(
            "unexpected prover result: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_fv_layout::{LayoutModel, Shape};

    #[test]
    fn parse_proved() {
        let verdict = parse_response(r#"{"result": "proved"}"#, "").unwrap();
        assert_eq!(verdict, Verdict::Proved);
    }

    #[test]
    fn parse_refuted_with_counterexample() {
        let stdout = r#"
        {
          "result": "refuted",
          "counterexample": [
            {"name": "target.hp", "value": "101"},
            {"name": "atk", "value": "0"}
          ]
        }"#;
        let verdict = parse_response(stdout, "").unwrap();
        let cex = verdict.counterexample().expect("counterexample");
        assert_eq!(cex.get("target.hp"), Some("101"));
        assert_eq!(cex.get("atk"), Some("0"));
    }

    #[test]
    fn parse_refuted_without_counterexample() {
        let verdict = parse_response(r#"{"result": "refuted"}"#, "").unwrap();
        assert_eq!(verdict, Verdict::Refuted(None));
    }

    #[test]
    fn parse_unknown_with_reason() {
        let verdict =
            parse_response(r#"{"result": "unknown", "reason": "resource limit"}"#, "").unwrap();
        assert_eq!(verdict, Verdict::Unknown("resource limit".to_string()));
    }

    #[test]
    fn parse_skips_log_noise_before_json() {
        let stdout = "loading module artifacts/game.bc\n{\"result\": \"proved\"}";
        let verdict = parse_response(stdout, "").unwrap();
        assert_eq!(verdict, Verdict::Proved);
    }

    #[test]
    fn timeout_in_stderr_maps_to_unknown() {
        let verdict = parse_response("", "prover: timeout after 30000ms").unwrap();
        assert_eq!(verdict, Verdict::Unknown("timeout".to_string()));
    }

    #[test]
    fn empty_output_is_parse_error() {
        let err = parse_response("", "").unwrap_err();
        assert!(matches!(err, BackendError::ParseError(_)));
    }

    #[test]
    fn garbage_output_is_parse_error() {
        let err = parse_response("segmentation fault", "").unwrap_err();
        assert!(matches!(err, BackendError::ParseError(_)));

        let err = parse_response(r#"{"result": "maybe"}"#, "").unwrap_err();
        assert!(matches!(err, BackendError::ParseError(_)));
    }

    #[test]
    fn request_serializes_function_and_paths() {
        let mut spec = ContractSpec::new("checkStats", LayoutModel::game());
        let character = spec.alloc(Shape::record("character_t")).unwrap();
        spec.execute(vec![game_fv_contract::Value::ptr(&character)])
            .unwrap();
        spec.returns(game_fv_contract::Term::u32(170)).unwrap();
        let contract = spec.finish().unwrap();

        let module = PathBuf::from("artifacts/game.bc");
        let reference = PathBuf::from("specs/game.cry");
        let request = VerifyRequest {
            module: &module,
            reference_spec: Some(&reference),
            function: "checkStats",
            contract: &contract,
            fresh_state: true,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["function"], "checkStats");
        assert_eq!(json["module"], "artifacts/game.bc");
        assert_eq!(json["reference_spec"], "specs/game.cry");
        assert_eq!(json["fresh_state"], true);
        assert_eq!(json["contract"]["function"], "checkStats");
    }
}
