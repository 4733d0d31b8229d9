//! Driver and aggregation tests against a scripted backend.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use game_fv_backend::{
    BackendError, Counterexample, ModuleHandle, ProofBackend, Session, SpecHandle, Verdict,
};
use game_fv_contract::ContractSpec;
use game_fv_harness::driver::{HarnessError, SuitePlan, verify_game_suite};

/// Backend that answers verification queries from a prepared script and
/// records every call for later inspection.
struct ScriptedBackend {
    script: VecDeque<Result<Verdict, BackendError>>,
    calls: Rc<RefCell<Vec<String>>>,
}

impl ScriptedBackend {
    fn new(script: Vec<Result<Verdict, BackendError>>) -> (Self, Rc<RefCell<Vec<String>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                script: script.into(),
                calls: calls.clone(),
            },
            calls,
        )
    }

    fn all_proved() -> (Self, Rc<RefCell<Vec<String>>>) {
        Self::new((0..7).map(|_| Ok(Verdict::Proved)).collect())
    }
}

impl ProofBackend for ScriptedBackend {
    fn connect(&mut self, _reset_state: bool) -> Result<(), BackendError> {
        Ok(())
    }

    fn load_module(&mut self, path: &Path) -> Result<ModuleHandle, BackendError> {
        if !path.exists() {
            return Err(BackendError::MissingArtifact(path.to_path_buf()));
        }
        Ok(ModuleHandle::new(1, path.to_path_buf()))
    }

    fn load_reference_spec(&mut self, path: &Path) -> Result<SpecHandle, BackendError> {
        if !path.exists() {
            return Err(BackendError::MissingArtifact(path.to_path_buf()));
        }
        Ok(SpecHandle::new(2, path.to_path_buf()))
    }

    fn verify(
        &mut self,
        _module: &ModuleHandle,
        function: &str,
        _contract: &ContractSpec,
    ) -> Result<Verdict, BackendError> {
        self.calls.borrow_mut().push(function.to_string());
        self.script
            .pop_front()
            .unwrap_or(Ok(Verdict::Unknown("script exhausted".to_string())))
    }

    fn disconnect(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
}

/// A plan whose files exist (this crate's own sources stand in for the
/// module and reference-spec artifacts).
fn existing_plan() -> SuitePlan {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    SuitePlan::new(manifest.join("Cargo.toml"), manifest.join("src/lib.rs"))
}

#[test]
fn suite_verifies_seven_contracts_in_fixed_order() {
    let (backend, calls) = ScriptedBackend::all_proved();
    let mut session = Session::connect(backend, true).unwrap();

    let report = verify_game_suite(&mut session, &existing_plan()).unwrap();

    assert_eq!(report.len(), 7);
    assert!(report.all_passed());
    assert_eq!(
        *calls.borrow(),
        vec![
            "initDefaultPlayer",
            "initDefaultSprite",
            "resolveAttack",
            "resolveAttack",
            "resolveAttack",
            "checkStats",
            "checkStats",
        ]
    );

    let ids: Vec<String> = report.outcomes().iter().map(|o| o.id.to_string()).collect();
    assert_eq!(
        ids,
        vec![
            "initDefaultPlayer",
            "initDefaultSprite",
            "resolveAttack[mitigated]",
            "resolveAttack[immediate-ko]",
            "resolveAttack[normal]",
            "checkStats[pass]",
            "checkStats[fail]",
        ]
    );
}

#[test]
fn one_failed_contract_does_not_stop_the_rest() {
    let mut script: Vec<Result<Verdict, BackendError>> = (0..7).map(|_| Ok(Verdict::Proved)).collect();
    script[2] = Ok(Verdict::Refuted(Some(Counterexample::with_assignments(
        vec![("target.hp".to_string(), "101".to_string())],
    ))));
    let (backend, calls) = ScriptedBackend::new(script);
    let mut session = Session::connect(backend, true).unwrap();

    let report = verify_game_suite(&mut session, &existing_plan()).unwrap();

    // all seven contracts were still evaluated
    assert_eq!(calls.borrow().len(), 7);
    assert_eq!(report.len(), 7);
    assert!(!report.all_passed());
    assert_eq!(report.proved_count(), 6);
    assert_eq!(report.refuted_count(), 1);

    let failing = &report.outcomes()[2];
    assert_eq!(failing.id.to_string(), "resolveAttack[mitigated]");
    assert_eq!(
        failing.verdict.counterexample().unwrap().get("target.hp"),
        Some("101")
    );
}

#[test]
fn unknown_verdicts_are_recorded_not_fatal() {
    let mut script: Vec<Result<Verdict, BackendError>> = (0..7).map(|_| Ok(Verdict::Proved)).collect();
    script[6] = Ok(Verdict::Unknown("timeout".to_string()));
    let (backend, _calls) = ScriptedBackend::new(script);
    let mut session = Session::connect(backend, true).unwrap();

    let report = verify_game_suite(&mut session, &existing_plan()).unwrap();
    assert_eq!(report.unknown_count(), 1);
    assert!(!report.all_passed());
}

#[test]
fn missing_module_aborts_before_any_verification() {
    let (backend, calls) = ScriptedBackend::all_proved();
    let mut session = Session::connect(backend, true).unwrap();

    let plan = SuitePlan::from_dir(Path::new("/nonexistent"));
    let err = verify_game_suite(&mut session, &plan).unwrap_err();

    assert!(matches!(
        err,
        HarnessError::Backend(BackendError::MissingArtifact(_))
    ));
    assert!(calls.borrow().is_empty());
}

#[test]
fn missing_reference_spec_aborts_before_any_verification() {
    let (backend, calls) = ScriptedBackend::all_proved();
    let mut session = Session::connect(backend, true).unwrap();

    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    let plan = SuitePlan::new(
        manifest.join("Cargo.toml"),
        PathBuf::from("/nonexistent/game.cry"),
    );
    let err = verify_game_suite(&mut session, &plan).unwrap_err();

    assert!(matches!(
        err,
        HarnessError::Backend(BackendError::MissingArtifact(_))
    ));
    assert!(calls.borrow().is_empty());
}

#[test]
fn transport_error_during_verify_is_fatal() {
    let mut script: Vec<Result<Verdict, BackendError>> = (0..7).map(|_| Ok(Verdict::Proved)).collect();
    script[3] = Err(BackendError::ProcessError("prover crashed".to_string()));
    let (backend, calls) = ScriptedBackend::new(script);
    let mut session = Session::connect(backend, true).unwrap();

    let err = verify_game_suite(&mut session, &existing_plan()).unwrap_err();
    assert!(matches!(err, HarnessError::Backend(_)));
    // the crash happened on the fourth query; nothing further ran
    assert_eq!(calls.borrow().len(), 4);
}
