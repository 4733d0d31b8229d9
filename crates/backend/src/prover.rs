use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use game_fv_contract::ContractSpec;

use crate::config::ProverConfig;
use crate::error::BackendError;
use crate::session::{ModuleHandle, ProofBackend, SpecHandle};
use crate::verdict::Verdict;
use crate::wire::{VerifyRequest, parse_response};

/// Subprocess client for the external symbolic-execution engine.
///
/// Spawns the prover once per verification query and pipes one JSON request
/// in and one JSON response out, so no mutable proof state is ever shared
/// between queries.
#[derive(Debug)]
pub struct SubprocessProver {
    config: ProverConfig,
    connected: bool,
    fresh_state: bool,
    reference_spec: Option<PathBuf>,
    next_handle: u32,
}

impl SubprocessProver {
    /// Create a prover client with the given configuration.
    pub fn new(config: ProverConfig) -> Self {
        Self {
            config,
            connected: false,
            fresh_state: false,
            reference_spec: None,
            next_handle: 0,
        }
    }

    /// Create a prover client with an auto-detected binary location.
    pub fn with_default_config() -> Result<Self, BackendError> {
        let config = ProverConfig::auto_detect()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &ProverConfig {
        &self.config
    }

    fn mint_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    fn check_artifact(path: &Path) -> Result<(), BackendError> {
        if !path.exists() {
            return Err(BackendError::MissingArtifact(path.to_path_buf()));
        }
        Ok(())
    }
}

impl ProofBackend for SubprocessProver {
    fn connect(&mut self, reset_state: bool) -> Result<(), BackendError> {
        self.config.validate()?;
        self.connected = true;
        self.fresh_state = reset_state;
        tracing::debug!(
            program = %self.config.program.display(),
            reset_state,
            "subprocess prover connected"
        );
        Ok(())
    }

    fn load_module(&mut self, path: &Path) -> Result<ModuleHandle, BackendError> {
        Self::check_artifact(path)?;
        let id = self.mint_handle();
        Ok(ModuleHandle::new(id, path.to_path_buf()))
    }

    fn load_reference_spec(&mut self, path: &Path) -> Result<SpecHandle, BackendError> {
        Self::check_artifact(path)?;
        self.reference_spec = Some(path.to_path_buf());
        let id = self.mint_handle();
        Ok(SpecHandle::new(id, path.to_path_buf()))
    }

    fn verify(
        &mut self,
        module: &ModuleHandle,
        function: &str,
        contract: &ContractSpec,
    ) -> Result<Verdict, BackendError> {
        if !self.connected {
            return Err(BackendError::ProcessError(
                "verify called on a closed session".to_string(),
            ));
        }

        let module_path = module.path().to_path_buf();
        let request = VerifyRequest {
            module: &module_path,
            reference_spec: self.reference_spec.as_ref(),
            function,
            contract,
            fresh_state: self.fresh_state,
        };
        let payload = serde_json::to_string(&request)
            .map_err(|e| BackendError::ProcessError(format!("failed to encode request: {e}")))?;

        tracing::debug!(function, module = %module_path.display(), "verifying contract");

        let mut child = Command::new(&self.config.program)
            .args(self.config.build_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BackendError::ProcessError(format!("failed to start prover: {e}")))?;

        {
            let stdin = child.stdin.as_mut().ok_or_else(|| {
                BackendError::ProcessError("failed to open prover stdin".to_string())
            })?;
            stdin.write_all(payload.as_bytes()).map_err(|e| {
                BackendError::ProcessError(format!("failed to write to prover stdin: {e}"))
            })?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| BackendError::ProcessError(format!("failed to wait for prover: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        // Only the first query needs the reset; later ones reuse loaded state.
        self.fresh_state = false;

        parse_response(&stdout, &stderr)
    }

    fn disconnect(&mut self) -> Result<(), BackendError> {
        self.connected = false;
        tracing::debug!("subprocess prover disconnected");
        Ok(())
    }
}
