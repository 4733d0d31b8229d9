use std::path::{Path, PathBuf};

use game_fv_contract::ContractSpec;

use crate::error::BackendError;
use crate::verdict::Verdict;

/// Handle to a loaded compiled module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleHandle {
    id: u32,
    path: PathBuf,
}

impl ModuleHandle {
    pub fn new(id: u32, path: PathBuf) -> Self {
        Self { id, path }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Handle to a loaded reference-spec source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecHandle {
    id: u32,
    path: PathBuf,
}

impl SpecHandle {
    pub fn new(id: u32, path: PathBuf) -> Self {
        Self { id, path }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The proof backend consumed by the verification driver.
///
/// Implementations answer independent, self-contained queries; the loaded
/// module and reference spec are the only state shared between them.
pub trait ProofBackend {
    /// Establish a connection, optionally discarding prior backend state.
    fn connect(&mut self, reset_state: bool) -> Result<(), BackendError>;

    /// Load the compiled module under test. The file must exist; a missing
    /// artifact is fatal before any contract is attempted.
    fn load_module(&mut self, path: &Path) -> Result<ModuleHandle, BackendError>;

    /// Load the reference-spec source that contract `Apply` terms resolve
    /// against.
    fn load_reference_spec(&mut self, path: &Path) -> Result<SpecHandle, BackendError>;

    /// Verify one function against one contract.
    fn verify(
        &mut self,
        module: &ModuleHandle,
        function: &str,
        contract: &ContractSpec,
    ) -> Result<Verdict, BackendError>;

    /// Tear down the connection.
    fn disconnect(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
}

/// An explicitly passed session handle with open/close lifecycle.
///
/// Opened at run start via [`Session::connect`], closed at run end via
/// [`Session::close`]; all backend operations go through it rather than
/// through ambient connection state.
#[derive(Debug)]
pub struct Session<B: ProofBackend> {
    backend: B,
}

impl<B: ProofBackend> Session<B> {
    /// Open a session, optionally resetting backend state.
    pub fn connect(mut backend: B, reset_state: bool) -> Result<Self, BackendError> {
        backend.connect(reset_state)?;
        tracing::debug!(reset_state, "proof backend session opened");
        Ok(Self { backend })
    }

    pub fn load_module(&mut self, path: &Path) -> Result<ModuleHandle, BackendError> {
        self.backend.load_module(path)
    }

    pub fn load_reference_spec(&mut self, path: &Path) -> Result<SpecHandle, BackendError> {
        self.backend.load_reference_spec(path)
    }

    pub fn verify(
        &mut self,
        module: &ModuleHandle,
        function: &str,
        contract: &ContractSpec,
    ) -> Result<Verdict, BackendError> {
        self.backend.verify(module, function, contract)
    }

    /// Close the session.
    pub fn close(mut self) -> Result<(), BackendError> {
        self.backend.disconnect()
    }
}
