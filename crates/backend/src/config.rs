use std::path::PathBuf;

use crate::error::BackendError;

/// Environment variable overriding the prover binary location.
pub const PROVER_ENV: &str = "GAME_FV_PROVER";

/// Binary name used for PATH lookup.
const PROVER_BINARY: &str = "symx";

/// Common installation paths to check when PATH lookup fails.
const COMMON_PATHS: &[&str] = &[
    "/opt/homebrew/bin/symx",
    "/usr/local/bin/symx",
    "/usr/bin/symx",
];

/// Prover configuration.
#[derive(Debug, Clone)]
pub struct ProverConfig {
    /// Path to the prover binary.
    pub program: PathBuf,
    /// Timeout per verification query in milliseconds (0 = no timeout).
    pub timeout_ms: u64,
    /// Additional prover arguments.
    pub extra_args: Vec<String>,
}

impl ProverConfig {
    /// Create a config for the given prover binary.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            timeout_ms: 0,
            extra_args: Vec::new(),
        }
    }

    /// Set a per-query timeout (in milliseconds).
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Add extra arguments for the prover.
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Auto-detect the prover location.
    ///
    /// Checks the `GAME_FV_PROVER` environment variable first, then `which`
    /// via PATH lookup, then common installation paths.
    pub fn auto_detect() -> Result<Self, BackendError> {
        if let Ok(path_str) = std::env::var(PROVER_ENV) {
            let path = PathBuf::from(&path_str);
            if path.exists() {
                return Ok(Self::new(path));
            }
            return Err(BackendError::NotFound(path));
        }

        if let Ok(output) = std::process::Command::new("which")
            .arg(PROVER_BINARY)
            .output()
            && output.status.success()
        {
            let path_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !path_str.is_empty() {
                let path = PathBuf::from(&path_str);
                if path.exists() {
                    return Ok(Self::new(path));
                }
            }
        }

        for candidate in COMMON_PATHS {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Ok(Self::new(path));
            }
        }

        Err(BackendError::NotFound(PathBuf::from(PROVER_BINARY)))
    }

    /// Build the full argument list for one prover invocation.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec!["--batch".to_string()];
        if self.timeout_ms > 0 {
            args.push(format!("--timeout-ms={}", self.timeout_ms));
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Validate that the configured prover binary exists.
    pub fn validate(&self) -> Result<(), BackendError> {
        if !self.program.exists() {
            return Err(BackendError::NotFound(self.program.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_defaults() {
        let config = ProverConfig::new(PathBuf::from("/usr/bin/symx"));
        assert_eq!(config.program, PathBuf::from("/usr/bin/symx"));
        assert_eq!(config.timeout_ms, 0);
        assert!(config.extra_args.is_empty());
    }

    #[test]
    fn builder_pattern() {
        let config = ProverConfig::new(PathBuf::from("/usr/bin/symx"))
            .with_timeout(5000)
            .with_extra_args(vec!["--seed=7".to_string()]);
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.extra_args, vec!["--seed=7".to_string()]);
    }

    #[test]
    fn build_args_include_timeout_and_extras() {
        let config = ProverConfig::new(PathBuf::from("/usr/bin/symx"))
            .with_timeout(3000)
            .with_extra_args(vec!["--seed=7".to_string()]);
        assert_eq!(
            config.build_args(),
            vec!["--batch", "--timeout-ms=3000", "--seed=7"]
        );
    }

    #[test]
    fn build_args_omit_zero_timeout() {
        let config = ProverConfig::new(PathBuf::from("/usr/bin/symx"));
        assert_eq!(config.build_args(), vec!["--batch"]);
    }

    #[test]
    fn validate_missing_binary() {
        let config = ProverConfig::new(PathBuf::from("/nonexistent/symx"));
        let err = config.validate().unwrap_err();
        assert_eq!(err, BackendError::NotFound(PathBuf::from("/nonexistent/symx")));
    }
}
