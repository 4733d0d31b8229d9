use serde::{Deserialize, Serialize};

/// A counterexample from the backend: concrete assignments to the contract's
/// symbolic inputs under which the postcondition fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterexample {
    /// Variable assignments: `(name, value_string)` pairs.
    pub assignments: Vec<(String, String)>,
}

impl Counterexample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assignments(assignments: Vec<(String, String)>) -> Self {
        Self { assignments }
    }

    /// Look up a variable's value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// The backend's answer for one contract. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The postcondition holds under the precondition for all inputs.
    Proved,
    /// The postcondition fails for some input, optionally witnessed.
    Refuted(Option<Counterexample>),
    /// The backend could not decide (timeout, resource limit, etc.).
    Unknown(String),
}

impl Verdict {
    /// The suite-level success predicate counts only proved contracts.
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Proved)
    }

    pub fn is_refuted(&self) -> bool {
        matches!(self, Verdict::Refuted(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Verdict::Unknown(_))
    }

    /// The counterexample, if the verdict is `Refuted` with one.
    pub fn counterexample(&self) -> Option<&Counterexample> {
        match self {
            Verdict::Refuted(Some(cex)) => Some(cex),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proved_predicates() {
        let verdict = Verdict::Proved;
        assert!(verdict.is_success());
        assert!(!verdict.is_refuted());
        assert!(!verdict.is_unknown());
    }

    #[test]
    fn refuted_predicates() {
        let verdict = Verdict::Refuted(None);
        assert!(!verdict.is_success());
        assert!(verdict.is_refuted());
        assert!(!verdict.is_unknown());
    }

    #[test]
    fn unknown_predicates() {
        let verdict = Verdict::Unknown("timeout".to_string());
        assert!(!verdict.is_success());
        assert!(!verdict.is_refuted());
        assert!(verdict.is_unknown());
    }

    #[test]
    fn counterexample_accessor() {
        let cex = Counterexample::with_assignments(vec![(
            "target.hp".to_string(),
            "101".to_string(),
        )]);
        let refuted = Verdict::Refuted(Some(cex.clone()));
        assert_eq!(refuted.counterexample(), Some(&cex));
        assert_eq!(Verdict::Refuted(None).counterexample(), None);
        assert_eq!(Verdict::Proved.counterexample(), None);
    }

    #[test]
    fn counterexample_lookup() {
        let cex = Counterexample::with_assignments(vec![
            ("atk".to_string(), "55".to_string()),
            ("target.def".to_string(), "3".to_string()),
        ]);
        assert_eq!(cex.len(), 2);
        assert!(!cex.is_empty());
        assert_eq!(cex.get("atk"), Some("55"));
        assert_eq!(cex.get("target.hp"), None);
        assert!(Counterexample::new().is_empty());
    }
}
