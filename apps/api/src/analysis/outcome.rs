//! Provenance tagging for stage results.
//!
//! Stages that can swallow an LLM failure return `Staged<T>` so callers can
//! tell AI-derived data from caller-supplied data and from placeholders.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Provenance {
    /// Produced by a successful model call.
    Ai,
    /// Supplied by the caller, or no model call was needed.
    Provided,
    /// The model call failed; `data` is a heuristic or fixed default.
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Staged<T> {
    pub data: T,
    pub provenance: Provenance,
}

impl<T> Staged<T> {
    pub fn ai(data: T) -> Self {
        Self {
            data,
            provenance: Provenance::Ai,
        }
    }

    pub fn provided(data: T) -> Self {
        Self {
            data,
            provenance: Provenance::Provided,
        }
    }

    pub fn fallback(data: T, reason: impl ToString) -> Self {
        Self {
            data,
            provenance: Provenance::Fallback {
                reason: reason.to_string(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.provenance, Provenance::Fallback { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_serializes_tagged() {
        let value = serde_json::to_value(Provenance::Fallback {
            reason: "timed out".to_string(),
        })
        .unwrap();
        assert_eq!(value["kind"], "fallback");
        assert_eq!(value["reason"], "timed out");

        let value = serde_json::to_value(Provenance::Ai).unwrap();
        assert_eq!(value, serde_json::json!({"kind": "ai"}));
    }

    #[test]
    fn test_is_fallback() {
        assert!(Staged::fallback(1, "x").is_fallback());
        assert!(!Staged::ai(1).is_fallback());
        assert!(!Staged::provided(1).is_fallback());
    }
}
