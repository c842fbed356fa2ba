//! Readiness probe

use serde::Serialize;

use super::handle::{ModelHandle, Provenance};
use super::pipeline::utc_timestamp;

/// Snapshot of model readiness
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    /// Whether predictions can be answered
    pub ready: bool,
    pub model_path: String,
    /// `fallback` when serving the embedded reference model
    pub provenance: Option<Provenance>,
    pub timestamp: String,
}

impl ReadinessReport {
    /// Read the handle state without attempting a load
    pub fn of(handle: &ModelHandle) -> Self {
        Self {
            ready: handle.is_ready(),
            model_path: handle.path().display().to_string(),
            provenance: handle.provenance(),
            timestamp: utc_timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_never_loads() {
        let handle = ModelHandle::new("does/not/exist.json", true);
        for _ in 0..3 {
            let report = ReadinessReport::of(&handle);
            assert!(!report.ready);
            assert!(report.provenance.is_none());
        }
        assert!(!handle.is_ready());

        handle.ensure_loaded();
        let report = ReadinessReport::of(&handle);
        assert!(report.ready);
        assert_eq!(report.model_path, "does/not/exist.json");
        assert_eq!(report.provenance, Some(Provenance::Fallback));
    }

    #[test]
    fn test_report_serialization() {
        let handle = ModelHandle::new("artifacts/model/model.json", false);
        let json = serde_json::to_value(ReadinessReport::of(&handle)).unwrap();
        assert_eq!(json["ready"], false);
        assert_eq!(json["model_path"], "artifacts/model/model.json");
        assert!(json["provenance"].is_null());
        assert!(json["timestamp"].is_string());
    }
}
