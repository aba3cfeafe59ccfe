//! Session context - the crop, condition, and status an advisory session is about.

use serde::{Deserialize, Serialize};

/// Placeholder used for any context field the upstream record did not supply.
pub const UNKNOWN_FIELD: &str = "Unknown";

/// The situational facts for one engine instance.
///
/// Read once when the engine starts and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Crop that was scanned, e.g. "Tomato".
    pub crop: String,

    /// Detected condition or disease, e.g. "Early Blight".
    pub condition: String,

    /// Free-form health status reported by the scan, e.g. "HEALTHY" or "DEFECTIVE".
    pub status: String,
}

impl SessionContext {
    /// Create a session context from its three fields.
    pub fn new(
        crop: impl Into<String>,
        condition: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            crop: crop.into(),
            condition: condition.into(),
            status: status.into(),
        }
    }

    /// Classify the raw status text.
    pub fn health(&self) -> HealthStatus {
        HealthStatus::classify(&self.status)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new("Generic", "None", UNKNOWN_FIELD)
    }
}

/// Coarse health classification of a scanned crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// The scan found nothing wrong; advice should focus on maintenance.
    Healthy,
    /// Anything the scan flagged; advice should focus on treatment.
    Diseased,
    /// No usable status was reported.
    Unknown,
}

impl HealthStatus {
    /// Classify a status string, ignoring case and surrounding whitespace.
    pub fn classify(status: &str) -> Self {
        let status = status.trim();
        if status.is_empty() || status.eq_ignore_ascii_case(UNKNOWN_FIELD) {
            HealthStatus::Unknown
        } else if status.eq_ignore_ascii_case("healthy") {
            HealthStatus::Healthy
        } else {
            HealthStatus::Diseased
        }
    }

    /// Short label for banners and logs.
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "HEALTHY",
            HealthStatus::Diseased => "DISEASED",
            HealthStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context() {
        let context = SessionContext::default();
        assert_eq!(context.crop, "Generic");
        assert_eq!(context.condition, "None");
        assert_eq!(context.status, "Unknown");
        assert_eq!(context.health(), HealthStatus::Unknown);
    }

    #[test]
    fn test_classify_healthy() {
        assert_eq!(HealthStatus::classify("HEALTHY"), HealthStatus::Healthy);
        assert_eq!(HealthStatus::classify("  healthy "), HealthStatus::Healthy);
    }

    #[test]
    fn test_classify_diseased() {
        assert_eq!(HealthStatus::classify("DEFECTIVE"), HealthStatus::Diseased);
        assert_eq!(HealthStatus::classify("Diseased"), HealthStatus::Diseased);
        assert_eq!(HealthStatus::classify("needs attention"), HealthStatus::Diseased);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(HealthStatus::classify(""), HealthStatus::Unknown);
        assert_eq!(HealthStatus::classify("unknown"), HealthStatus::Unknown);
    }

    #[test]
    fn test_health_label() {
        assert_eq!(HealthStatus::Diseased.to_string(), "DISEASED");
    }
}
