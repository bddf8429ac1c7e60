use serde::Serialize;

/// Why a result was built from defaults instead of the model's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegradeReason {
    /// The reply could not be recovered as a JSON object.
    UnparsableOutput { detail: String },
    /// The reply parsed, but these fields were absent or had the wrong shape.
    FieldsDefaulted { fields: Vec<String> },
    /// The completion call itself failed.
    CompletionFailed { detail: String },
}

/// A value produced from model output, tagged with whether it is trustworthy.
///
/// Hard failures are carried separately as `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Clean(T),
    Degraded { value: T, reason: DegradeReason },
}

impl<T> Outcome<T> {
    pub fn value(&self) -> &T {
        match self {
            Outcome::Clean(value) | Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Clean(value) | Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn status(&self) -> OutcomeStatus {
        match self {
            Outcome::Clean(_) => OutcomeStatus::Clean,
            Outcome::Degraded { reason, .. } => OutcomeStatus::Degraded {
                reason: reason.clone(),
            },
        }
    }
}

/// Serializable tag of an `Outcome`, reported to API callers next to the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Clean,
    Degraded { reason: DegradeReason },
}
