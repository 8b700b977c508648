/// Gated content extracted from a block.
///
/// A pure function of the block's text: identical text always yields an
/// equal value. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GateSpec {
    /// Content to withhold (trimmed, may be empty).
    pub payload: String,
    /// Required credential. `None` means the configured default applies.
    pub secret: Option<String>,
}

impl GateSpec {
    /// Payload protected by an explicit secret (`{{password:...}}`).
    #[must_use]
    pub fn password(secret: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            secret: Some(secret.into()),
        }
    }

    /// Payload protected by the default credential (`{{encrypted:...}}`).
    #[must_use]
    pub fn encrypted(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            secret: None,
        }
    }

    /// Whether unlocking relies on the configured default credential.
    #[must_use]
    pub fn uses_default_credential(&self) -> bool {
        self.secret.is_none()
    }
}
