//! Error types shared by declaration, masking and the bulk runner.

use thiserror::Error;

/// Result alias for masking operations.
pub type MaskResult<T> = Result<T, MaskError>;

/// Errors reported by persistence collaborators.
///
/// The runner never inspects these; it only reports them.
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while declaring, evaluating or applying masking.
#[derive(Debug, Error)]
pub enum MaskError {
    /// The attribute was never declared as maskable on this type.
    #[error("`{attribute}` is not a maskable attribute of `{type_name}`")]
    UnconfiguredAttribute {
        type_name: String,
        attribute: String,
    },

    /// Neither the masking router nor the subject answer to this name.
    #[error("undefined member `{name}` for `{type_name}`")]
    MissingMember { type_name: String, name: String },

    /// A method reference or callable reached the registry without an instance
    /// to resolve it against.
    #[error("setting `{key}` of `{attribute}` needs an instance to be resolved")]
    UnresolvedSetting { attribute: String, key: String },

    /// A strategy was configured with an operation it does not provide.
    #[error("{strategy} does not provide an operation named `{operation}`")]
    UnknownOperation { strategy: String, operation: String },

    /// The declaration itself is malformed.
    #[error("invalid masking declaration on `{type_name}`: {reason}")]
    InvalidDeclaration { type_name: String, reason: String },

    /// The marshaler failed to dump or load a value.
    #[error("marshaling failed: {0}")]
    Marshal(#[from] serde_json::Error),

    /// A masked value could not be written into its storage slot.
    #[error("cannot assign `{slot}`: {reason}")]
    Assign { slot: String, reason: String },

    /// Bulk masking refused to run in a production environment.
    #[error("refusing to mask records in the `{environment}` environment")]
    EnvironmentGuardRejected { environment: String },

    /// No persistence layer is available to the bulk runner.
    #[error("no persistence layer is available")]
    PersistenceUnavailable,

    /// A single record could not be updated; the record is left untouched.
    #[error("failed to update `{type_name}` record {id}: {source}")]
    PerRecordUpdateFailed {
        type_name: String,
        id: String,
        #[source]
        source: StoreError,
    },

    /// Records of a type could not be counted or listed.
    #[error("failed to enumerate `{type_name}` records: {source}")]
    Enumeration {
        type_name: String,
        #[source]
        source: StoreError,
    },
}

impl MaskError {
    pub(crate) fn unconfigured(type_name: &str, attribute: &str) -> Self {
        Self::UnconfiguredAttribute {
            type_name: type_name.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn missing_member(type_name: &str, name: &str) -> Self {
        Self::MissingMember {
            type_name: type_name.to_string(),
            name: name.to_string(),
        }
    }
}
