//! Validation error types
//!
//! Every variant maps to one machine-readable code returned to clients
//! in the `error` field of a 400 response.

/// Validation error for request input
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("email is required")]
    EmailRequired,

    #[error("user id must be an integer")]
    InvalidUserId,

    #[error("weight is required")]
    WeightRequired,

    #[error("weight must be a number greater than zero")]
    InvalidWeight,

    #[error("size is required")]
    SizeRequired,

    #[error("size must be a string")]
    InvalidSize,

    #[error("species is required")]
    SpeciesRequired,

    #[error("species must be a string")]
    InvalidSpecies,

    #[error("bagging_date is required")]
    BaggingDateRequired,

    #[error("bagging_date must be a valid date")]
    InvalidBaggingDate,

    #[error("name must be a string")]
    InvalidName,

    #[error("mutations must be a non-empty list")]
    MutationsRequired,

    #[error("mutation must be an object")]
    InvalidMutation,

    #[error("only the silobags table is supported")]
    UnsupportedTable,

    #[error("data must be an object")]
    DataRequired,

    #[error("key must be an integer")]
    KeyRequired,

    #[error("data has no updatable fields")]
    NoUpdatableFields,

    #[error("op must be insert, update or delete")]
    UnsupportedOp,
}

impl ValidationError {
    /// Wire code for the `error` field.
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmailRequired => "email_required",
            Self::InvalidUserId => "invalid_user_id",
            Self::WeightRequired => "weight_required",
            Self::InvalidWeight => "invalid_weight",
            Self::SizeRequired => "size_required",
            Self::InvalidSize => "invalid_size",
            Self::SpeciesRequired => "species_required",
            Self::InvalidSpecies => "invalid_species",
            Self::BaggingDateRequired => "bagging_date_required",
            Self::InvalidBaggingDate => "invalid_bagging_date",
            Self::InvalidName => "invalid_name",
            Self::MutationsRequired => "mutations_required",
            Self::InvalidMutation => "invalid_mutation",
            Self::UnsupportedTable => "unsupported_table",
            Self::DataRequired => "data_required",
            Self::KeyRequired => "key_required",
            Self::NoUpdatableFields => "no_updatable_fields",
            Self::UnsupportedOp => "unsupported_op",
        }
    }
}
