//! Result of an insert guarded by a uniqueness constraint.

/// Outcome of an idempotent insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was created with this ID.
    Inserted(i64),
    /// A row with the same unique key already existed; carries its ID.
    AlreadyExists(i64),
}

impl InsertOutcome {
    /// Row ID, whether new or existing.
    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::Inserted(id) | Self::AlreadyExists(id) => id,
        }
    }

    /// Returns `true` if this call created the row.
    #[must_use]
    pub const fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}
