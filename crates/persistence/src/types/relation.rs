//! Relation definitions used for eager loading.

use serde::{Deserialize, Serialize};

/// How a relation is joined to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// The owner holds the target's id in `foreign_key`.
    BelongsTo {
        /// Attribute on the owner.
        foreign_key: String,
    },
    /// Each target holds the owner's id in `foreign_key`.
    HasMany {
        /// Attribute on the target.
        foreign_key: String,
    },
}

/// A named relation from one resource collection to another.
///
/// # Examples
///
/// ```
/// use bookland_persistence::types::{Relation, RelationKind};
///
/// let author = Relation::belongs_to("author", "authors", "author_id");
/// assert_eq!(author.name(), "author");
/// assert_eq!(author.target(), "authors");
/// assert!(matches!(author.kind(), RelationKind::BelongsTo { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    name: String,
    target: String,
    kind: RelationKind,
}

impl Relation {
    /// Declares a belongs-to relation.
    pub fn belongs_to(
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            kind: RelationKind::BelongsTo {
                foreign_key: foreign_key.into(),
            },
        }
    }

    /// Declares a has-many relation.
    pub fn has_many(
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            kind: RelationKind::HasMany {
                foreign_key: foreign_key.into(),
            },
        }
    }

    /// Returns the relation name, as clients spell it in `embed`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the target resource collection.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the join kind.
    pub fn kind(&self) -> &RelationKind {
        &self.kind
    }

    /// Returns the foreign key attribute, whichever side holds it.
    pub fn foreign_key(&self) -> &str {
        match &self.kind {
            RelationKind::BelongsTo { foreign_key } | RelationKind::HasMany { foreign_key } => {
                foreign_key
            }
        }
    }
}
