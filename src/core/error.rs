//! Error types for hierarchy and configuration operations

use std::fmt;

use hecs::Entity;

/// Broad classification of a [`HierarchyError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed an edge or handle that cannot be accepted
    InvalidArgument,
    /// The committed graph is corrupted (a programming error)
    InvariantViolation,
}

/// Errors that can occur while editing or reconciling the hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// An entity was asked to become its own parent
    SelfParent(Entity),
    /// The requested parent is a descendant of the entity being moved
    Cycle {
        /// Entity being reparented
        entity: Entity,
        /// Requested parent
        parent: Entity,
    },
    /// A handle does not refer to a live entity
    NoSuchEntity(Entity),
    /// A recorded parent has no `Children` set listing the child
    MissingChildren {
        /// Parent missing its children set
        parent: Entity,
        /// Child being detached
        child: Entity,
    },
}

impl HierarchyError {
    /// Classify this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SelfParent(_) | Self::Cycle { .. } | Self::NoSuchEntity(_) => {
                ErrorKind::InvalidArgument
            }
            Self::MissingChildren { .. } => ErrorKind::InvariantViolation,
        }
    }
}

impl fmt::Display for HierarchyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfParent(entity) => write!(f, "Entity {entity:?} cannot be its own parent"),
            Self::Cycle { entity, parent } => write!(
                f,
                "Parenting {entity:?} under {parent:?} would create a cycle"
            ),
            Self::NoSuchEntity(entity) => write!(f, "No such entity: {entity:?}"),
            Self::MissingChildren { parent, child } => write!(
                f,
                "Parent {parent:?} of {child:?} has no children set (corrupted hierarchy)"
            ),
        }
    }
}

impl std::error::Error for HierarchyError {}

/// Errors that can occur while loading a [`HierarchyConfig`](super::HierarchyConfig)
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error
    IoError(String),
    /// Deserialization error
    DeserializeError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let mut world = hecs::World::new();
        let a = world.spawn(());
        let b = world.spawn(());

        assert_eq!(
            HierarchyError::SelfParent(a).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            HierarchyError::Cycle {
                entity: a,
                parent: b
            }
            .kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            HierarchyError::NoSuchEntity(a).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            HierarchyError::MissingChildren {
                parent: a,
                child: b
            }
            .kind(),
            ErrorKind::InvariantViolation
        );
    }

    #[test]
    fn test_error_display() {
        let mut world = hecs::World::new();
        let a = world.spawn(());

        let message = HierarchyError::SelfParent(a).to_string();
        assert!(message.contains("own parent"));

        let message = ConfigError::DeserializeError("bad field".into()).to_string();
        assert_eq!(message, "Deserialization error: bad field");
    }
}
