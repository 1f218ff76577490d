//! Idempotent link primitives (check + apply pattern).
//!
//! A [`SymlinkResource`](symlink::SymlinkResource) first classifies the node
//! at its destination into a [`LinkState`], then applies the single
//! corrective action that state calls for.
pub mod symlink;

use std::path::PathBuf;

use crate::operations::NodeKind;
use crate::reconcile::Outcome;

/// Observed state of a destination, relative to the desired link.
///
/// # Examples
///
/// ```
/// use dotlink::operations::NodeKind;
/// use dotlink::reconcile::Outcome;
/// use dotlink::resources::LinkState;
///
/// assert_eq!(LinkState::Missing.outcome(), Outcome::Created);
/// assert_eq!(
///     LinkState::Blocked { kind: NodeKind::File }.outcome(),
///     Outcome::Conflict { kind: NodeKind::File },
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing exists at the destination.
    Missing,
    /// The destination is a symlink to exactly the desired source.
    Correct,
    /// The destination is a symlink (possibly dangling) to something else.
    Incorrect {
        /// The link's current target, verbatim.
        current: PathBuf,
    },
    /// The destination is occupied by a node that is not a symlink.
    Blocked {
        /// Type of the occupying node.
        kind: NodeKind,
    },
}

impl LinkState {
    /// Outcome that applying this state produces.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        match self {
            Self::Missing => Outcome::Created,
            Self::Correct => Outcome::Unchanged,
            Self::Incorrect { .. } => Outcome::Replaced,
            Self::Blocked { kind } => Outcome::Conflict { kind: *kind },
        }
    }

    /// Whether applying this state would touch the filesystem.
    #[must_use]
    pub const fn needs_change(&self) -> bool {
        matches!(self, Self::Missing | Self::Incorrect { .. })
    }
}
