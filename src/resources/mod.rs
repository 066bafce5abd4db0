//! Filesystem primitives applied to the destination tree.
pub mod clean;
pub mod copy;
pub mod marker;

pub use clean::{CleanReport, clean};
pub use copy::{CopyStats, copy_tree};
pub use marker::{Language, apply_language};

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use dtb_selector::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
/// let skipped = ResourceChange::Skipped { reason: "English needs no marker".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// assert_ne!(noop, skipped);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was skipped.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}
