//! Per-update statistics

/// Counters describing what a single `update` call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// The system was clean and both passes were skipped
    pub skipped: bool,
    /// Staged local transforms written into the world
    pub transforms_flushed: usize,
    /// Pending parent edits applied
    pub edits_applied: usize,
    /// Edits that hit a corrupted graph and had their detach skipped
    pub invariant_violations: usize,
    /// Roots the propagation pass started from
    pub roots: usize,
    /// Entities that received a world transform
    pub entities_visited: usize,
    /// Outdated world transforms removed from unreachable entities
    pub stale_removed: usize,
}

impl UpdateStats {
    /// Stats for an update that found nothing to do
    #[must_use]
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Default::default()
        }
    }

    /// Get a formatted stats string
    #[must_use]
    pub fn format_stats(&self) -> String {
        if self.skipped {
            return String::from("Hierarchy: clean");
        }
        format!(
            "Hierarchy: {} transforms | {} edits ({} violations) | {} roots, {} visited, {} stale",
            self.transforms_flushed,
            self.edits_applied,
            self.invariant_violations,
            self.roots,
            self.entities_visited,
            self.stale_removed
        )
    }
}
