//! Snapshot selection around a build time.

use chrono::NaiveDateTime;
use tracing::debug;

use super::SnapshotRef;

/// Maximum number of snapshots pinned into a recipe.
pub const MAX_SELECTED: usize = 2;

/// Pick the snapshots taken just before `build_time`.
///
/// `entries` must be in ascending timestamp order, as the archive lists them.
/// Entries are taken while they are strictly earlier than `build_time`; the
/// scan stops at the first entry that is not. Of those, the last two are
/// returned oldest first, so the newer snapshot has the older one as a
/// fallback source. An empty result means the build predates every listed
/// snapshot.
pub fn select_snapshots(build_time: NaiveDateTime, entries: &[SnapshotRef]) -> Vec<SnapshotRef> {
  let earlier = entries.iter().take_while(|entry| entry.timestamp < build_time).count();
  let start = earlier.saturating_sub(MAX_SELECTED);

  debug!(
    build_time = %build_time,
    listed = entries.len(),
    earlier,
    "selected snapshots"
  );

  entries[start..earlier].to_vec()
}
