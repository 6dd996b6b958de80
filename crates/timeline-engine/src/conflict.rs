//! Detect overlapping intervals on a shared resource.
//!
//! Intervals are grouped by every resource they carry, sorted by start, and swept
//! with an active set: each interval is compared only with earlier-starting
//! intervals whose end has not yet been passed. End dates are inclusive, so two
//! intervals overlap iff `a.start <= b.end && b.start <= a.end`. Back-to-back
//! intervals (one ends the day before the other begins) are NOT conflicts.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::Instant;
use crate::model::{Interval, IntervalId, ResourceId};

/// An overlapping pair of intervals sharing a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub resource_id: ResourceId,
    /// The smaller of the two interval ids.
    pub interval_a: IntervalId,
    pub interval_b: IntervalId,
    pub overlap_start: Instant,
    /// Inclusive.
    pub overlap_end: Instant,
    /// Number of shared days, counting both ends.
    pub overlap_days: i64,
}

impl Conflict {
    fn between(resource_id: &ResourceId, a: &Interval, b: &Interval) -> Self {
        let (first, second) = if a.id <= b.id { (a, b) } else { (b, a) };
        let overlap_start = a.start.max(b.start);
        let overlap_end = a.end.min(b.end);
        Conflict {
            resource_id: resource_id.clone(),
            interval_a: first.id.clone(),
            interval_b: second.id.clone(),
            overlap_start,
            overlap_end,
            overlap_days: overlap_start.days_until(overlap_end) + 1,
        }
    }

    fn sort_key(&self) -> (&ResourceId, &IntervalId, &IntervalId, Instant) {
        (
            &self.resource_id,
            &self.interval_a,
            &self.interval_b,
            self.overlap_start,
        )
    }
}

/// `true` when the two inclusive ranges share at least one day.
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    a.start <= b.end && b.start <= a.end
}

/// Find every overlapping pair per shared resource.
///
/// An interval assigned to several resources is checked independently in each
/// one, so a pair sharing two resources yields two conflicts. Intervals without
/// resources, and reversed intervals (which cover no days), are ignored.
///
/// The output is sorted by resource id, then by the pair's interval ids.
pub fn find_conflicts(intervals: &[Interval]) -> Vec<Conflict> {
    let mut groups: BTreeMap<&ResourceId, Vec<&Interval>> = BTreeMap::new();
    for interval in intervals.iter().filter(|i| !i.is_reversed()) {
        for resource in &interval.resource_ids {
            groups.entry(resource).or_default().push(interval);
        }
    }

    let mut conflicts = Vec::new();
    for (resource, mut group) in groups {
        group.sort_by(|a, b| (a.start, &a.id).cmp(&(b.start, &b.id)));

        // Intervals that started earlier and are still running at the cursor.
        let mut active: Vec<&Interval> = Vec::new();
        for current in group {
            active.retain(|earlier| earlier.end >= current.start);
            for earlier in &active {
                conflicts.push(Conflict::between(resource, earlier, current));
            }
            active.push(current);
        }
    }

    conflicts.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    debug!(
        intervals = intervals.len(),
        conflicts = conflicts.len(),
        "conflict sweep complete"
    );
    conflicts
}

/// Conflicts between one interval and the rest, e.g. for live feedback while
/// that interval is being dragged. Entries of `others` with the same id as
/// `target` are skipped.
pub fn find_conflicts_for(target: &Interval, others: &[Interval]) -> Vec<Conflict> {
    if target.is_reversed() {
        return Vec::new();
    }

    let mut conflicts: Vec<Conflict> = others
        .iter()
        .filter(|other| other.id != target.id && !other.is_reversed() && overlaps(target, other))
        .flat_map(|other| {
            target
                .resource_ids
                .intersection(&other.resource_ids)
                .map(move |resource| Conflict::between(resource, target, other))
        })
        .collect();

    conflicts.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    conflicts
}

/// Every interval id that takes part in at least one conflict.
pub fn conflicting_interval_ids(conflicts: &[Conflict]) -> BTreeSet<IntervalId> {
    conflicts
        .iter()
        .flat_map(|c| [c.interval_a.clone(), c.interval_b.clone()])
        .collect()
}

/// Group conflicts by resource, preserving their order within each group.
pub fn conflicts_by_resource(conflicts: &[Conflict]) -> BTreeMap<ResourceId, Vec<Conflict>> {
    let mut grouped: BTreeMap<ResourceId, Vec<Conflict>> = BTreeMap::new();
    for conflict in conflicts {
        grouped
            .entry(conflict.resource_id.clone())
            .or_default()
            .push(conflict.clone());
    }
    grouped
}
