//! Centralized limits and thresholds for the generator reactor.
//!
//! Every fixpoint loop and chain walk in the reactor is bounded. A correct
//! schema converges far below these limits; hitting one means the input has a
//! cycle the linkage rules cannot break, and the run fails closed.

// =============================================================================
// Fixpoint Limits
// =============================================================================

/// Default upper bound on passes of any single fixpoint loop.
///
/// Each pass of the original-link, grouping-usage and naming loops must make
/// progress on at least one item, so the number of useful passes is bounded by
/// the longest dependency chain in the schema. This is the safety net used when
/// the caller does not configure a tighter bound.
pub const DEFAULT_MAX_FIXPOINT_PASSES: usize = 10_000;

// =============================================================================
// Chain Walk Limits
// =============================================================================

/// Maximum number of `Partial` hops followed when resolving an original link.
///
/// Matches the deepest plausible nesting of grouping reuse (`uses` inside a
/// grouping used by another grouping, and so on).
pub const MAX_ORIGINAL_CHAIN: usize = 256;

/// Maximum number of leafref hops followed when computing a return type.
///
/// A leafref pointing at another leafref is legal; a loop of them is not.
pub const MAX_LEAFREF_CHAIN: usize = 64;
