//! Original links.
//!
//! A generator instantiated by `uses` remembers the generator it was copied
//! from. That predecessor may itself be a copy (a grouping reused through
//! another grouping), so the declaring generator is found by walking the
//! chain. The first walk caches its result on every `Partial` link it passed,
//! union-find style, so later lookups stop after one hop.

use crate::generator::{GenId, GeneratorArena};
use smallvec::SmallVec;
use tracing::trace;
use yangbind_common::limits::MAX_ORIGINAL_CHAIN;
use yangbind_model::StmtId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OriginalLink {
    /// The generator is its own original or points straight at it.
    Complete(GenId),
    /// The generator copies `previous`; `original` caches the chain's end.
    Partial {
        previous: GenId,
        original: Option<GenId>,
    },
}

impl OriginalLink {
    pub fn previous(&self) -> Option<GenId> {
        match self {
            Self::Complete(_) => None,
            Self::Partial { previous, .. } => Some(*previous),
        }
    }
}

impl GeneratorArena {
    /// Establish the link of `id` if its predecessor can be found yet.
    ///
    /// Unlinked parents are linked on demand, so a copy deep inside an
    /// instantiated subtree links as soon as the groupings along the way are
    /// known.
    pub(crate) fn link_original(&mut self, id: GenId) -> bool {
        if self.get(id).is_linked() {
            return true;
        }
        match self.find_link(id) {
            Some(link) => {
                trace!(generator = %id, ?link, "linked original");
                self.get_mut(id).link = Some(link);
                true
            }
            None => false,
        }
    }

    fn find_link(&mut self, id: GenId) -> Option<OriginalLink> {
        let generator = self.get(id);
        if !generator.added_by_uses {
            return Some(OriginalLink::Complete(id));
        }
        let declared = generator.declared;
        let parent = generator.parent?;

        // Copied straight out of a grouping the parent uses.
        let groupings = self
            .composite(parent)
            .map(|c| c.groupings.clone())
            .unwrap_or_default();
        for grouping in groupings {
            if let Some(previous) = self.child_copying(grouping, declared) {
                return Some(OriginalLink::Partial {
                    previous,
                    original: None,
                });
            }
        }

        // Nested inside a copy: the same child of the parent's predecessor.
        if !self.link_original(parent) {
            return None;
        }
        let parent_previous = self.get(parent).link.as_ref()?.previous()?;
        self.child_copying(parent_previous, declared)
            .map(|previous| OriginalLink::Partial {
                previous,
                original: None,
            })
    }

    fn child_copying(&self, parent: GenId, declared: StmtId) -> Option<GenId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.get(c).declared == declared)
    }

    /// The generator declaring `id`, linking and caching along the way.
    ///
    /// `None` while some link of the chain cannot be established yet.
    pub fn original(&mut self, id: GenId) -> Option<GenId> {
        let mut walked: SmallVec<[GenId; 8]> = SmallVec::new();
        let mut current = id;
        let mut result = None;
        for _ in 0..MAX_ORIGINAL_CHAIN {
            if !self.link_original(current) {
                return None;
            }
            match self.get(current).link {
                Some(OriginalLink::Complete(original)) => {
                    result = Some(original);
                    break;
                }
                Some(OriginalLink::Partial {
                    original: Some(original),
                    ..
                }) => {
                    result = Some(original);
                    break;
                }
                Some(OriginalLink::Partial {
                    previous,
                    original: None,
                }) => {
                    walked.push(current);
                    if previous == current {
                        result = Some(current);
                        break;
                    }
                    current = previous;
                }
                None => return None,
            }
        }
        let original = result?;
        for node in walked {
            if let Some(OriginalLink::Partial { original: slot, .. }) =
                self.get_mut(node).link.as_mut()
            {
                *slot = Some(original);
            }
        }
        Some(original)
    }

    /// Read-only `original`: follows established links without linking.
    pub fn original_of(&self, id: GenId) -> Option<GenId> {
        let mut current = id;
        for _ in 0..MAX_ORIGINAL_CHAIN {
            match self.get(current).link.as_ref()? {
                OriginalLink::Complete(original)
                | OriginalLink::Partial {
                    original: Some(original),
                    ..
                } => return Some(*original),
                OriginalLink::Partial {
                    previous,
                    original: None,
                } => {
                    if *previous == current {
                        return Some(current);
                    }
                    current = *previous;
                }
            }
        }
        None
    }

    pub fn original_link(&self, id: GenId) -> Option<&OriginalLink> {
        self.get(id).link.as_ref()
    }
}

#[cfg(test)]
#[path = "tests/original_tests.rs"]
mod original_tests;
