//! Collision domains.
//!
//! Every composite generator owns a domain: the set of members whose simple
//! names must be pairwise distinct because their classes share a package or
//! an enclosing class. A primary member carries a naming strategy. A secondary
//! member derives its name from a primary (`FooKey`, `FooInput`) and may live
//! in a different domain than its primary, so escalating a primary can
//! perturb a domain that was already consistent. `Naming::solve` therefore
//! re-runs every domain until a whole pass changes nothing.

use crate::error::ReactorError;
use crate::generator::GenId;
use crate::naming::NamingStrategy;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::trace;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DomainId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MemberId(pub u32);

#[derive(Clone, Debug)]
pub enum Member {
    Primary {
        generator: GenId,
        strategy: NamingStrategy,
        domain: DomainId,
    },
    Secondary {
        generator: GenId,
        primary: MemberId,
        suffix: &'static str,
        domain: DomainId,
    },
}

impl Member {
    pub fn generator(&self) -> GenId {
        match self {
            Self::Primary { generator, .. } | Self::Secondary { generator, .. } => *generator,
        }
    }

    pub fn domain(&self) -> DomainId {
        match self {
            Self::Primary { domain, .. } | Self::Secondary { domain, .. } => *domain,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CollisionDomain {
    /// The composite whose children compete in this domain.
    pub owner: GenId,
    pub members: Vec<MemberId>,
}

/// All members and domains of one run.
#[derive(Clone, Debug, Default)]
pub struct Naming {
    members: Vec<Member>,
    domains: Vec<CollisionDomain>,
}

impl Naming {
    pub fn add_domain(&mut self, owner: GenId) -> DomainId {
        let id = DomainId(self.domains.len() as u32);
        self.domains.push(CollisionDomain {
            owner,
            members: Vec::new(),
        });
        id
    }

    pub fn add_primary(
        &mut self,
        domain: DomainId,
        generator: GenId,
        strategy: NamingStrategy,
    ) -> MemberId {
        self.push(
            domain,
            Member::Primary {
                generator,
                strategy,
                domain,
            },
        )
    }

    pub fn add_secondary(
        &mut self,
        domain: DomainId,
        generator: GenId,
        primary: MemberId,
        suffix: &'static str,
    ) -> MemberId {
        self.push(
            domain,
            Member::Secondary {
                generator,
                primary,
                suffix,
                domain,
            },
        )
    }

    fn push(&mut self, domain: DomainId, member: Member) -> MemberId {
        let id = MemberId(self.members.len() as u32);
        self.members.push(member);
        self.domains[domain.0 as usize].members.push(id);
        id
    }

    pub fn member(&self, id: MemberId) -> &Member {
        &self.members[id.0 as usize]
    }

    pub fn domain(&self, id: DomainId) -> &CollisionDomain {
        &self.domains[id.0 as usize]
    }

    pub fn domains(&self) -> &[CollisionDomain] {
        &self.domains
    }

    pub fn primary_of(&self, id: MemberId) -> MemberId {
        match self.member(id) {
            Member::Primary { .. } => id,
            Member::Secondary { primary, .. } => *primary,
        }
    }

    /// Strategy of the member, or of its primary for a secondary.
    pub fn strategy(&self, id: MemberId) -> Option<&NamingStrategy> {
        match self.member(self.primary_of(id)) {
            Member::Primary { strategy, .. } => Some(strategy),
            Member::Secondary { .. } => None,
        }
    }

    pub fn current_name(&self, id: MemberId) -> String {
        match self.member(id) {
            Member::Primary { strategy, .. } => strategy.simple_class_name(),
            Member::Secondary {
                primary, suffix, ..
            } => format!("{}{}", self.current_name(*primary), suffix),
        }
    }

    /// Package segment under which this member's children live.
    pub fn child_package(&self, id: MemberId) -> String {
        match self.member(id) {
            Member::Primary { strategy, .. } => strategy.child_package.clone(),
            Member::Secondary {
                primary, suffix, ..
            } => format!("{}{}", self.child_package(*primary), suffix.to_lowercase()),
        }
    }

    fn escalate(&mut self, primary: MemberId) -> bool {
        let Member::Primary { strategy, .. } = &mut self.members[primary.0 as usize] else {
            return false;
        };
        match strategy.fallback() {
            Some(next) => {
                trace!(from = %strategy, to = %next, "escalating name");
                *strategy = next;
                true
            }
            None => false,
        }
    }

    /// One attempt at making the names of `domain` distinct.
    ///
    /// Every member of a clashing group escalates; secondaries escalate
    /// through their primary. Returns whether any name changed. Two or more
    /// members of one group that can no longer escalate are a conflict.
    pub fn find_solution(
        &mut self,
        domain: DomainId,
        describe: &dyn Fn(GenId) -> String,
    ) -> Result<bool, ReactorError> {
        let mut by_name: IndexMap<String, SmallVec<[MemberId; 2]>> = IndexMap::new();
        for &member in &self.domain(domain).members {
            by_name
                .entry(self.current_name(member))
                .or_default()
                .push(member);
        }

        let mut escalated: FxHashSet<MemberId> = FxHashSet::default();
        let mut progress = false;
        for (name, group) in by_name {
            if group.len() < 2 {
                continue;
            }
            let mut terminal = 0usize;
            for &member in &group {
                let primary = self.primary_of(member);
                if escalated.contains(&primary) {
                    continue;
                }
                if self.escalate(primary) {
                    escalated.insert(primary);
                    progress = true;
                } else {
                    terminal += 1;
                }
            }
            if terminal >= 2 {
                return Err(ReactorError::NamingConflict {
                    domain: describe(self.domain(domain).owner),
                    names: group
                        .iter()
                        .map(|&m| format!("{name} ({})", describe(self.member(m).generator())))
                        .collect(),
                });
            }
        }
        Ok(progress)
    }

    /// Solve every domain until a full pass changes no name. Returns the
    /// number of passes.
    pub fn solve(
        &mut self,
        max_passes: usize,
        describe: &dyn Fn(GenId) -> String,
    ) -> Result<usize, ReactorError> {
        for pass in 1..=max_passes {
            let mut progress = false;
            for index in 0..self.domains.len() {
                progress |= self.find_solution(DomainId(index as u32), describe)?;
            }
            if !progress {
                return Ok(pass);
            }
        }
        Err(ReactorError::StalledLinkage {
            stage: "naming",
            stuck: self
                .domains
                .iter()
                .map(|d| describe(d.owner))
                .collect(),
        })
    }
}

#[cfg(test)]
#[path = "tests/collision_tests.rs"]
mod collision_tests;
