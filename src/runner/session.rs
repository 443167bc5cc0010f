//! Mutable state carried through one battery run

use std::collections::HashMap;
use std::fmt;
use crate::api::ResourceId;

/// Categories of resources the battery creates and later depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Games,
    Matches,
    Bets,
    UserBets,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Games,
        ResourceKind::Matches,
        ResourceKind::Bets,
        ResourceKind::UserBets,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Games => "games",
            ResourceKind::Matches => "matches",
            ResourceKind::Bets => "bets",
            ResourceKind::UserBets => "user_bets",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attempted/passed counters. `passed <= attempted` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    attempted: u32,
    passed: u32,
}

impl Tally {
    /// Record one attempted check and whether it passed
    pub fn record(&mut self, passed: bool) {
        self.attempted += 1;
        if passed {
            self.passed += 1;
        }
    }

    pub fn attempted(&self) -> u32 {
        self.attempted
    }

    pub fn passed(&self) -> u32 {
        self.passed
    }

    pub fn failed(&self) -> u32 {
        self.attempted - self.passed
    }

    /// `passed / attempted * 100`, or 0 when nothing was attempted
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            f64::from(self.passed) / f64::from(self.attempted) * 100.0
        }
    }
}

/// Ids created during the run, in creation order, per category
#[derive(Debug, Clone, Default)]
pub struct CreatedResources {
    by_kind: HashMap<ResourceKind, Vec<ResourceId>>,
}

impl CreatedResources {
    pub fn push(&mut self, kind: ResourceKind, id: ResourceId) {
        self.by_kind.entry(kind).or_default().push(id);
    }

    /// The earliest id of `kind`; dependent cases always build on this one
    pub fn first(&self, kind: ResourceKind) -> Option<&ResourceId> {
        self.by_kind.get(&kind).and_then(|ids| ids.first())
    }

    pub fn ids(&self, kind: ResourceKind) -> &[ResourceId] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.ids(kind).len()
    }
}

/// What the battery knows about the user's balance around the placed stake
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BalanceWatch {
    /// Last balance read from the profile before a stake was placed
    pub before_stake: Option<f64>,
    /// Amount staked by the place-bet case, once it succeeded
    pub stake: Option<f64>,
}

impl BalanceWatch {
    /// Balance floor a settled win must exceed, when both sides are known
    pub fn post_stake_balance(&self) -> Option<f64> {
        match (self.before_stake, self.stake) {
            (Some(balance), Some(stake)) => Some(balance - stake),
            _ => None,
        }
    }
}

/// Session state: base URL, tokens, counters and created ids
#[derive(Debug, Clone)]
pub struct Session {
    pub base_url: String,
    pub admin_token: Option<String>,
    pub user_token: Option<String>,
    pub tally: Tally,
    pub resources: CreatedResources,
    pub balance: BalanceWatch,
}

impl Session {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            admin_token: None,
            user_token: None,
            tally: Tally::default(),
            resources: CreatedResources::default(),
            balance: BalanceWatch::default(),
        }
    }
}
