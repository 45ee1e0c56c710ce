//! # Types
//!
//! Shared data structures of the crowdfund protocol.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Campaign` is internally stored as two separate ledger entries:
//!
//! - [`CampaignConfig`]: written once at creation; never mutated. Carries the
//!   two metadata strings, so it is the large entry.
//! - [`CampaignState`]: rewritten on every contribution, refund, withdrawal
//!   and cancellation; kept to a handful of scalars so the high-frequency
//!   writes stay cheap.
//!
//! The public API exposes the reconstructed [`Campaign`] struct for
//! convenience.
//!
//! ### Lifecycle as three one-way flags
//!
//! The campaign state machine is encoded in `is_active`, `goal_reached` and
//! `funds_withdrawn`, each of which flips at most once:
//!
//! ```text
//! Active ─────────► GoalReached ─────► Withdrawn
//!   │          (goal_reached=true)   (funds_withdrawn=true, is_active=false)
//!   │
//!   ├──► Cancelled   (is_active=false; only while raised == 0)
//!   │
//!   └──► Refundable  (deadline passed, goal never reached; contributors
//!                     exit one by one, no single terminal transition)
//! ```
//!
//! `goal_reached` never reverts and is never re-evaluated after the fact: a
//! campaign that misses its goal before the deadline stays refundable no
//! matter what happens to the ledger afterwards.

use soroban_sdk::{contracttype, Address, String};

/// Immutable campaign configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignConfig {
    pub id: u64,
    pub creator: Address,
    pub title: String,
    pub description: String,
    pub goal: i128,
    pub deadline: u64,
}

/// Mutable campaign state, rewritten by every ledger operation.
///
/// Kept small so that frequent writes (contributions) are cheap.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignState {
    pub raised: i128,
    pub is_active: bool,
    pub goal_reached: bool,
    pub funds_withdrawn: bool,
    pub contributor_count: u32,
}

/// Full representation of a funding campaign.
///
/// Used as the public API return type; reconstructed internally from the
/// split `CampaignConfig` + `CampaignState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Campaign {
    /// Unique identifier (auto-incremented from 0).
    pub id: u64,
    /// Address that created the campaign and may withdraw on success.
    pub creator: Address,
    /// Short human-readable name; non-empty.
    pub title: String,
    /// Longer pitch text; non-empty.
    pub description: String,
    /// Target amount in the funding token's smallest unit.
    pub goal: i128,
    /// Outstanding contributions: grows on contribute, shrinks on refund,
    /// frozen once withdrawn.
    pub raised: i128,
    /// Ledger timestamp after which contributions are rejected.
    pub deadline: u64,
    /// False once withdrawn or cancelled; inactive campaigns accept nothing.
    pub is_active: bool,
    /// Set the first time `raised` meets the goal; irreversible.
    pub goal_reached: bool,
    /// Set by the creator's single successful withdrawal.
    pub funds_withdrawn: bool,
    /// Number of distinct addresses with a positive running balance.
    pub contributor_count: u32,
}

/// One append-only contribution log entry.
///
/// Never mutated or deleted; refunds zero the running balance but leave the
/// history intact for audit queries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contribution {
    pub contributor: Address,
    pub amount: i128,
    pub timestamp: u64,
}
