//! # Events
//!
//! Typed event payloads and emit helpers.
//!
//! Campaign-scoped events publish under a `(topic, campaign_id)` topic pair so
//! consumers can follow one campaign's stream without decoding payloads;
//! protocol-scoped admin events use a bare one-element topic.
//!
//! | Topic       | Payload                  |
//! |-------------|--------------------------|
//! | `created`   | [`CampaignCreated`]      |
//! | `contrib`   | [`ContributionReceived`] |
//! | `funded`    | [`GoalReached`]          |
//! | `withdrawn` | [`FundsWithdrawn`]       |
//! | `refunded`  | [`RefundIssued`]         |
//! | `cancelled` | [`CampaignCancelled`]    |
//! | `fee_set`   | [`FeeUpdated`]           |
//! | `admin_set` | [`AdminChanged`]         |
//! | `swept`     | [`SurplusSwept`]         |
//!
//! Delivery is fire-and-forget: ledger correctness never depends on anyone
//! observing these.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

/// A new campaign was registered.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCreated {
    pub campaign_id: u64,
    pub creator: Address,
    pub goal: i128,
    pub deadline: u64,
}

/// A contribution was accepted; `total_raised` is the post-contribution total.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionReceived {
    pub campaign_id: u64,
    pub contributor: Address,
    pub amount: i128,
    pub total_raised: i128,
}

/// The campaign crossed its goal for the first (and only) time.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GoalReached {
    pub campaign_id: u64,
    pub raised: i128,
}

/// The creator collected a successful campaign's funds, net of the fee.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsWithdrawn {
    pub campaign_id: u64,
    pub creator_amount: i128,
    pub fee_amount: i128,
}

/// A contributor's full balance was returned.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundIssued {
    pub campaign_id: u64,
    pub contributor: Address,
    pub amount: i128,
}

/// The creator closed an untouched campaign.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCancelled {
    pub campaign_id: u64,
    pub creator: Address,
}

/// The platform fee rate changed; applies to future withdrawals only.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeUpdated {
    pub old_bps: u32,
    pub new_bps: u32,
}

/// Protocol administration moved to a new address.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminChanged {
    pub old_admin: Address,
    pub new_admin: Address,
}

/// Token balance not accounted to any campaign was recovered by the admin.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SurplusSwept {
    pub admin: Address,
    pub amount: i128,
}

pub fn emit_campaign_created(env: &Env, event: CampaignCreated) {
    env.events()
        .publish((symbol_short!("created"), event.campaign_id), event);
}

pub fn emit_contribution_received(env: &Env, event: ContributionReceived) {
    env.events()
        .publish((symbol_short!("contrib"), event.campaign_id), event);
}

pub fn emit_goal_reached(env: &Env, event: GoalReached) {
    env.events()
        .publish((symbol_short!("funded"), event.campaign_id), event);
}

pub fn emit_funds_withdrawn(env: &Env, event: FundsWithdrawn) {
    env.events()
        .publish((symbol_short!("withdrawn"), event.campaign_id), event);
}

pub fn emit_refund_issued(env: &Env, event: RefundIssued) {
    env.events()
        .publish((symbol_short!("refunded"), event.campaign_id), event);
}

pub fn emit_campaign_cancelled(env: &Env, event: CampaignCancelled) {
    env.events()
        .publish((symbol_short!("cancelled"), event.campaign_id), event);
}

pub fn emit_fee_updated(env: &Env, event: FeeUpdated) {
    env.events().publish((symbol_short!("fee_set"),), event);
}

pub fn emit_admin_changed(env: &Env, event: AdminChanged) {
    env.events().publish((symbol_short!("admin_set"),), event);
}

pub fn emit_surplus_swept(env: &Env, event: SurplusSwept) {
    env.events().publish((symbol_short!("swept"),), event);
}
