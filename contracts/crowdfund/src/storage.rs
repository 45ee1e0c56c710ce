//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the crowdfund
//! protocol:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key             | Type      | Description                            |
//! |-----------------|-----------|----------------------------------------|
//! | `Admin`         | `Address` | Protocol administrator / fee recipient |
//! | `Token`         | `Address` | Funding token accepted by the escrow   |
//! | `FeeBps`        | `u32`     | Platform fee in basis points           |
//! | `CampaignCount` | `u64`     | Auto-increment campaign ID counter     |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                 | Type                | Description                      |
//! |---------------------|---------------------|----------------------------------|
//! | `CampConfig(id)`    | `CampaignConfig`    | Immutable campaign configuration |
//! | `CampState(id)`     | `CampaignState`     | Mutable campaign state           |
//! | `Balance(id, addr)` | `i128`              | Per-contributor running balance  |
//! | `History(id)`       | `Vec<Contribution>` | Append-only contribution log     |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! ## Why split Config and State?
//!
//! Contributions are high-frequency writes. Writing the full `Campaign` struct
//! (two metadata strings plus nine scalars) on every contribution is wasteful.
//! `CampaignState` is five small scalars, so the hot write path stays cheap
//! while the public API stays clean via the reconstructed [`Campaign`] return
//! type.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{Campaign, CampaignConfig, CampaignState, Contribution};
use crate::{Error, DEFAULT_FEE_BPS};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
///
/// Instance-tier keys hold protocol-wide singletons and are extended
/// together. Persistent-tier keys hold per-campaign data with independent
/// TTLs.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Protocol administrator and fee recipient (Instance).
    Admin,
    /// Funding token accepted by every campaign (Instance).
    Token,
    /// Platform fee in basis points (Instance).
    FeeBps,
    /// Global auto-increment counter for campaign IDs (Instance).
    CampaignCount,
    /// Immutable campaign configuration keyed by ID (Persistent).
    CampConfig(u64),
    /// Mutable campaign state keyed by ID (Persistent).
    CampState(u64),
    /// Running balance keyed by (campaign ID, contributor) (Persistent).
    Balance(u64, Address),
    /// Append-only contribution log keyed by campaign ID (Persistent).
    History(u64),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Return `true` once `initialize` has run.
pub fn has_admin(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

/// Store the protocol admin address in instance storage.
pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    bump_instance(env);
}

/// Retrieve the protocol admin address.
/// Panics if the contract has not been initialized.
pub fn get_admin(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .expect("admin not set")
}

/// Store the funding token address in instance storage.
pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
    bump_instance(env);
}

/// Retrieve the funding token address.
/// Panics if the contract has not been initialized.
pub fn get_token(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .expect("token not set")
}

/// Store the platform fee rate in basis points.
pub fn set_fee_bps(env: &Env, bps: u32) {
    env.storage().instance().set(&DataKey::FeeBps, &bps);
    bump_instance(env);
}

/// Retrieve the platform fee rate, falling back to the default.
pub fn get_fee_bps(env: &Env) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::FeeBps)
        .unwrap_or(DEFAULT_FEE_BPS)
}

/// Atomically reads, increments, and stores the campaign counter.
/// Returns the ID to use for the *current* campaign (pre-increment value).
pub fn get_and_increment_campaign_id(env: &Env) -> u64 {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::CampaignCount)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::CampaignCount, &(current + 1));
    current
}

/// Total number of campaigns ever created (also the next unused ID).
pub fn get_campaign_count(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::CampaignCount)
        .unwrap_or(0)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save both the immutable config and initial mutable state for a new campaign.
pub fn save_campaign(env: &Env, campaign: &Campaign) {
    let config_key = DataKey::CampConfig(campaign.id);
    let state_key = DataKey::CampState(campaign.id);

    let config = CampaignConfig {
        id: campaign.id,
        creator: campaign.creator.clone(),
        title: campaign.title.clone(),
        description: campaign.description.clone(),
        goal: campaign.goal,
        deadline: campaign.deadline,
    };

    let state = CampaignState {
        raised: campaign.raised,
        is_active: campaign.is_active,
        goal_reached: campaign.goal_reached,
        funds_withdrawn: campaign.funds_withdrawn,
        contributor_count: campaign.contributor_count,
    };

    env.storage().persistent().set(&config_key, &config);
    env.storage().persistent().set(&state_key, &state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

/// Load the full `Campaign` by combining config and state.
pub fn load_campaign(env: &Env, id: u64) -> Result<Campaign, Error> {
    let config = load_campaign_config(env, id)?;
    let state = load_campaign_state(env, id)?;
    Ok(Campaign {
        id: config.id,
        creator: config.creator,
        title: config.title,
        description: config.description,
        goal: config.goal,
        raised: state.raised,
        deadline: config.deadline,
        is_active: state.is_active,
        goal_reached: state.goal_reached,
        funds_withdrawn: state.funds_withdrawn,
        contributor_count: state.contributor_count,
    })
}

/// Load only the immutable campaign configuration.
pub fn load_campaign_config(env: &Env, id: u64) -> Result<CampaignConfig, Error> {
    let key = DataKey::CampConfig(id);
    let config: CampaignConfig = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::CampaignNotFound)?;
    bump_persistent(env, &key);
    Ok(config)
}

/// Load only the mutable campaign state.
pub fn load_campaign_state(env: &Env, id: u64) -> Result<CampaignState, Error> {
    let key = DataKey::CampState(id);
    let state: CampaignState = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::CampaignNotFound)?;
    bump_persistent(env, &key);
    Ok(state)
}

/// Save only the mutable campaign state (the contribution/refund hot path).
pub fn save_campaign_state(env: &Env, id: u64, state: &CampaignState) {
    let key = DataKey::CampState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

/// Running contribution balance for `contributor`, 0 if none recorded.
pub fn get_balance(env: &Env, campaign_id: u64, contributor: &Address) -> i128 {
    let key = DataKey::Balance(campaign_id, contributor.clone());
    match env.storage().persistent().get(&key) {
        Some(balance) => {
            bump_persistent(env, &key);
            balance
        }
        None => 0,
    }
}

/// Write a contribution balance. Refunds write 0; the entry is kept.
pub fn set_balance(env: &Env, campaign_id: u64, contributor: &Address, balance: i128) {
    let key = DataKey::Balance(campaign_id, contributor.clone());
    env.storage().persistent().set(&key, &balance);
    bump_persistent(env, &key);
}

/// Full contribution log for a campaign, oldest first.
pub fn load_contributions(env: &Env, campaign_id: u64) -> Vec<Contribution> {
    let key = DataKey::History(campaign_id);
    match env.storage().persistent().get(&key) {
        Some(log) => {
            bump_persistent(env, &key);
            log
        }
        None => Vec::new(env),
    }
}

/// Append one entry to a campaign's contribution log.
pub fn push_contribution(env: &Env, campaign_id: u64, entry: &Contribution) {
    let key = DataKey::History(campaign_id);
    let mut log = load_contributions(env, campaign_id);
    log.push_back(entry.clone());
    env.storage().persistent().set(&key, &log);
    bump_persistent(env, &key);
}
