//! # Crowdfund Protocol Contract
//!
//! Root crate of the **Crowdfund Protocol**: an all-or-nothing crowdfunding
//! escrow on Soroban. It exposes the single contract [`CrowdfundProtocol`]
//! whose entry points cover the full campaign lifecycle:
//!
//! | Phase      | Entry Point(s)                                      |
//! |------------|-----------------------------------------------------|
//! | Bootstrap  | [`CrowdfundProtocol::initialize`]                   |
//! | Creation   | [`CrowdfundProtocol::create_campaign`]              |
//! | Funding    | [`CrowdfundProtocol::contribute`]                   |
//! | Settlement | [`CrowdfundProtocol::withdraw_funds`], [`CrowdfundProtocol::request_refund`], [`CrowdfundProtocol::cancel_campaign`] |
//! | Admin      | `set_fee_bps`, `transfer_admin`, `emergency_sweep`  |
//! | Queries    | `get_campaign`, `get_contribution`, `get_contributions`, `is_deadline_passed`, `active_campaign_count` |
//!
//! ## Architecture
//!
//! Storage access is fully delegated to [`storage`]; event payloads and
//! emission to [`events`]. This file contains only the public entry points,
//! their precondition checks, and the fee arithmetic.
//!
//! All campaigns settle in a single funding token fixed at initialization.
//! An entry point either completes in full or returns an [`Error`] with every
//! storage write of the invocation rolled back by the host. Outbound token
//! transfers are issued only after campaign state has been persisted in its
//! final post-operation form, so a refused transfer can never leave a
//! half-settled campaign behind.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, token, Address, Env, String, Vec};

mod events;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_contributor_count;
#[cfg(test)]
mod test_events;

use events::{
    emit_admin_changed, emit_campaign_cancelled, emit_campaign_created,
    emit_contribution_received, emit_fee_updated, emit_funds_withdrawn, emit_goal_reached,
    emit_refund_issued, emit_surplus_swept, AdminChanged, CampaignCancelled, CampaignCreated,
    ContributionReceived, FeeUpdated, FundsWithdrawn, GoalReached, RefundIssued, SurplusSwept,
};
use storage::{
    get_and_increment_campaign_id, get_balance, has_admin, load_campaign, load_campaign_config,
    load_campaign_state, load_contributions, push_contribution, save_campaign,
    save_campaign_state, set_admin, set_balance, set_token,
};
pub use types::{Campaign, Contribution};

/// Fee charged on successful withdrawals until the admin sets another rate,
/// in basis points.
pub const DEFAULT_FEE_BPS: u32 = 250;

/// Hard ceiling for the configurable fee (10%).
pub const MAX_FEE_BPS: u32 = 1_000;

/// Basis points denominator.
pub const BPS_DENOMINATOR: i128 = 10_000;

/// Campaign durations are quoted in whole days.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Longest accepted campaign duration.
pub const MAX_DURATION_DAYS: u32 = 365;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized   = 1,
    InvalidInput         = 2,
    CampaignNotFound     = 3,
    InactiveCampaign     = 4,
    DeadlineExpired      = 5,
    SelfFundingForbidden = 6,
    Unauthorized         = 7,
    GoalNotReached       = 8,
    AlreadyWithdrawn     = 9,
    NothingToWithdraw    = 10,
    CampaignStillActive  = 11,
    CampaignSucceeded    = 12,
    NoContributionFound  = 13,
    AlreadyInactive      = 14,
    HasContributions     = 15,
    TransferFailed       = 16,
    NothingToSweep       = 17,
}

#[contract]
pub struct CrowdfundProtocol;

#[contractimpl]
impl CrowdfundProtocol {
    // ─────────────────────────────────────────────────────────
    // Initialization
    // ─────────────────────────────────────────────────────────

    /// Initialize the contract: set the admin and the funding token.
    ///
    /// Must be called exactly once after deployment; a second call fails with
    /// `Error::AlreadyInitialized`. The fee starts at [`DEFAULT_FEE_BPS`].
    ///
    /// - `admin` collects fees and operates `set_fee_bps`, `transfer_admin`
    ///   and `emergency_sweep`; must sign.
    /// - `token` is the sole asset every campaign settles in.
    pub fn initialize(env: Env, admin: Address, token: Address) -> Result<(), Error> {
        admin.require_auth();
        if has_admin(&env) {
            return Err(Error::AlreadyInitialized);
        }
        set_admin(&env, &admin);
        set_token(&env, &token);
        storage::set_fee_bps(&env, DEFAULT_FEE_BPS);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Campaign creation
    // ─────────────────────────────────────────────────────────

    /// Register a new campaign and return its ID.
    ///
    /// - `creator` must sign and becomes the only address able to withdraw
    ///   or cancel.
    /// - `title` and `description` must be non-empty.
    /// - `goal` is in the funding token's smallest unit and must be positive.
    /// - `duration_days` is `1..=365`; the deadline is `now + days * 86_400`.
    ///
    /// Any violation fails with `Error::InvalidInput` and writes nothing.
    pub fn create_campaign(
        env: Env,
        creator: Address,
        title: String,
        description: String,
        goal: i128,
        duration_days: u32,
    ) -> Result<u64, Error> {
        creator.require_auth();

        if title.is_empty() || description.is_empty() {
            return Err(Error::InvalidInput);
        }
        if goal <= 0 {
            return Err(Error::InvalidInput);
        }
        if duration_days == 0 || duration_days > MAX_DURATION_DAYS {
            return Err(Error::InvalidInput);
        }

        let id = get_and_increment_campaign_id(&env);
        let deadline = env.ledger().timestamp() + u64::from(duration_days) * SECONDS_PER_DAY;

        let campaign = Campaign {
            id,
            creator: creator.clone(),
            title,
            description,
            goal,
            raised: 0,
            deadline,
            is_active: true,
            goal_reached: false,
            funds_withdrawn: false,
            contributor_count: 0,
        };
        save_campaign(&env, &campaign);

        emit_campaign_created(
            &env,
            CampaignCreated {
                campaign_id: id,
                creator,
                goal,
                deadline,
            },
        );
        Ok(id)
    }

    // ─────────────────────────────────────────────────────────
    // Funding
    // ─────────────────────────────────────────────────────────

    /// Contribute `amount` of the funding token to a campaign.
    ///
    /// Checks run in a fixed order so callers get a deterministic error:
    /// existence, activity, deadline, amount, self-funding. The tokens move
    /// from `contributor` to the contract within the same invocation, so a
    /// failed transfer aborts the whole call.
    ///
    /// Repeat contributions accumulate into one running balance per address;
    /// `contributor_count` tracks distinct addresses currently in the pot.
    /// Crossing the goal for the first time latches `goal_reached` and emits
    /// `funded` in addition to the usual `contrib`.
    ///
    /// Returns the campaign's new `raised` total.
    pub fn contribute(
        env: Env,
        campaign_id: u64,
        contributor: Address,
        amount: i128,
    ) -> Result<i128, Error> {
        contributor.require_auth();

        let config = load_campaign_config(&env, campaign_id)?;
        let mut state = load_campaign_state(&env, campaign_id)?;

        if !state.is_active {
            return Err(Error::InactiveCampaign);
        }
        let now = env.ledger().timestamp();
        if now >= config.deadline {
            return Err(Error::DeadlineExpired);
        }
        if amount <= 0 {
            return Err(Error::InvalidInput);
        }
        if contributor == config.creator {
            return Err(Error::SelfFundingForbidden);
        }

        // Pull the funds in before touching the ledger; a failed transfer
        // traps and the host discards the invocation.
        let token_client = token::Client::new(&env, &storage::get_token(&env));
        token_client.transfer(&contributor, &env.current_contract_address(), &amount);

        let prior = get_balance(&env, campaign_id, &contributor);
        if prior == 0 {
            state.contributor_count += 1;
        }
        set_balance(&env, campaign_id, &contributor, prior + amount);

        state.raised += amount;
        let crossed_goal = !state.goal_reached && state.raised >= config.goal;
        if crossed_goal {
            state.goal_reached = true;
        }
        save_campaign_state(&env, campaign_id, &state);

        push_contribution(
            &env,
            campaign_id,
            &Contribution {
                contributor: contributor.clone(),
                amount,
                timestamp: now,
            },
        );

        if crossed_goal {
            emit_goal_reached(
                &env,
                GoalReached {
                    campaign_id,
                    raised: state.raised,
                },
            );
        }
        emit_contribution_received(
            &env,
            ContributionReceived {
                campaign_id,
                contributor,
                amount,
                total_raised: state.raised,
            },
        );
        Ok(state.raised)
    }

    // ─────────────────────────────────────────────────────────
    // Settlement
    // ─────────────────────────────────────────────────────────

    /// Withdraw a successful campaign's funds, split between creator and fee.
    ///
    /// - Only the creator may call; anyone else gets `Error::Unauthorized`.
    /// - The goal must have been reached (`Error::GoalNotReached`) and the
    ///   funds not yet taken (`Error::AlreadyWithdrawn`).
    ///
    /// The fee is `raised * fee_bps / 10_000`, rounded down, at the rate in
    /// force now, not the rate at creation or contribution time. State is
    /// persisted (withdrawn, inactive) before either payout; if a payout is
    /// refused the call returns `Error::TransferFailed` and the host rolls
    /// the state back.
    ///
    /// Returns `(creator_amount, fee_amount)`.
    pub fn withdraw_funds(
        env: Env,
        campaign_id: u64,
        requester: Address,
    ) -> Result<(i128, i128), Error> {
        requester.require_auth();

        let config = load_campaign_config(&env, campaign_id)?;
        let mut state = load_campaign_state(&env, campaign_id)?;

        if requester != config.creator {
            return Err(Error::Unauthorized);
        }
        if !state.goal_reached {
            return Err(Error::GoalNotReached);
        }
        if state.funds_withdrawn {
            return Err(Error::AlreadyWithdrawn);
        }
        if state.raised == 0 {
            return Err(Error::NothingToWithdraw);
        }

        let raised = state.raised;
        let fee_bps = storage::get_fee_bps(&env);
        let fee_amount = raised * i128::from(fee_bps) / BPS_DENOMINATOR;
        let creator_amount = raised - fee_amount;

        // Effects before interactions: the terminal state is on the ledger
        // before any token leaves the contract.
        state.funds_withdrawn = true;
        state.is_active = false;
        save_campaign_state(&env, campaign_id, &state);

        let token_client = token::Client::new(&env, &storage::get_token(&env));
        let contract = env.current_contract_address();
        if token_client.try_transfer(&contract, &config.creator, &creator_amount).is_err() {
            return Err(Error::TransferFailed);
        }
        if fee_amount > 0 {
            let admin = storage::get_admin(&env);
            if token_client.try_transfer(&contract, &admin, &fee_amount).is_err() {
                return Err(Error::TransferFailed);
            }
        }

        emit_funds_withdrawn(
            &env,
            FundsWithdrawn {
                campaign_id,
                creator_amount,
                fee_amount,
            },
        );
        Ok((creator_amount, fee_amount))
    }

    /// Return a contributor's entire balance from a failed campaign.
    ///
    /// Refunds open once the deadline passes without the goal, or as soon as
    /// the campaign is deactivated. While neither holds the call fails with
    /// `Error::CampaignStillActive`; once the goal has latched it fails with
    /// `Error::CampaignSucceeded` forever. Refunds are all-or-nothing per
    /// contributor and drop the contributor from `contributor_count`; the
    /// contribution history keeps its entries.
    ///
    /// Returns the refunded amount.
    pub fn request_refund(env: Env, campaign_id: u64, requester: Address) -> Result<i128, Error> {
        requester.require_auth();

        let config = load_campaign_config(&env, campaign_id)?;
        let mut state = load_campaign_state(&env, campaign_id)?;

        let now = env.ledger().timestamp();
        if state.is_active && now <= config.deadline {
            return Err(Error::CampaignStillActive);
        }
        if state.goal_reached {
            return Err(Error::CampaignSucceeded);
        }
        if state.funds_withdrawn {
            return Err(Error::AlreadyWithdrawn);
        }

        let balance = get_balance(&env, campaign_id, &requester);
        if balance == 0 {
            return Err(Error::NoContributionFound);
        }

        set_balance(&env, campaign_id, &requester, 0);
        state.raised -= balance;
        state.contributor_count -= 1;
        save_campaign_state(&env, campaign_id, &state);

        let token_client = token::Client::new(&env, &storage::get_token(&env));
        let contract = env.current_contract_address();
        if token_client.try_transfer(&contract, &requester, &balance).is_err() {
            return Err(Error::TransferFailed);
        }

        emit_refund_issued(
            &env,
            RefundIssued {
                campaign_id,
                contributor: requester,
                amount: balance,
            },
        );
        Ok(balance)
    }

    /// Close an untouched campaign, locking out further contributions.
    ///
    /// - Only the creator may cancel (`Error::Unauthorized`).
    /// - Fails `Error::AlreadyInactive` if already withdrawn or cancelled.
    /// - Fails `Error::HasContributions` while any contribution is
    ///   outstanding; contributors must be refunded out first, which can
    ///   only happen after the deadline.
    pub fn cancel_campaign(env: Env, campaign_id: u64, requester: Address) -> Result<(), Error> {
        requester.require_auth();

        let config = load_campaign_config(&env, campaign_id)?;
        let mut state = load_campaign_state(&env, campaign_id)?;

        if requester != config.creator {
            return Err(Error::Unauthorized);
        }
        if !state.is_active {
            return Err(Error::AlreadyInactive);
        }
        if state.raised != 0 {
            return Err(Error::HasContributions);
        }

        state.is_active = false;
        save_campaign_state(&env, campaign_id, &state);

        emit_campaign_cancelled(
            &env,
            CampaignCancelled {
                campaign_id,
                creator: config.creator,
            },
        );
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Protocol administration
    // ─────────────────────────────────────────────────────────

    /// Set the platform fee rate in basis points.
    ///
    /// Admin-only. Rates above [`MAX_FEE_BPS`] fail `Error::InvalidInput`.
    /// The new rate applies to withdrawals from now on, including campaigns
    /// funded entirely under the old rate.
    pub fn set_fee_bps(env: Env, new_bps: u32) -> Result<(), Error> {
        let admin = storage::get_admin(&env);
        admin.require_auth();

        if new_bps > MAX_FEE_BPS {
            return Err(Error::InvalidInput);
        }

        let old_bps = storage::get_fee_bps(&env);
        storage::set_fee_bps(&env, new_bps);

        emit_fee_updated(&env, FeeUpdated { old_bps, new_bps });
        Ok(())
    }

    /// Hand protocol administration (and future fees) to `new_admin`.
    ///
    /// The current admin must sign; takes effect immediately.
    pub fn transfer_admin(env: Env, new_admin: Address) {
        let old_admin = storage::get_admin(&env);
        old_admin.require_auth();

        set_admin(&env, &new_admin);

        emit_admin_changed(
            &env,
            AdminChanged {
                old_admin,
                new_admin,
            },
        );
    }

    /// Sweep token balance the campaign ledger does not account for.
    ///
    /// Tokens sent straight to the contract address bypass every campaign
    /// and nothing in the ledger will ever pay them out. This entry point
    /// moves exactly that surplus (held balance minus the `raised` of every
    /// not-yet-withdrawn campaign) to the admin; campaign funds themselves
    /// are never sweepable. With no surplus the call fails with
    /// `Error::NothingToSweep`.
    pub fn emergency_sweep(env: Env) -> Result<i128, Error> {
        let admin = storage::get_admin(&env);
        admin.require_auth();

        let token_client = token::Client::new(&env, &storage::get_token(&env));
        let contract = env.current_contract_address();
        let held = token_client.balance(&contract);

        let mut accounted: i128 = 0;
        for id in 0..storage::get_campaign_count(&env) {
            let state = load_campaign_state(&env, id)?;
            if !state.funds_withdrawn {
                accounted += state.raised;
            }
        }

        let surplus = held - accounted;
        if surplus <= 0 {
            return Err(Error::NothingToSweep);
        }

        if token_client.try_transfer(&contract, &admin, &surplus).is_err() {
            return Err(Error::TransferFailed);
        }

        emit_surplus_swept(
            &env,
            SurplusSwept {
                admin,
                amount: surplus,
            },
        );
        Ok(surplus)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Retrieve a campaign by ID.
    pub fn get_campaign(env: Env, campaign_id: u64) -> Result<Campaign, Error> {
        load_campaign(&env, campaign_id)
    }

    /// A contributor's current refundable balance; 0 for strangers and
    /// unknown campaigns.
    pub fn get_contribution(env: Env, campaign_id: u64, contributor: Address) -> i128 {
        get_balance(&env, campaign_id, &contributor)
    }

    /// Full contribution history of a campaign, oldest first.
    pub fn get_contributions(env: Env, campaign_id: u64) -> Result<Vec<Contribution>, Error> {
        load_campaign_config(&env, campaign_id)?;
        Ok(load_contributions(&env, campaign_id))
    }

    /// Whether the campaign's funding window has closed.
    pub fn is_deadline_passed(env: Env, campaign_id: u64) -> Result<bool, Error> {
        let config = load_campaign_config(&env, campaign_id)?;
        Ok(env.ledger().timestamp() > config.deadline)
    }

    /// Number of campaigns still accepting contributions.
    pub fn active_campaign_count(env: Env) -> u32 {
        let now = env.ledger().timestamp();
        let mut active = 0u32;
        for id in 0..storage::get_campaign_count(&env) {
            if let (Ok(config), Ok(state)) =
                (load_campaign_config(&env, id), load_campaign_state(&env, id))
            {
                if state.is_active && now < config.deadline {
                    active += 1;
                }
            }
        }
        active
    }

    /// Current platform fee in basis points.
    pub fn get_fee_bps(env: Env) -> u32 {
        storage::get_fee_bps(&env)
    }

    /// Current protocol admin.
    pub fn get_admin(env: Env) -> Address {
        storage::get_admin(&env)
    }

    /// The funding token all campaigns settle in.
    pub fn get_token(env: Env) -> Address {
        storage::get_token(&env)
    }

    /// Total number of campaigns ever created.
    pub fn get_campaign_count(env: Env) -> u64 {
        storage::get_campaign_count(&env)
    }
}
