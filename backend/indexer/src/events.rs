//! Canonical event types emitted by the crowdfund contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/crowdfund/src/events.rs`. Campaign-scoped events carry the
//! campaign id as their second topic; protocol-scoped admin events carry a
//! bare symbol topic and no campaign id.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the crowdfund contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new campaign was opened (`created` topic).
    CampaignCreated,
    /// A backer contributed to a campaign (`contrib` topic).
    ContributionReceived,
    /// A campaign's running total crossed its goal (`funded` topic).
    GoalReached,
    /// The creator withdrew a successful campaign's funds (`withdrawn` topic).
    FundsWithdrawn,
    /// A backer reclaimed their contribution (`refunded` topic).
    RefundIssued,
    /// The creator closed an untouched campaign (`cancelled` topic).
    CampaignCancelled,
    /// The admin changed the protocol fee (`fee_set` topic).
    FeeUpdated,
    /// The admin role moved to a new address (`admin_set` topic).
    AdminChanged,
    /// The admin recovered stray token balance (`swept` topic).
    SurplusSwept,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::CampaignCreated,
            "contrib" => Self::ContributionReceived,
            "funded" => Self::GoalReached,
            "withdrawn" => Self::FundsWithdrawn,
            "refunded" => Self::RefundIssued,
            "cancelled" => Self::CampaignCancelled,
            "fee_set" => Self::FeeUpdated,
            "admin_set" => Self::AdminChanged,
            "swept" => Self::SurplusSwept,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignCreated => "campaign_created",
            Self::ContributionReceived => "contribution_received",
            Self::GoalReached => "goal_reached",
            Self::FundsWithdrawn => "funds_withdrawn",
            Self::RefundIssued => "refund_issued",
            Self::CampaignCancelled => "campaign_cancelled",
            Self::FeeUpdated => "fee_updated",
            Self::AdminChanged => "admin_changed",
            Self::SurplusSwept => "surplus_swept",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded crowdfund event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrowdfundEvent {
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub campaign_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
