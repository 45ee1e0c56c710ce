#![allow(dead_code)]

extern crate std;

use crate::types::Campaign;

/// INV-1: `raised` equals the sum of all outstanding contributor balances.
pub fn assert_raised_equals_balances(campaign: &Campaign, balances: &[i128]) {
    let sum: i128 = balances.iter().sum();
    assert_eq!(
        campaign.raised, sum,
        "INV-1 violated: campaign {} raised {} but balances sum to {}",
        campaign.id, campaign.raised, sum
    );
}

/// INV-2: `contributor_count` equals the number of positive balances.
pub fn assert_contributor_count_matches(campaign: &Campaign, balances: &[i128]) {
    let positive = balances.iter().filter(|b| **b > 0).count() as u32;
    assert_eq!(
        campaign.contributor_count, positive,
        "INV-2 violated: campaign {} counts {} contributors but {} balances are positive",
        campaign.id, campaign.contributor_count, positive
    );
}

/// INV-3: campaign goal must always be positive.
pub fn assert_goal_positive(campaign: &Campaign) {
    assert!(
        campaign.goal > 0,
        "INV-3 violated: campaign {} has non-positive goal ({})",
        campaign.id,
        campaign.goal
    );
}

/// INV-4: campaign deadline must be positive.
pub fn assert_deadline_positive(campaign: &Campaign) {
    assert!(
        campaign.deadline > 0,
        "INV-4 violated: campaign {} has zero deadline",
        campaign.id
    );
}

/// INV-5: `raised` must never be negative.
pub fn assert_raised_non_negative(campaign: &Campaign) {
    assert!(
        campaign.raised >= 0,
        "INV-5 violated: campaign {} has negative raised ({})",
        campaign.id,
        campaign.raised
    );
}

/// INV-6: `goal_reached` never reverts once set.
pub fn assert_goal_reached_monotonic(before: bool, after: bool) {
    assert!(
        !(before && !after),
        "INV-6 violated: goal_reached reverted from true to false"
    );
}

/// INV-7: a withdrawn campaign reached its goal and is inactive.
pub fn assert_withdrawn_is_terminal(campaign: &Campaign) {
    if campaign.funds_withdrawn {
        assert!(
            campaign.goal_reached,
            "INV-7 violated: campaign {} withdrawn without reaching its goal",
            campaign.id
        );
        assert!(
            !campaign.is_active,
            "INV-7 violated: campaign {} withdrawn but still active",
            campaign.id
        );
    }
}

/// INV-8: campaign IDs are sequential starting from 0.
pub fn assert_sequential_ids(campaigns: &[Campaign]) {
    for (i, campaign) in campaigns.iter().enumerate() {
        assert_eq!(
            campaign.id, i as u64,
            "INV-8 violated: expected id {}, got {}",
            i, campaign.id
        );
    }
}

/// INV-9: fields fixed at creation (creator, title, description, goal,
/// deadline) never change afterwards.
pub fn assert_immutable_fields(original: &Campaign, current: &Campaign) {
    assert_eq!(
        original.id, current.id,
        "INV-9 violated: campaign id changed"
    );
    assert_eq!(
        original.creator, current.creator,
        "INV-9 violated: campaign creator changed"
    );
    assert_eq!(
        original.title, current.title,
        "INV-9 violated: campaign title changed"
    );
    assert_eq!(
        original.description, current.description,
        "INV-9 violated: campaign description changed"
    );
    assert_eq!(
        original.goal, current.goal,
        "INV-9 violated: campaign goal changed"
    );
    assert_eq!(
        original.deadline, current.deadline,
        "INV-9 violated: campaign deadline changed"
    );
}

/// Run all single-campaign invariants that need no external data.
pub fn assert_all_campaign_invariants(campaign: &Campaign) {
    assert_goal_positive(campaign);
    assert_deadline_positive(campaign);
    assert_raised_non_negative(campaign);
    assert_withdrawn_is_terminal(campaign);
}
