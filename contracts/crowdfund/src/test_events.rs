extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    token, vec, Address, Env, IntoVal, String, TryIntoVal,
};

use crate::events::{
    AdminChanged, CampaignCancelled, CampaignCreated, ContributionReceived, FeeUpdated,
    FundsWithdrawn, GoalReached, RefundIssued, SurplusSwept,
};
use crate::{CrowdfundProtocol, CrowdfundProtocolClient};

fn setup() -> (Env, CrowdfundProtocolClient<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(CrowdfundProtocol, ());
    let client = CrowdfundProtocolClient::new(&env, &contract_id);
    (env, client)
}

fn create_token<'a>(env: &Env, admin: &Address) -> token::Client<'a> {
    let addr = env.register_stellar_asset_contract_v2(admin.clone());
    token::Client::new(env, &addr.address())
}

fn setup_with_init() -> (Env, CrowdfundProtocolClient<'static>, token::Client<'static>, Address) {
    let (env, client) = setup();
    let admin = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let token = create_token(&env, &token_admin);
    client.initialize(&admin, &token.address);
    (env, client, token, admin)
}

fn mint(env: &Env, token: &token::Client, to: &Address, amount: i128) {
    token::StellarAssetClient::new(env, &token.address).mint(to, &amount);
}

fn create_campaign_with_goal(
    env: &Env,
    client: &CrowdfundProtocolClient<'static>,
    creator: &Address,
    goal: i128,
) -> u64 {
    client.create_campaign(
        creator,
        &String::from_str(env, "Community Solar Array"),
        &String::from_str(env, "Panels and a battery bank for the town hall roof"),
        &goal,
        &30u32,
    )
}

#[test]
fn test_campaign_created_event() {
    let (env, client, _token, _admin) = setup_with_init();
    let creator = Address::generate(&env);

    let id = create_campaign_with_goal(&env, &client, &creator, 10_000);
    let deadline = env.ledger().timestamp() + 30 * 86_400;

    let all_events = env.events().all();
    assert_eq!(all_events.len(), 1);
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("created"), campaign_id)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    // Data: CampaignCreated struct
    let event_data: CampaignCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CampaignCreated {
            campaign_id: id,
            creator: creator.clone(),
            goal: 10_000,
            deadline,
        }
    );
}

#[test]
fn test_contribution_event_carries_running_total() {
    let (env, client, token, _admin) = setup_with_init();
    let creator = Address::generate(&env);
    let alice = Address::generate(&env);

    let id = create_campaign_with_goal(&env, &client, &creator, 10_000);
    mint(&env, &token, &alice, 5_000);

    client.contribute(&id, &alice, &2_000i128);

    // The token's own transfer event precedes ours in the invocation, so
    // only the tail of the list belongs to this contract.
    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("contrib").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ContributionReceived = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ContributionReceived {
            campaign_id: id,
            contributor: alice.clone(),
            amount: 2_000,
            total_raised: 2_000,
        }
    );

    // The running total advances with each contribution.
    client.contribute(&id, &alice, &1_000i128);
    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let event_data: ContributionReceived = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(event_data.total_raised, 3_000);
}

#[test]
fn test_goal_reached_event_emitted_once() {
    let (env, client, token, _admin) = setup_with_init();
    let creator = Address::generate(&env);
    let alice = Address::generate(&env);

    let id = create_campaign_with_goal(&env, &client, &creator, 5_000);
    mint(&env, &token, &alice, 10_000);

    // The crossing contribution publishes `funded` immediately before the
    // closing `contrib`.
    client.contribute(&id, &alice, &5_000i128);

    let all_events = env.events().all();
    let funded_topics = vec![
        &env,
        symbol_short!("funded").into_val(&env),
        id.into_val(&env),
    ];

    let funded = all_events
        .get(all_events.len() - 2)
        .expect("No events found");
    assert_eq!(funded.0, client.address);
    assert_eq!(funded.1, funded_topics);
    let event_data: GoalReached = funded.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        GoalReached {
            campaign_id: id,
            raised: 5_000,
        }
    );

    let contrib = all_events.last().expect("No events found");
    let event_data: ContributionReceived = contrib.2.try_into_val(&env).unwrap();
    assert_eq!(event_data.total_raised, 5_000);

    // Contributions past the goal never re-fire `funded`.
    client.contribute(&id, &alice, &1_000i128);
    let all_events = env.events().all();
    let refired = all_events.iter().filter(|e| e.1 == funded_topics).count();
    assert_eq!(refired, 0);

    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("contrib").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);
}

#[test]
fn test_funds_withdrawn_event() {
    let (env, client, token, _admin) = setup_with_init();
    let creator = Address::generate(&env);
    let alice = Address::generate(&env);

    let id = create_campaign_with_goal(&env, &client, &creator, 10_000);
    mint(&env, &token, &alice, 10_000);
    client.contribute(&id, &alice, &10_000i128);

    client.withdraw_funds(&id, &creator);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("withdrawn").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: FundsWithdrawn = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        FundsWithdrawn {
            campaign_id: id,
            creator_amount: 9_750,
            fee_amount: 250,
        }
    );
}

#[test]
fn test_refund_issued_event() {
    let (env, client, token, _admin) = setup_with_init();
    let creator = Address::generate(&env);
    let alice = Address::generate(&env);

    let id = create_campaign_with_goal(&env, &client, &creator, 10_000);
    mint(&env, &token, &alice, 4_000);
    client.contribute(&id, &alice, &4_000i128);

    let deadline = client.get_campaign(&id).deadline;
    env.ledger().with_mut(|li| li.timestamp = deadline + 1);
    client.request_refund(&id, &alice);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &env,
        symbol_short!("refunded").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: RefundIssued = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        RefundIssued {
            campaign_id: id,
            contributor: alice.clone(),
            amount: 4_000,
        }
    );
}

#[test]
fn test_campaign_cancelled_event() {
    let (env, client, _token, _admin) = setup_with_init();
    let creator = Address::generate(&env);

    let id = create_campaign_with_goal(&env, &client, &creator, 10_000);
    client.cancel_campaign(&id, &creator);

    let all_events = env.events().all();
    assert_eq!(all_events.len(), 1);
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &env,
        symbol_short!("cancelled").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: CampaignCancelled = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CampaignCancelled {
            campaign_id: id,
            creator: creator.clone(),
        }
    );
}

#[test]
fn test_fee_updated_event() {
    let (env, client, _token, _admin) = setup_with_init();

    client.set_fee_bps(&500u32);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Protocol-scoped topic: no campaign id.
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![&env, symbol_short!("fee_set").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: FeeUpdated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        FeeUpdated {
            old_bps: 250,
            new_bps: 500,
        }
    );
}

#[test]
fn test_admin_changed_event() {
    let (env, client, _token, admin) = setup_with_init();
    let successor = Address::generate(&env);

    client.transfer_admin(&successor);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![&env, symbol_short!("admin_set").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: AdminChanged = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        AdminChanged {
            old_admin: admin.clone(),
            new_admin: successor.clone(),
        }
    );
}

#[test]
fn test_surplus_swept_event() {
    let (env, client, token, admin) = setup_with_init();
    let mallory = Address::generate(&env);

    // Stray value sent around the contribute entry point.
    mint(&env, &token, &mallory, 750);
    token.transfer(&mallory, &client.address, &750i128);

    client.emergency_sweep();

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![&env, symbol_short!("swept").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: SurplusSwept = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        SurplusSwept {
            admin: admin.clone(),
            amount: 750,
        }
    );
}
