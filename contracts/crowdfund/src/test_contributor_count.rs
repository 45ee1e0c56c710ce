extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env, String,
};

use crate::invariants;
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
fn test_contributor_count_starts_at_zero() {
    let (env, client, _token, _admin) = setup_with_init();
    let creator = Address::generate(&env);

    let id = create_campaign_with_goal(&env, &client, &creator, 10_000);

    assert_eq!(client.get_campaign(&id).contributor_count, 0);
}

#[test]
fn test_new_contributor_increments_count() {
    let (env, client, token, _admin) = setup_with_init();
    let creator = Address::generate(&env);
    let alice = Address::generate(&env);

    let id = create_campaign_with_goal(&env, &client, &creator, 10_000);
    mint(&env, &token, &alice, 1_000);
    client.contribute(&id, &alice, &1_000i128);

    assert_eq!(client.get_campaign(&id).contributor_count, 1);
}

#[test]
fn test_repeat_contributor_counted_once() {
    let (env, client, token, _admin) = setup_with_init();
    let creator = Address::generate(&env);
    let alice = Address::generate(&env);

    let id = create_campaign_with_goal(&env, &client, &creator, 10_000);
    mint(&env, &token, &alice, 3_000);

    client.contribute(&id, &alice, &1_000i128);
    client.contribute(&id, &alice, &1_000i128);
    client.contribute(&id, &alice, &1_000i128);

    let campaign = client.get_campaign(&id);
    assert_eq!(campaign.contributor_count, 1);
    // The balance still accumulates across repeat contributions.
    assert_eq!(client.get_contribution(&id, &alice), 3_000);
    assert_eq!(campaign.raised, 3_000);
}

#[test]
fn test_distinct_contributors_each_counted() {
    let (env, client, token, _admin) = setup_with_init();
    let creator = Address::generate(&env);
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);
    let carol = Address::generate(&env);

    let id = create_campaign_with_goal(&env, &client, &creator, 100_000);
    mint(&env, &token, &alice, 1_000);
    mint(&env, &token, &bob, 2_000);
    mint(&env, &token, &carol, 3_000);

    client.contribute(&id, &alice, &1_000i128);
    assert_eq!(client.get_campaign(&id).contributor_count, 1);

    client.contribute(&id, &bob, &2_000i128);
    assert_eq!(client.get_campaign(&id).contributor_count, 2);

    client.contribute(&id, &carol, &3_000i128);
    assert_eq!(client.get_campaign(&id).contributor_count, 3);
}

#[test]
fn test_count_is_per_campaign() {
    let (env, client, token, _admin) = setup_with_init();
    let creator = Address::generate(&env);
    let alice = Address::generate(&env);

    let first = create_campaign_with_goal(&env, &client, &creator, 10_000);
    let second = create_campaign_with_goal(&env, &client, &creator, 10_000);
    mint(&env, &token, &alice, 2_000);

    client.contribute(&first, &alice, &1_000i128);

    assert_eq!(client.get_campaign(&first).contributor_count, 1);
    assert_eq!(client.get_campaign(&second).contributor_count, 0);

    // The same backer counts once per campaign, not once globally.
    client.contribute(&second, &alice, &1_000i128);
    assert_eq!(client.get_campaign(&second).contributor_count, 1);
}

#[test]
fn test_refund_decrements_count() {
    let (env, client, token, _admin) = setup_with_init();
    let creator = Address::generate(&env);
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);

    let id = create_campaign_with_goal(&env, &client, &creator, 100_000);
    mint(&env, &token, &alice, 1_000);
    mint(&env, &token, &bob, 2_000);
    client.contribute(&id, &alice, &1_000i128);
    client.contribute(&id, &bob, &2_000i128);
    assert_eq!(client.get_campaign(&id).contributor_count, 2);

    let deadline = client.get_campaign(&id).deadline;
    env.ledger().with_mut(|li| li.timestamp = deadline + 1);

    client.request_refund(&id, &alice);

    let campaign = client.get_campaign(&id);
    assert_eq!(campaign.contributor_count, 1);
    // Bob's position is untouched by Alice leaving.
    assert_eq!(client.get_contribution(&id, &bob), 2_000);
    assert_eq!(campaign.raised, 2_000);
}

#[test]
fn test_count_through_full_refund_cycle() {
    let (env, client, token, _admin) = setup_with_init();
    let creator = Address::generate(&env);
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);
    let carol = Address::generate(&env);

    let id = create_campaign_with_goal(&env, &client, &creator, 100_000);
    mint(&env, &token, &alice, 1_500);
    mint(&env, &token, &bob, 2_000);
    mint(&env, &token, &carol, 3_000);

    client.contribute(&id, &alice, &1_000i128);
    client.contribute(&id, &bob, &2_000i128);
    client.contribute(&id, &carol, &3_000i128);
    // A repeat from Alice must not bump the count again.
    client.contribute(&id, &alice, &500i128);

    let campaign = client.get_campaign(&id);
    assert_eq!(campaign.contributor_count, 3);
    invariants::assert_contributor_count_matches(&campaign, &[1_500, 2_000, 3_000]);

    let deadline = campaign.deadline;
    env.ledger().with_mut(|li| li.timestamp = deadline + 1);

    client.request_refund(&id, &bob);
    let campaign = client.get_campaign(&id);
    assert_eq!(campaign.contributor_count, 2);
    invariants::assert_contributor_count_matches(&campaign, &[1_500, 0, 3_000]);

    client.request_refund(&id, &alice);
    let campaign = client.get_campaign(&id);
    assert_eq!(campaign.contributor_count, 1);
    invariants::assert_contributor_count_matches(&campaign, &[0, 0, 3_000]);

    client.request_refund(&id, &carol);
    let campaign = client.get_campaign(&id);
    assert_eq!(campaign.contributor_count, 0);
    assert_eq!(campaign.raised, 0);
    invariants::assert_contributor_count_matches(&campaign, &[0, 0, 0]);

    // Everyone got their money back.
    assert_eq!(token.balance(&alice), 1_500);
    assert_eq!(token.balance(&bob), 2_000);
    assert_eq!(token.balance(&carol), 3_000);
    assert_eq!(token.balance(&client.address), 0);
}
