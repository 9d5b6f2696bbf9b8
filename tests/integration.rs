//! Integration tests exercising the exchange end to end through the public
//! API: liquidity lifecycle, routed swaps, native wrapping, valuation,
//! staking, farming, and configuration round trips.

#![allow(clippy::panic)]

use std::sync::Once;

use mars_amm::prelude::*;

const E18: u128 = 1_000_000_000_000_000_000;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once; `RUST_LOG` picks the level.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

fn tok_a() -> Address {
    Address::repeat_byte(1)
}

fn tok_b() -> Address {
    Address::repeat_byte(2)
}

fn tok_c() -> Address {
    Address::repeat_byte(3)
}

fn reward_token() -> Address {
    Address::repeat_byte(9)
}

fn owner() -> Address {
    Address::repeat_byte(0x0A)
}

fn trader() -> Address {
    Address::repeat_byte(0x7A)
}

fn at(sender: Address, now: u64) -> TxContext {
    TxContext::new(sender, Timestamp::new(now))
}

fn path(assets: &[Address]) -> Path {
    let Ok(path) = Path::new(assets.to_vec()) else {
        panic!("valid path");
    };
    path
}

fn exchange(config: ExchangeConfig) -> Exchange {
    init_tracing();
    let Ok(exchange) = Exchange::new(config) else {
        panic!("valid config");
    };
    exchange
}

/// Mints `amount` of every token to `who` and approves the router.
fn fund(exchange: &mut Exchange, who: Address, tokens: &[Address], amount: u128) {
    let router = exchange.config().router();
    for token in tokens {
        let ledger = exchange.ledger_mut();
        let Ok(()) = ledger.mint(token, &who, Amount::new(amount)) else {
            panic!("minted");
        };
        let Ok(()) = ledger.approve(token, &who, &router, Amount::MAX) else {
            panic!("approved");
        };
    }
}

fn approve_router_for_shares(exchange: &mut Exchange, who: Address, token_a: Address, token_b: Address) {
    let router = exchange.config().router();
    let Some(share) = exchange.pairs().get_pair(token_a, token_b) else {
        panic!("pair exists");
    };
    let Ok(()) = exchange.ledger_mut().approve(&share, &who, &router, Amount::MAX) else {
        panic!("approved");
    };
}

fn add(
    exchange: &mut Exchange,
    who: Address,
    token_a: Address,
    token_b: Address,
    amount_a: u128,
    amount_b: u128,
) -> Liquidity {
    let Ok((_, _, shares)) = exchange.router().add_liquidity(
        at(who, 1),
        token_a,
        token_b,
        Amount::new(amount_a),
        Amount::new(amount_b),
        Amount::ZERO,
        Amount::ZERO,
        who,
        Timestamp::MAX,
    ) else {
        panic!("liquidity added");
    };
    shares
}

/// Every pair's reserves equal the ledger balances held at its address,
/// and its share supply equals the share token's total supply.
fn assert_books_balanced(exchange: &Exchange) {
    for pair in exchange.pairs().all_pairs() {
        let key = pair.key();
        let (r0, r1) = pair.reserves();
        let ledger = exchange.ledger();
        assert_eq!(ledger.balance_of(&key.token0(), &pair.share_token()), r0);
        assert_eq!(ledger.balance_of(&key.token1(), &pair.share_token()), r1);
        assert_eq!(
            ledger.total_supply(&pair.share_token()),
            pair.total_liquidity().as_amount()
        );
    }
}

// ---------------------------------------------------------------------------
// Liquidity lifecycle
// ---------------------------------------------------------------------------

#[test]
fn first_provider_lifecycle() {
    let mut ex = exchange(ExchangeConfig::default());
    fund(&mut ex, owner(), &[tok_a(), tok_b()], 100 * E18);

    let shares = add(&mut ex, owner(), tok_a(), tok_b(), 10 * E18, 5 * E18);
    assert_eq!(shares, Liquidity::new(7_071_067_811_865_475_144));
    assert_eq!(ex.pairs().all_pairs_length(), 1);

    let Ok(value) = ex.valuator().get_liquidity_value(tok_a(), tok_b(), shares) else {
        panic!("valued");
    };
    assert_eq!(
        value,
        (
            Amount::new(9_999_999_999_999_999_858),
            Amount::new(4_999_999_999_999_999_929)
        )
    );
    let Ok(pct) = ex.valuator().get_share_of_pool(
        tok_a(),
        tok_b(),
        &owner(),
        (Amount::ZERO, Amount::ZERO),
        true,
    ) else {
        panic!("share of pool");
    };
    assert_eq!(pct, 99);

    approve_router_for_shares(&mut ex, owner(), tok_a(), tok_b());
    let Ok(paid) = ex.router().remove_liquidity(
        at(owner(), 2),
        tok_a(),
        tok_b(),
        shares,
        Amount::ZERO,
        Amount::ZERO,
        owner(),
        Timestamp::MAX,
    ) else {
        panic!("removed");
    };
    assert_eq!(paid, value);
    let Ok(pair) = ex.pairs().pair(tok_a(), tok_b()) else {
        panic!("pair exists");
    };
    assert_eq!(pair.reserves(), (Amount::new(142), Amount::new(71)));
    assert_eq!(pair.total_liquidity(), Liquidity::new(100));
    assert_books_balanced(&ex);
}

#[test]
fn protocol_fee_accrues_to_treasury() {
    let treasury = Address::repeat_byte(0x7E);
    let mut ex = exchange(ExchangeConfig::default().with_fee_to(Some(treasury)));
    fund(&mut ex, owner(), &[tok_a(), tok_b()], 10_000 * E18);
    fund(&mut ex, trader(), &[tok_b()], 10 * E18);

    let shares = add(&mut ex, owner(), tok_a(), tok_b(), 1_000 * E18, 1_000 * E18);
    let Ok(amounts) = ex.router().swap_exact_tokens_for_tokens(
        at(trader(), 2),
        Amount::new(E18),
        Amount::ZERO,
        &path(&[tok_b(), tok_a()]),
        trader(),
        Timestamp::MAX,
    ) else {
        panic!("swapped");
    };
    assert_eq!(amounts[1], Amount::new(996_006_981_039_903_216));

    approve_router_for_shares(&mut ex, owner(), tok_a(), tok_b());
    let Ok(_) = ex.router().remove_liquidity(
        at(owner(), 3),
        tok_a(),
        tok_b(),
        shares,
        Amount::ZERO,
        Amount::ZERO,
        owner(),
        Timestamp::MAX,
    ) else {
        panic!("removed");
    };
    let Some(share) = ex.pairs().get_pair(tok_a(), tok_b()) else {
        panic!("pair exists");
    };
    assert_eq!(
        ex.ledger().balance_of(&share, &treasury),
        Amount::new(249_750_499_251_388)
    );
    assert_books_balanced(&ex);
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[test]
fn multi_hop_swap_matches_quote() {
    let mut ex = exchange(ExchangeConfig::default());
    fund(&mut ex, owner(), &[tok_a(), tok_b(), tok_c()], 1_000 * E18);
    fund(&mut ex, trader(), &[tok_a()], 10 * E18);
    add(&mut ex, owner(), tok_a(), tok_b(), 100 * E18, 50 * E18);
    add(&mut ex, owner(), tok_b(), tok_c(), 50 * E18, 200 * E18);

    let route = path(&[tok_a(), tok_b(), tok_c()]);
    let Ok(quoted) = ex.quoter().get_amounts_out(Amount::new(E18), &route) else {
        panic!("quoted");
    };
    let Ok(impact) = ex.quoter().price_impact(Amount::new(E18), &route) else {
        panic!("impact");
    };
    assert!(impact <= 3);

    let Ok(executed) = ex.router().swap_exact_tokens_for_tokens(
        at(trader(), 2),
        Amount::new(E18),
        quoted[2],
        &route,
        trader(),
        Timestamp::MAX,
    ) else {
        panic!("swapped");
    };
    assert_eq!(executed, quoted);
    assert_eq!(ex.ledger().balance_of(&tok_c(), &trader()), quoted[2]);
    assert_eq!(ex.ledger().balance_of(&tok_b(), &trader()), Amount::ZERO);
    assert_books_balanced(&ex);
}

#[test]
fn rejected_swaps_leave_state_untouched() {
    let mut ex = exchange(ExchangeConfig::default());
    fund(&mut ex, owner(), &[tok_a(), tok_b()], 1_000 * E18);
    fund(&mut ex, trader(), &[tok_a()], 10 * E18);
    add(&mut ex, owner(), tok_a(), tok_b(), 100 * E18, 50 * E18);
    let before = ex.clone();

    let unregistered = ex.router().swap_exact_tokens_for_tokens(
        at(trader(), 2),
        Amount::new(E18),
        Amount::ZERO,
        &path(&[tok_a(), tok_c()]),
        trader(),
        Timestamp::MAX,
    );
    assert!(matches!(unregistered, Err(AmmError::InvalidPath(_))));

    let expired = ex.router().swap_exact_tokens_for_tokens(
        at(trader(), 20),
        Amount::new(E18),
        Amount::ZERO,
        &path(&[tok_a(), tok_b()]),
        trader(),
        Timestamp::new(10),
    );
    assert!(matches!(expired, Err(AmmError::Expired { .. })));

    let greedy = ex.router().swap_tokens_for_exact_tokens(
        at(trader(), 2),
        Amount::new(E18),
        Amount::new(E18),
        &path(&[tok_a(), tok_b()]),
        trader(),
        Timestamp::MAX,
    );
    assert!(matches!(greedy, Err(AmmError::SlippageExceeded { .. })));

    assert_eq!(ex, before);
}

#[test]
fn native_liquidity_and_swaps() {
    let mut ex = exchange(ExchangeConfig::default());
    let wrapped = ex.config().wrapped_native();
    fund(&mut ex, owner(), &[tok_a()], 100 * E18);
    for who in [owner(), trader()] {
        let Ok(()) = ex.ledger_mut().fund_native(&who, Amount::new(100 * E18)) else {
            panic!("funded");
        };
    }

    let Ok((token_in, native_in, shares)) = ex.router().add_liquidity_native(
        at(owner(), 1),
        tok_a(),
        Amount::new(10_000_000),
        Amount::ZERO,
        Amount::ZERO,
        Amount::new(50 * E18),
        owner(),
        Timestamp::MAX,
    ) else {
        panic!("added");
    };
    assert_eq!((token_in, native_in), (Amount::new(10_000_000), Amount::new(50 * E18)));
    assert_eq!(shares, Liquidity::new(22_360_679_774_897));

    let Ok(amounts) = ex.router().swap_exact_native_for_tokens(
        at(trader(), 2),
        Amount::new(E18),
        Amount::ZERO,
        &path(&[wrapped, tok_a()]),
        trader(),
        Timestamp::MAX,
    ) else {
        panic!("swapped");
    };
    assert_eq!(ex.ledger().balance_of(&tok_a(), &trader()), amounts[1]);
    assert_eq!(
        ex.ledger().balance_of(&Address::NATIVE, &trader()),
        Amount::new(99 * E18)
    );
    assert_eq!(ex.ledger().balance_of(&wrapped, &trader()), Amount::ZERO);
    assert_books_balanced(&ex);
}

// ---------------------------------------------------------------------------
// Staking and farming
// ---------------------------------------------------------------------------

fn farm_exchange() -> (Exchange, Address, Address) {
    let mut ex = exchange(ExchangeConfig::default());
    fund(&mut ex, owner(), &[tok_a(), tok_b()], 100 * E18);
    fund(&mut ex, trader(), &[tok_a(), tok_b()], 100 * E18);
    add(&mut ex, owner(), tok_a(), tok_b(), 10 * E18, 5 * E18);
    let Some(share) = ex.pairs().get_pair(tok_a(), tok_b()) else {
        panic!("pair exists");
    };
    let Ok(cfg) = StakingPoolConfig::new(
        share,
        reward_token(),
        Amount::new(10_000),
        Timestamp::new(1_000),
        Timestamp::new(1_000 + 43_200 * 30),
        Amount::ZERO,
        owner(),
    ) else {
        panic!("valid config");
    };
    let Ok(custody) = ex.deploy_pool(&cfg) else {
        panic!("deployed");
    };
    let ledger = ex.ledger_mut();
    let Ok(()) = ledger.mint(&reward_token(), &custody, Amount::new(10 * E18)) else {
        panic!("funded");
    };
    for who in [owner(), trader()] {
        let Ok(()) = ledger.approve(&share, &who, &custody, Amount::MAX) else {
            panic!("approved");
        };
    }
    (ex, share, custody)
}

#[test]
fn staking_streams_rewards_by_time() {
    let (mut ex, share, _) = farm_exchange();
    let Ok(_) = ex.stake(at(owner(), 900), share, Amount::new(E18), owner()) else {
        panic!("staked");
    };
    let Ok(pool) = ex.staking().pool(&share) else {
        panic!("pool exists");
    };
    assert_eq!(pool.phase(Timestamp::new(900)), StakingPhase::Pending);

    // nothing accrues before the window opens
    let Ok(early) = ex.pending_reward(share, &owner(), Timestamp::new(1_000)) else {
        panic!("pending");
    };
    assert_eq!(early, Amount::ZERO);

    let Ok(paid) = ex.unstake(at(owner(), 1_100), share, Amount::new(E18), owner()) else {
        panic!("unstaked");
    };
    assert_eq!(paid, Amount::new(1_000_000));
    assert_eq!(
        ex.ledger().balance_of(&reward_token(), &owner()),
        Amount::new(1_000_000)
    );
}

#[test]
fn farming_invest_then_withdraw() {
    let (mut ex, share, custody) = farm_exchange();
    approve_router_for_shares(&mut ex, trader(), tok_a(), tok_b());

    let Ok(investment) = ex.farming().invest(
        at(trader(), 1_000),
        tok_a(),
        tok_b(),
        Amount::new(5_000),
        Amount::new(5_000),
        Amount::ZERO,
        Amount::ZERO,
    ) else {
        panic!("invested");
    };
    assert_eq!(investment.shares, Liquidity::new(3_535));
    let Ok(info) = ex.farming().user_info(tok_a(), tok_b(), &trader()) else {
        panic!("user info");
    };
    assert_eq!(info.amount, Amount::new(3_535));
    assert_eq!(ex.ledger().balance_of(&share, &custody), Amount::new(3_535));

    let Ok(redemption) = ex.farming().withdraw(
        at(trader(), 1_010),
        tok_a(),
        tok_b(),
        investment.shares,
        Amount::ZERO,
        Amount::ZERO,
    ) else {
        panic!("withdrawn");
    };
    // sole staker for 10 s at 10_000 per second, less at most one unit
    assert!(redemption.reward <= Amount::new(100_000));
    assert!(redemption.reward >= Amount::new(99_999));
    assert_eq!(ex.ledger().balance_of(&share, &trader()), Amount::ZERO);
    assert_books_balanced(&ex);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn invalid_exchange_config_rejected() {
    let result = ExchangeConfig::new(
        Liquidity::new(100),
        0,
        PoolFees::STANDARD,
        ExchangeConfig::DEFAULT_WRAPPED_NATIVE,
        ExchangeConfig::DEFAULT_ROUTER,
    );
    assert!(matches!(result, Err(AmmError::InvalidConfiguration(_))));
}

#[cfg(feature = "serde")]
#[test]
fn exchange_config_json_round_trip() {
    let cfg = ExchangeConfig::default().with_fee_to(Some(Address::repeat_byte(0x7E)));
    let Ok(json) = serde_json::to_string(&cfg) else {
        panic!("serialized");
    };
    let Ok(back) = serde_json::from_str::<ExchangeConfig>(&json) else {
        panic!("deserialized");
    };
    assert_eq!(back, cfg);

    let Ok(defaulted) = serde_json::from_str::<ExchangeConfig>("{}") else {
        panic!("deserialized");
    };
    assert_eq!(defaulted, ExchangeConfig::default());
}

#[cfg(feature = "serde")]
#[test]
fn staking_config_json_round_trip() {
    let Ok(cfg) = StakingPoolConfig::new(
        Address::repeat_byte(1),
        reward_token(),
        Amount::new(10_000),
        Timestamp::new(1_000),
        Timestamp::new(2_000),
        Amount::new(5 * E18),
        owner(),
    ) else {
        panic!("valid config");
    };
    let Ok(json) = serde_json::to_string(&cfg) else {
        panic!("serialized");
    };
    let Ok(back) = serde_json::from_str::<StakingPoolConfig>(&json) else {
        panic!("deserialized");
    };
    assert_eq!(back, cfg);
}
