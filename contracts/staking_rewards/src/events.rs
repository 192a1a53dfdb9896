#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub governor: Address,
    pub staking_token: Address,
    pub reward_token: Address,
    pub timestamp: u64,
}

/// Fired when a participant deposits stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub timestamp: u64,
}

/// Fired when a participant withdraws their full stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when accrued rewards are paid out to a participant.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPaidEvent {
    pub staker: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when the distributor funds a reward window.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardAddedEvent {
    pub reward: i128,
    pub window_finish: u64,
    pub timestamp: u64,
}

/// Fired when the governor assigns the reward distributor role.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardDistributionSetEvent {
    pub distributor: Address,
    pub timestamp: u64,
}

/// Fired when a governor transfer is proposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GovernorProposedEvent {
    pub current_governor: Address,
    pub proposed_governor: Address,
    pub timestamp: u64,
}

/// Fired when a governor transfer is accepted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GovernorAcceptedEvent {
    pub old_governor: Address,
    pub new_governor: Address,
    pub timestamp: u64,
}

/// Fired when a pending governor transfer is cancelled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GovernorCancelledEvent {
    pub governor: Address,
    pub cancelled_proposed: Address,
    pub timestamp: u64,
}

/// Fired when the governor rescues stray funds held by the contract.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsRescuedEvent {
    pub token: Address,
    pub recipient: Address,
    pub amount: i128,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    governor: Address,
    staking_token: Address,
    reward_token: Address,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            governor,
            staking_token,
            reward_token,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(env: &Env, staker: Address, amount: i128, new_total_staked: i128) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            new_total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_paid(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RWD_PAID"), staker.clone()),
        RewardPaidEvent {
            staker,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_added(env: &Env, reward: i128, window_finish: u64) {
    env.events().publish(
        (symbol_short!("RWD_ADDED"),),
        RewardAddedEvent {
            reward,
            window_finish,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_distribution_set(env: &Env, distributor: Address) {
    env.events().publish(
        (symbol_short!("DIST_SET"),),
        RewardDistributionSetEvent {
            distributor,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_governor_proposed(env: &Env, current_governor: Address, proposed_governor: Address) {
    env.events().publish(
        (symbol_short!("GOV_PROP"), current_governor.clone()),
        GovernorProposedEvent {
            current_governor,
            proposed_governor,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_governor_accepted(env: &Env, old_governor: Address, new_governor: Address) {
    env.events().publish(
        (symbol_short!("GOV_ACPT"), new_governor.clone()),
        GovernorAcceptedEvent {
            old_governor,
            new_governor,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_governor_cancelled(env: &Env, governor: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("GOV_CNCL"), governor.clone()),
        GovernorCancelledEvent {
            governor,
            cancelled_proposed,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_funds_rescued(env: &Env, token: Address, recipient: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RESCUED"),),
        FundsRescuedEvent {
            token,
            recipient,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}
