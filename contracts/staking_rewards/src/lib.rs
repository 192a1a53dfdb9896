#![no_std]

pub mod events;
pub mod rewards;

use soroban_sdk::{contract, contractimpl, symbol_short, token, Address, Env, Symbol};

// ── Storage key constants ────────────────────────────────────────────────────

const GOVERNOR: Symbol = symbol_short!("GOV");
const PENDING_GOV: Symbol = symbol_short!("PEND_GOV");
const INITIALIZED: Symbol = symbol_short!("INIT");
const STAKING_TOKEN: Symbol = symbol_short!("STK_TOK");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const DISTRIBUTOR: Symbol = symbol_short!("RWD_DIST");
const REWARD_RATE: Symbol = symbol_short!("RWD_RATE");
const TOTAL_STAKED: Symbol = symbol_short!("TOT_STK");
const REWARD_PER_TOKEN: Symbol = symbol_short!("RPT");
const LAST_UPDATE: Symbol = symbol_short!("LAST_UPD");
const WINDOW_FINISH: Symbol = symbol_short!("FINISH");
const REWARD_OWED: Symbol = symbol_short!("RWD_OWED");

// Per-user persistent storage uses tuple keys:  (prefix, user_address)
const USER_STAKE: Symbol = symbol_short!("STK");
const USER_RPT_PAID: Symbol = symbol_short!("RPT_PAID");
const USER_EARNED: Symbol = symbol_short!("ERND");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidArgument = 4,
    ZeroAmount = 5,
    InvalidWindow = 6,
    InsufficientRewardBalance = 7,
    TransferFailed = 8,
    ProtectedAsset = 9,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingRewards;

#[contractimpl]
impl StakingRewards {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract. Callable exactly once per deployed instance,
    /// so deployment and state setup can be decoupled (clone/proxy flows).
    ///
    /// * `governor`      – address with administrative authority.
    /// * `staking_token` – token contract participants deposit.
    /// * `reward_token`  – token contract rewards are paid in.
    pub fn initialize(
        env: Env,
        governor: Address,
        staking_token: Address,
        reward_token: Address,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if staking_token == reward_token {
            return Err(ContractError::InvalidArgument);
        }

        env.storage().instance().set(&GOVERNOR, &governor);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&STAKING_TOKEN, &staking_token);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        // TOTAL_STAKED, REWARD_RATE, REWARD_PER_TOKEN, LAST_UPDATE, and
        // WINDOW_FINISH start at zero; unwrap_or(0) handles absent keys.

        events::publish_initialized(&env, governor, staking_token, reward_token);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` staking tokens.
    ///
    /// The global reward accumulator is flushed first so the staker does not
    /// retroactively earn rewards on the newly deposited tokens. Repeated
    /// calls accumulate into one position.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        if amount <= 0 {
            return Err(ContractError::ZeroAmount);
        }

        // 1. Flush global accumulator then snapshot for this user.
        Self::update_reward(&env, &staker);

        // 2. Pull tokens from the staker into the contract.
        let staking_token: Address = env
            .storage()
            .instance()
            .get(&STAKING_TOKEN)
            .ok_or(ContractError::NotInitialized)?;
        Self::transfer_or_fail(
            &env,
            &staking_token,
            &staker,
            &env.current_contract_address(),
            amount,
        )?;

        // 3. Increase the user's staked balance and the global total.
        let user_stake_key = (USER_STAKE, staker.clone());
        let prev_stake: i128 = env
            .storage()
            .persistent()
            .get(&user_stake_key)
            .unwrap_or(0i128);
        let new_stake = prev_stake.saturating_add(amount);
        env.storage().persistent().set(&user_stake_key, &new_stake);

        let prev_total: i128 = env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0);
        let new_total = prev_total.saturating_add(amount);
        env.storage().instance().set(&TOTAL_STAKED, &new_total);

        events::publish_staked(&env, staker, amount, new_total);

        Ok(())
    }

    /// Withdraw the caller's entire staked balance.
    ///
    /// All-or-nothing: partial exit is withdraw-then-restake. Accrued
    /// rewards are untouched and remain claimable via `get_reward`.
    pub fn withdraw(env: Env, staker: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let user_stake_key = (USER_STAKE, staker.clone());
        let staked: i128 = env.storage().persistent().get(&user_stake_key).unwrap_or(0);
        if staked <= 0 {
            return Err(ContractError::ZeroAmount);
        }

        // 1. Flush rewards before the balance changes.
        Self::update_reward(&env, &staker);

        // 2. Return the full stake.
        let staking_token: Address = env
            .storage()
            .instance()
            .get(&STAKING_TOKEN)
            .ok_or(ContractError::NotInitialized)?;
        Self::transfer_or_fail(
            &env,
            &staking_token,
            &env.current_contract_address(),
            &staker,
            staked,
        )?;

        // 3. Zero the position and shrink the global total.
        env.storage().persistent().set(&user_stake_key, &0i128);

        let prev_total: i128 = env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0);
        let new_total = prev_total.saturating_sub(staked);
        env.storage().instance().set(&TOTAL_STAKED, &new_total);

        events::publish_withdrawn(&env, staker, staked);

        Ok(())
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay out all rewards accrued by `staker`. Returns the amount paid;
    /// zero (without error) when nothing has accrued.
    ///
    /// The accrued balance is cleared only after the transfer reported
    /// success, so a failed payout leaves the claim intact.
    pub fn get_reward(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        // 1. Sync the accumulator.
        Self::update_reward(&env, &staker);

        // 2. Read the user's settled balance.
        let earned_key = (USER_EARNED, staker.clone());
        let accrued: i128 = env.storage().persistent().get(&earned_key).unwrap_or(0);

        if accrued <= 0 {
            return Ok(0);
        }

        // 3. Transfer, then clear the claim.
        let reward_token: Address = env
            .storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)?;
        Self::transfer_or_fail(
            &env,
            &reward_token,
            &env.current_contract_address(),
            &staker,
            accrued,
        )?;

        env.storage().persistent().set(&earned_key, &0i128);

        let owed: i128 = env.storage().instance().get(&REWARD_OWED).unwrap_or(0);
        env.storage()
            .instance()
            .set(&REWARD_OWED, &owed.saturating_sub(accrued));

        events::publish_reward_paid(&env, staker, accrued);

        Ok(accrued)
    }

    /// Fund a reward window: spread `reward` (plus whatever an interrupted
    /// window had left to pay) at a constant per-second rate until
    /// `window_end`. Only the reward distributor may call this.
    ///
    /// The accumulator is flushed at the old rate first, so rewards already
    /// accrued are never re-priced. The derived rate is rejected when it
    /// would promise more than the reward tokens the contract holds.
    pub fn notify_reward_amount(
        env: Env,
        caller: Address,
        reward: i128,
        window_end: u64,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_distributor(&env, &caller)?;

        if reward <= 0 {
            return Err(ContractError::InvalidArgument);
        }

        let now = env.ledger().timestamp();
        if window_end <= now {
            return Err(ContractError::InvalidWindow);
        }

        // Flush the accumulator at the old rate before it changes.
        Self::update_global_reward(&env);

        let duration = window_end - now;
        let finish: u64 = env.storage().instance().get(&WINDOW_FINISH).unwrap_or(0);
        let old_rate: i128 = env.storage().instance().get(&REWARD_RATE).unwrap_or(0);

        // An interrupted window's unspent budget rolls into the new one.
        let leftover = if now < finish {
            (finish - now) as i128 * old_rate
        } else {
            0
        };
        let new_rate = rewards::window_rate(reward, leftover, duration);

        let reward_token: Address = env
            .storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)?;
        let held = token::Client::new(&env, &reward_token).balance(&env.current_contract_address());
        if new_rate * duration as i128 > held {
            return Err(ContractError::InsufficientRewardBalance);
        }

        env.storage().instance().set(&REWARD_RATE, &new_rate);
        env.storage().instance().set(&LAST_UPDATE, &now);
        env.storage().instance().set(&WINDOW_FINISH, &window_end);

        events::publish_reward_added(&env, reward, window_end);

        Ok(())
    }

    // ── Role management ─────────────────────────────────────────────────────

    /// Assign the reward distributor role. Only the governor may call this;
    /// the role is re-assignable at any time.
    pub fn set_reward_distribution(
        env: Env,
        caller: Address,
        distributor: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_governor(&env, &caller)?;

        env.storage().instance().set(&DISTRIBUTOR, &distributor);

        events::publish_reward_distribution_set(&env, distributor);

        Ok(())
    }

    /// Propose a new governor. Only the current governor can call this.
    /// The new governor must call `accept_governor` to complete the transfer.
    pub fn propose_governor(
        env: Env,
        current_governor: Address,
        new_governor: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_governor.require_auth();
        Self::require_governor(&env, &current_governor)?;

        env.storage().instance().set(&PENDING_GOV, &new_governor);

        events::publish_governor_proposed(&env, current_governor, new_governor);

        Ok(())
    }

    /// Accept a pending governor transfer. Only the proposed address can
    /// call this.
    pub fn accept_governor(env: Env, new_governor: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_governor.require_auth();

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_GOV)
            .ok_or(ContractError::InvalidArgument)?;

        if new_governor != pending {
            return Err(ContractError::Unauthorized);
        }

        let old_governor: Address = env
            .storage()
            .instance()
            .get(&GOVERNOR)
            .ok_or(ContractError::NotInitialized)?;

        env.storage().instance().set(&GOVERNOR, &new_governor);
        env.storage().instance().remove(&PENDING_GOV);

        events::publish_governor_accepted(&env, old_governor, new_governor);

        Ok(())
    }

    /// Cancel a pending governor transfer. Only the current governor can
    /// call this.
    pub fn cancel_governor_transfer(
        env: Env,
        current_governor: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_governor.require_auth();
        Self::require_governor(&env, &current_governor)?;

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_GOV)
            .ok_or(ContractError::InvalidArgument)?;

        env.storage().instance().remove(&PENDING_GOV);

        events::publish_governor_cancelled(&env, current_governor, pending);

        Ok(())
    }

    // ── Rescue ──────────────────────────────────────────────────────────────

    /// Send `amount` of an arbitrary `token` the contract holds to
    /// `recipient`. Only the governor may call this.
    ///
    /// Participant funds stay out of reach: the staking token is blocked
    /// while any stake is outstanding, and the reward token is blocked
    /// while a window is still paying out, while anyone is still staked,
    /// and for any amount that would cut into settled-but-unclaimed
    /// rewards. Only the surplus above all obligations is rescuable.
    pub fn rescue_funds(
        env: Env,
        caller: Address,
        token: Address,
        recipient: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_governor(&env, &caller)?;

        if amount <= 0 {
            return Err(ContractError::ZeroAmount);
        }

        let total_staked: i128 = env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0);

        let staking_token: Address = env
            .storage()
            .instance()
            .get(&STAKING_TOKEN)
            .ok_or(ContractError::NotInitialized)?;
        if token == staking_token && total_staked > 0 {
            return Err(ContractError::ProtectedAsset);
        }

        let reward_token: Address = env
            .storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)?;
        let finish: u64 = env.storage().instance().get(&WINDOW_FINISH).unwrap_or(0);
        if token == reward_token {
            if env.ledger().timestamp() < finish || total_staked > 0 {
                return Err(ContractError::ProtectedAsset);
            }
            // With no window running and no stake left, every remaining
            // obligation has been settled into per-user accruals; rescue may
            // only take what those claims leave over.
            let owed: i128 = env.storage().instance().get(&REWARD_OWED).unwrap_or(0);
            let held =
                token::Client::new(&env, &token).balance(&env.current_contract_address());
            if held - amount < owed {
                return Err(ContractError::ProtectedAsset);
            }
        }

        Self::transfer_or_fail(
            &env,
            &token,
            &env.current_contract_address(),
            &recipient,
            amount,
        )?;

        events::publish_funds_rescued(&env, token, recipient, amount);

        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Sum of all currently staked tokens.
    pub fn total_supply(env: Env) -> i128 {
        env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0)
    }

    /// Staked balance of `account`.
    pub fn balance_of(env: Env, account: Address) -> i128 {
        let key = (USER_STAKE, account);
        env.storage().persistent().get(&key).unwrap_or(0)
    }

    /// Real-time earned-but-unpaid reward for `account`, including the
    /// portion not yet settled by a checkpoint. What `get_reward` would pay
    /// if called at this instant.
    pub fn earned(env: Env, account: Address) -> i128 {
        let current_rpt = Self::current_reward_per_token(&env);

        let staked: i128 = env
            .storage()
            .persistent()
            .get(&(USER_STAKE, account.clone()))
            .unwrap_or(0);
        let rpt_paid: i128 = env
            .storage()
            .persistent()
            .get(&(USER_RPT_PAID, account.clone()))
            .unwrap_or(0);
        let accrued: i128 = env
            .storage()
            .persistent()
            .get(&(USER_EARNED, account))
            .unwrap_or(0);

        rewards::earned(staked, current_rpt, rpt_paid, accrued)
    }

    /// The earlier of now and the window end — the cut-off up to which the
    /// current window still accrues.
    pub fn last_time_reward_applicable(env: Env) -> u64 {
        let finish: u64 = env.storage().instance().get(&WINDOW_FINISH).unwrap_or(0);
        env.ledger().timestamp().min(finish)
    }

    /// Timestamp at which the current reward window ends; zero before any
    /// window has been opened.
    pub fn period_finish(env: Env) -> u64 {
        env.storage().instance().get(&WINDOW_FINISH).unwrap_or(0)
    }

    /// Current per-second reward emission rate.
    pub fn reward_rate(env: Env) -> i128 {
        env.storage().instance().get(&REWARD_RATE).unwrap_or(0)
    }

    /// Sum of all settled-but-unclaimed reward balances. Accrual not yet
    /// settled by a checkpoint is not included; while such accrual can
    /// exist, some stake is necessarily outstanding.
    pub fn reward_obligations(env: Env) -> i128 {
        env.storage().instance().get(&REWARD_OWED).unwrap_or(0)
    }

    pub fn owner(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&GOVERNOR)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn reward_distribution(env: Env) -> Option<Address> {
        env.storage().instance().get(&DISTRIBUTOR)
    }

    pub fn pending_governor(env: Env) -> Option<Address> {
        env.storage().instance().get(&PENDING_GOV)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: revert if `caller` is not the stored governor.
    fn require_governor(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let governor: Address = env
            .storage()
            .instance()
            .get(&GOVERNOR)
            .ok_or(ContractError::NotInitialized)?;
        if *caller != governor {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Guard: revert unless `caller` holds the distributor role.
    fn require_distributor(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let distributor: Address = env
            .storage()
            .instance()
            .get(&DISTRIBUTOR)
            .ok_or(ContractError::Unauthorized)?;
        if *caller != distributor {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Move tokens, surfacing any failure as a distinct error code. A
    /// returned error reverts every prior storage write of this invocation.
    fn transfer_or_fail(
        env: &Env,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        match token::Client::new(env, token).try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }

    /// Accumulator value as of now, capped at the window end.
    fn current_reward_per_token(env: &Env) -> i128 {
        let total_staked: i128 = env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0);
        let reward_rate: i128 = env.storage().instance().get(&REWARD_RATE).unwrap_or(0);
        let stored_rpt: i128 = env
            .storage()
            .instance()
            .get(&REWARD_PER_TOKEN)
            .unwrap_or(0);
        let last_update: u64 = env.storage().instance().get(&LAST_UPDATE).unwrap_or(0);
        let finish: u64 = env.storage().instance().get(&WINDOW_FINISH).unwrap_or(0);

        let applicable = env.ledger().timestamp().min(finish);
        let elapsed = applicable.saturating_sub(last_update);

        rewards::reward_per_token(stored_rpt, reward_rate, elapsed, total_staked)
    }

    /// Flush the global reward-per-token accumulator without touching any
    /// user-specific state. Run alone before window-altering operations.
    fn update_global_reward(env: &Env) {
        let new_rpt = Self::current_reward_per_token(env);

        let finish: u64 = env.storage().instance().get(&WINDOW_FINISH).unwrap_or(0);
        let applicable = env.ledger().timestamp().min(finish);

        env.storage().instance().set(&REWARD_PER_TOKEN, &new_rpt);
        env.storage().instance().set(&LAST_UPDATE, &applicable);
    }

    /// Full per-user accrual checkpoint, run before every balance-changing
    /// operation for the acting user:
    ///
    /// 1. Flush the global accumulator.
    /// 2. Settle everything the user earned since their last snapshot.
    /// 3. Move the user's snapshot to the fresh accumulator value.
    ///
    /// Each user's reward is computed only against the global accumulator,
    /// never against other participants, so accrual stays exact regardless
    /// of how many others stake or withdraw in between.
    fn update_reward(env: &Env, user: &Address) {
        Self::update_global_reward(env);

        let current_rpt: i128 = env
            .storage()
            .instance()
            .get(&REWARD_PER_TOKEN)
            .unwrap_or(0);

        let staked: i128 = env
            .storage()
            .persistent()
            .get(&(USER_STAKE, user.clone()))
            .unwrap_or(0);
        let rpt_paid: i128 = env
            .storage()
            .persistent()
            .get(&(USER_RPT_PAID, user.clone()))
            .unwrap_or(0);
        let accrued: i128 = env
            .storage()
            .persistent()
            .get(&(USER_EARNED, user.clone()))
            .unwrap_or(0);

        let settled = rewards::earned(staked, current_rpt, rpt_paid, accrued);

        // Track the aggregate of settled-but-unpaid claims; the accumulator
        // is monotone, so the delta is never negative.
        let delta = settled.saturating_sub(accrued);
        if delta > 0 {
            let owed: i128 = env.storage().instance().get(&REWARD_OWED).unwrap_or(0);
            env.storage()
                .instance()
                .set(&REWARD_OWED, &owed.saturating_add(delta));
        }

        env.storage()
            .persistent()
            .set(&(USER_EARNED, user.clone()), &settled);
        env.storage()
            .persistent()
            .set(&(USER_RPT_PAID, user.clone()), &current_rpt);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
