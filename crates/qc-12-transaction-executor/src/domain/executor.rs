//! # Deterministic Transaction Executor (spec §4.D)
//!
//! Grounded in `core/tvm_executor.go`'s `Execute` loop: validate nonce and
//! intrinsic gas, dispatch by `TxType`, append a receipt, advance the
//! sender's nonce, and fold the touched accounts into a state root once
//! the whole batch has run. Same `(accountDB, header, txs)` always
//! produces the same `(stateRoot, receipts, evicted)` — nothing here reads
//! wall-clock time except the packing-deadline check, which only decides
//! *how many* of the given transactions are considered, never *how* a
//! considered transaction executes.

use crate::domain::bonus;
use crate::domain::entities::{BlockExecutionOutcome, EvictedTransaction};
use crate::domain::gas::{intrinsic_gas, PACKING_DEADLINE, PACK_BONUS, PROPOSAL_BONUS};
use qc_04_state_management::AccountDB;
use qc_11_smart_contracts::{ContractError, ContractVm};
use qc_13_miner_manager::{MinerManagerApi, MinerOperationKind, MinerOperationMessage};
use shared_types::{Address, BigInt, BlockHeader, RawTransaction, Receipt, TxType};
use std::time::Instant;

/// Runs `txs` against `db` in order, producing a `BlockExecutionOutcome`.
///
/// When `packing` is `true`, the batch stops considering further
/// transactions once `PACKING_DEADLINE` has elapsed since this call
/// began; transactions already executed are untouched, and anything not
/// yet reached is simply absent from `executed`/`evicted` (it remains in
/// the mempool, unlike an eviction). When `packing` is `false` (replaying
/// a cast or finalized block), every transaction in `txs` is processed
/// regardless of wall-clock time.
pub fn execute(
    db: &mut dyn AccountDB,
    vm: &dyn ContractVm,
    miner_manager: &dyn MinerManagerApi,
    header: &BlockHeader,
    txs: &[RawTransaction],
    packing: bool,
) -> BlockExecutionOutcome {
    let deadline = packing.then(|| Instant::now() + PACKING_DEADLINE);
    let mut executed = Vec::new();
    let mut receipts = Vec::new();
    let mut evicted = Vec::new();
    let mut truncated = false;

    for tx in txs {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                truncated = true;
                break;
            }
        }

        let hash = tx.hash();

        if tx.tx_type == TxType::Reward {
            match execute_reward(db, header, tx) {
                Ok(outcome) => {
                    let receipt = Receipt {
                        status: true,
                        cumulative_gas_used: outcome.gas_used,
                        logs: Vec::new(),
                        tx_hash: hash,
                        contract_address: None,
                        tx_index: executed.len(),
                        height: header.height,
                    };
                    executed.push(tx.clone());
                    receipts.push(receipt);
                }
                Err(reason) => evicted.push(EvictedTransaction { hash, reason }),
            }
            continue;
        }

        let Some(source) = tx.source else {
            evicted.push(EvictedTransaction {
                hash,
                reason: "transaction has no recovered source".into(),
            });
            continue;
        };

        if !tx.within_gas_limit() {
            evicted.push(EvictedTransaction {
                hash,
                reason: "gas limit exceeds chain maximum".into(),
            });
            continue;
        }

        if tx.nonce != db.get_nonce(&source) + 1 {
            evicted.push(EvictedTransaction {
                hash,
                reason: format!("nonce {} is not account nonce {} + 1", tx.nonce, db.get_nonce(&source)),
            });
            continue;
        }

        let required_gas = intrinsic_gas(&tx.data, &tx.extra_data);
        if tx.gas_limit < required_gas {
            evicted.push(EvictedTransaction {
                hash,
                reason: "gas limit below intrinsic gas".into(),
            });
            continue;
        }

        match dispatch(db, vm, miner_manager, header, tx, source, required_gas, executed.len()) {
            Ok(receipt) => {
                db.set_nonce(&source, tx.nonce);
                executed.push(tx.clone());
                receipts.push(receipt);
            }
            Err(reason) => evicted.push(EvictedTransaction { hash, reason }),
        }
    }

    db.add_balance(&header.castor, BigInt::from(PROPOSAL_BONUS));
    let state_root = db.intermediate_root(true);

    BlockExecutionOutcome {
        state_root,
        executed,
        receipts,
        evicted,
        truncated,
    }
}

/// One dispatched transaction's receipt-shaped outcome, with gas
/// accounting already applied against `db` by the time this returns.
struct Dispatched {
    success: bool,
    gas_used: u64,
    contract_address: Option<Address>,
    logs: Vec<Vec<u8>>,
}

fn dispatch(
    db: &mut dyn AccountDB,
    vm: &dyn ContractVm,
    miner_manager: &dyn MinerManagerApi,
    header: &BlockHeader,
    tx: &RawTransaction,
    source: Address,
    gas: u64,
    tx_index: usize,
) -> Result<Receipt, String> {
    let outcome = match tx.tx_type {
        TxType::Transfer => execute_transfer(db, header, tx, source, gas),
        TxType::ContractCreate => execute_contract_create(db, vm, header, tx, source),
        TxType::ContractCall => execute_contract_call(db, vm, header, tx, source),
        TxType::StakeAdd | TxType::StakeReduce | TxType::StakeRefund | TxType::MinerAbort => {
            execute_miner_operation(db, miner_manager, header, tx, source, gas)
        }
        TxType::ApplyGuard
        | TxType::VoteMinerPool
        | TxType::ChangeFundGuardMode
        | TxType::GroupPiece
        | TxType::GroupMpk
        | TxType::GroupOriginPiece => execute_group_membership(db, header, tx, source, gas),
        TxType::Reward => unreachable!("Reward is handled by execute_reward before dispatch"),
    }?;

    Ok(Receipt {
        status: outcome.success,
        cumulative_gas_used: outcome.gas_used,
        logs: outcome.logs,
        tx_hash: tx.hash(),
        contract_address: outcome.contract_address,
        tx_index,
        height: header.height,
    })
}

fn gas_fee(gas_used: u64, gas_price: BigInt) -> BigInt {
    BigInt::from(gas_used).checked_mul(gas_price).unwrap_or(BigInt::ZERO)
}

/// Checks `balance >= value + gasFee` as one combined test before touching
/// any balance (spec §4.D "Transfer"): insufficient funds for the combined
/// total is a failed receipt, never an eviction, and nothing is debited on
/// that path. On success, debits `value + gasFee` from `source`, credits
/// `value` to `target`, and `gasFee` to the castor.
fn execute_transfer(db: &mut dyn AccountDB, header: &BlockHeader, tx: &RawTransaction, source: Address, gas: u64) -> Result<Dispatched, String> {
    let Some(target) = tx.target else {
        return Err("transfer requires a target address".to_string());
    };

    let fee = gas_fee(gas, tx.gas_price);
    let total = tx.value.checked_add(fee).ok_or_else(|| "value + gas fee overflows".to_string())?;

    if db.get_balance(&source) < total {
        return Ok(Dispatched { success: false, gas_used: gas, contract_address: None, logs: Vec::new() });
    }

    db.sub_balance(&source, fee).expect("balance checked above covers value + fee");
    db.add_balance(&header.castor, fee);
    db.sub_balance(&source, tx.value).expect("balance checked above covers value + fee");
    db.add_balance(&target, tx.value);

    Ok(Dispatched { success: true, gas_used: gas, contract_address: None, logs: Vec::new() })
}

/// Reserve `gasLimit * gasPrice`, deploy via the VM, then refund unused
/// gas and credit the used fee to the castor (spec §4.D "ContractCreate").
fn execute_contract_create(db: &mut dyn AccountDB, vm: &dyn ContractVm, header: &BlockHeader, tx: &RawTransaction, source: Address) -> Result<Dispatched, String> {
    let reservation = gas_fee(tx.gas_limit, tx.gas_price);
    db.sub_balance(&source, reservation).map_err(|_| "balance not enough to reserve deploy gas".to_string())?;

    let mut nonce_be = [0u8; 8];
    nonce_be.copy_from_slice(&tx.nonce.to_be_bytes());
    let mut preimage = Vec::with_capacity(40);
    preimage.extend_from_slice(&source.0);
    preimage.extend_from_slice(&nonce_be);
    let contract_addr = Address(shared_types::hash_bytes(&preimage));

    let snapshot = db.snapshot();
    let (success, gas_used, contract_address) = match vm.deploy(db, &contract_addr, &tx.data, tx.gas_limit) {
        Ok(outcome) => (true, outcome.gas_used, outcome.contract_address),
        Err(ContractError::ContractAddressConflict) => {
            db.revert_to_snapshot(snapshot);
            (false, 0, None)
        }
        Err(_) => {
            db.revert_to_snapshot(snapshot);
            (false, tx.gas_limit, None)
        }
    };

    let used_fee = gas_fee(gas_used, tx.gas_price);
    let unused_fee = reservation.checked_sub(used_fee).unwrap_or(BigInt::ZERO);
    db.add_balance(&source, unused_fee);
    db.add_balance(&header.castor, used_fee);

    Ok(Dispatched { success, gas_used, contract_address, logs: Vec::new() })
}

/// Reserve gas, invoke the VM, transfer `value` to the contract on
/// success, and refund unused gas either way (spec §4.D "ContractCall").
fn execute_contract_call(db: &mut dyn AccountDB, vm: &dyn ContractVm, header: &BlockHeader, tx: &RawTransaction, source: Address) -> Result<Dispatched, String> {
    let Some(target) = tx.target else {
        return Err("contract call requires a target address".to_string());
    };
    let reservation = gas_fee(tx.gas_limit, tx.gas_price);
    db.sub_balance(&source, reservation).map_err(|_| "balance not enough to reserve call gas".to_string())?;

    let snapshot = db.snapshot();
    let (success, gas_used, logs) = match vm.call(db, &target, &tx.data, tx.gas_limit) {
        Ok(outcome) if outcome.success => {
            if db.sub_balance(&source, tx.value).is_ok() {
                db.add_balance(&target, tx.value);
                (true, outcome.gas_used, outcome.logs.into_iter().map(|l| l.data).collect())
            } else {
                db.revert_to_snapshot(snapshot);
                (false, outcome.gas_used, Vec::new())
            }
        }
        Ok(outcome) => {
            db.revert_to_snapshot(snapshot);
            (false, outcome.gas_used, Vec::new())
        }
        Err(_) => {
            db.revert_to_snapshot(snapshot);
            (false, tx.gas_limit, Vec::new())
        }
    };

    let used_fee = gas_fee(gas_used, tx.gas_price);
    let unused_fee = reservation.checked_sub(used_fee).unwrap_or(BigInt::ZERO);
    db.add_balance(&source, unused_fee);
    db.add_balance(&header.castor, used_fee);

    Ok(Dispatched { success, gas_used, contract_address: None, logs })
}

/// Payload layout for `StakeAdd`/`StakeReduce`/`StakeRefund`:
/// `[mtype: u8][value: u64 BE]`. `MinerAbort` carries only `[mtype: u8]`.
fn parse_miner_operation(tx: &RawTransaction, source: Address, height: u64) -> Result<MinerOperationMessage, String> {
    let kind = match tx.tx_type {
        TxType::StakeAdd => MinerOperationKind::StakeAdd,
        TxType::StakeReduce => MinerOperationKind::StakeReduce,
        TxType::StakeRefund => MinerOperationKind::StakeRefund,
        TxType::MinerAbort => MinerOperationKind::MinerAbort,
        _ => unreachable!("caller only dispatches miner-operation tx types here"),
    };

    if tx.data.is_empty() {
        return Err("miner operation payload is empty".to_string());
    }
    let mtype = match tx.data[0] {
        0 => shared_types::MinerType::Proposal,
        1 => shared_types::MinerType::Verify,
        _ => return Err("unrecognized miner type tag".to_string()),
    };

    let value = match kind {
        MinerOperationKind::MinerAbort => 0,
        _ => {
            if tx.data.len() < 9 {
                return Err("miner operation payload missing value".to_string());
            }
            u64::from_be_bytes(tx.data[1..9].try_into().unwrap())
        }
    };

    Ok(MinerOperationMessage {
        kind,
        source,
        target: tx.target.unwrap_or(source),
        mtype,
        value,
        height,
    })
}

/// Gas is always charged from `source` to the castor up front; the
/// underlying operation then succeeds or fails on its own merits without
/// unwinding that charge (spec §4.D "Stake/Miner ops").
fn execute_miner_operation(db: &mut dyn AccountDB, miner_manager: &dyn MinerManagerApi, header: &BlockHeader, tx: &RawTransaction, source: Address, gas: u64) -> Result<Dispatched, String> {
    let fee = gas_fee(gas, tx.gas_price);
    db.sub_balance(&source, fee).map_err(|_| "balance not enough for gas fee".to_string())?;
    db.add_balance(&header.castor, fee);

    let op = match parse_miner_operation(tx, source, header.height) {
        Ok(op) => op,
        Err(reason) => return Ok(Dispatched { success: false, gas_used: gas, contract_address: None, logs: vec![reason.into_bytes()] }),
    };

    let success = miner_manager.execute_operation(db, &op).is_ok();
    Ok(Dispatched { success, gas_used: gas, contract_address: None, logs: Vec::new() })
}

/// Group-membership transaction types (`ApplyGuard`, `VoteMinerPool`,
/// `ChangeFundGuardMode`, `GroupPiece`, `GroupMpk`, `GroupOriginPiece`) are
/// BLS-group-formation bookkeeping external to this spec's consensus core
/// (group membership lifecycle is handled upstream of block production);
/// here they only pay their gas fee and land a receipt so a block
/// containing them still commits deterministically.
fn execute_group_membership(db: &mut dyn AccountDB, header: &BlockHeader, tx: &RawTransaction, source: Address, gas: u64) -> Result<Dispatched, String> {
    let fee = gas_fee(gas, tx.gas_price);
    db.sub_balance(&source, fee).map_err(|_| "balance not enough for gas fee".to_string())?;
    db.add_balance(&header.castor, fee);
    Ok(Dispatched { success: true, gas_used: gas, contract_address: None, logs: Vec::new() })
}

struct RewardOutcome {
    gas_used: u64,
}

/// Parses `extraData = groupId ‖ verifier0 ‖ verifier1 ‖ …` (32-byte
/// chunks), credits each verifier with `tx.value`, credits the castor
/// with `PACK_BONUS`, and marks `tx.data` applied so a redelivered copy
/// evicts instead of paying out twice (spec §4.D "Reward").
fn execute_reward(db: &mut dyn AccountDB, header: &BlockHeader, tx: &RawTransaction) -> Result<RewardOutcome, String> {
    if bonus::contains(db, &tx.data) {
        return Err("reward already applied".to_string());
    }

    if tx.extra_data.len() < 32 || tx.extra_data.len() % 32 != 0 {
        return Err("reward extraData is not a sequence of 32-byte addresses".to_string());
    }
    let verifiers: Vec<Address> = tx.extra_data[32..].chunks(32).map(Address::from_slice).collect();
    if verifiers.is_empty() {
        return Err("reward extraData names no verifiers".to_string());
    }

    for verifier in &verifiers {
        db.add_balance(verifier, tx.value);
    }
    db.add_balance(&header.castor, BigInt::from(PACK_BONUS));
    bonus::mark_applied(db, &tx.data);

    Ok(RewardOutcome { gas_used: 0 })
}
