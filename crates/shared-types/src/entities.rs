//! # Core Domain Entities
//!
//! Defines the consensus-core entities shared by the mempool, executor,
//! miner-manager, consensus, block-production, and finality crates.
//!
//! ## Clusters
//!
//! - **Chain**: `RawTransaction`, `BlockHeader`, `Block`, `BlockWeight`
//! - **Accounts & Staking**: `Miner`, `StakeDetail`
//! - **Consensus Group**: `VerifyGroup`, `MemberId`
//! - **Wire**: `SignedInfo`, `ConsensusCastMessage`, `ConsensusVerifyMessage`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::cmp::Ordering;
use std::fmt;

// =============================================================================
// PRIMITIVES
// =============================================================================

/// A 32-byte content digest (transaction hash, block hash, VRF output, ...).
pub type Hash = [u8; 32];

/// A 32-byte account identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    pub const ZERO: Address = Address([0u8; 32]);

    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 32];
        let n = bytes.len().min(32);
        buf[32 - n..].copy_from_slice(&bytes[bytes.len() - n..]);
        Address(buf)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex_string(&self.0[..4]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex_string(&self.0))
    }
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Unsigned big integer used for `value`, `gasLimit`, `gasPrice`. Balances and
/// fees never need more than 128 bits on this chain's supply schedule, but we
/// keep it newtype'd so arithmetic overflow is a type error, not a silent wrap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BigInt(pub u128);

impl BigInt {
    pub const ZERO: BigInt = BigInt(0);

    pub fn checked_add(self, other: BigInt) -> Option<BigInt> {
        self.0.checked_add(other.0).map(BigInt)
    }

    pub fn checked_sub(self, other: BigInt) -> Option<BigInt> {
        self.0.checked_sub(other.0).map(BigInt)
    }

    pub fn checked_mul(self, other: BigInt) -> Option<BigInt> {
        self.0.checked_mul(other.0).map(BigInt)
    }
}

impl From<u64> for BigInt {
    fn from(v: u64) -> Self {
        BigInt(v as u128)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// CLUSTER A: TRANSACTIONS
// =============================================================================

/// Transaction type discriminant. See spec §3 "RawTransaction".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TxType {
    Transfer = 0,
    ContractCreate = 1,
    ContractCall = 2,
    StakeAdd = 3,
    StakeReduce = 4,
    StakeRefund = 5,
    MinerAbort = 6,
    ApplyGuard = 7,
    VoteMinerPool = 8,
    ChangeFundGuardMode = 9,
    GroupPiece = 10,
    GroupMpk = 11,
    GroupOriginPiece = 12,
    Reward = 13,
}

/// Maximum permitted `gasLimit` for any single transaction.
pub const GAS_LIMIT_MAX: u64 = 500_000;

/// A transaction as it exists before signature recovery. `source` is filled
/// in once the signature has been verified and the sender recovered; it is
/// never part of the canonical hash.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawTransaction {
    pub tx_type: TxType,
    pub nonce: u64,
    pub value: BigInt,
    pub target: Option<Address>,
    pub gas_limit: u64,
    pub gas_price: BigInt,
    #[serde_as(as = "Bytes")]
    pub data: Vec<u8>,
    #[serde_as(as = "Bytes")]
    pub extra_data: Vec<u8>,
    #[serde_as(as = "Bytes")]
    pub sign: Vec<u8>,
    /// Recovered from `sign`; excluded from the canonical hash.
    pub source: Option<Address>,
}

impl RawTransaction {
    /// `hash = digest(raw)` over every field except `sign` and `source`.
    /// Spec invariant: `gasLimit <= 500_000`.
    pub fn hash(&self) -> Hash {
        let mut buf = Vec::with_capacity(64 + self.data.len() + self.extra_data.len());
        buf.push(self.tx_type as u8);
        buf.extend_from_slice(&self.nonce.to_be_bytes());
        buf.extend_from_slice(&self.value.0.to_be_bytes());
        if let Some(t) = &self.target {
            buf.extend_from_slice(&t.0);
        }
        buf.extend_from_slice(&self.gas_limit.to_be_bytes());
        buf.extend_from_slice(&self.gas_price.0.to_be_bytes());
        buf.extend_from_slice(&self.data);
        buf.extend_from_slice(&self.extra_data);
        crate::hash_bytes(&buf)
    }

    pub fn within_gas_limit(&self) -> bool {
        self.gas_limit <= GAS_LIMIT_MAX
    }
}

// =============================================================================
// CLUSTER B: BLOCKS
// =============================================================================

/// `BlockHeader` per spec §3. `hash` is the digest over every field except
/// `signature` and `random`.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: u64,
    pub pre_hash: Hash,
    /// Milliseconds elapsed since the previous block; invariant `elapsed_ms > 0`.
    pub elapsed_ms: i32,
    #[serde_as(as = "Bytes")]
    pub prove_value: Vec<u8>,
    pub total_qn: u64,
    /// Unix millis the proposer claims to have cast at.
    pub cur_time: i64,
    pub castor: Address,
    pub group: Hash,
    #[serde_as(as = "Bytes")]
    pub signature: Vec<u8>,
    pub nonce: i32,
    pub tx_tree: Hash,
    pub receipt_tree: Hash,
    pub state_tree: Hash,
    #[serde_as(as = "Bytes")]
    pub extra_data: Vec<u8>,
    #[serde_as(as = "Bytes")]
    pub random: Vec<u8>,
    pub gas_fee: u64,
}

impl BlockHeader {
    pub fn hash(&self) -> Hash {
        let mut buf = Vec::with_capacity(256 + self.extra_data.len());
        buf.extend_from_slice(&self.height.to_be_bytes());
        buf.extend_from_slice(&self.pre_hash);
        buf.extend_from_slice(&self.elapsed_ms.to_be_bytes());
        buf.extend_from_slice(&self.prove_value);
        buf.extend_from_slice(&self.total_qn.to_be_bytes());
        buf.extend_from_slice(&self.cur_time.to_be_bytes());
        buf.extend_from_slice(&self.castor.0);
        buf.extend_from_slice(&self.group);
        buf.extend_from_slice(&self.nonce.to_be_bytes());
        buf.extend_from_slice(&self.tx_tree);
        buf.extend_from_slice(&self.receipt_tree);
        buf.extend_from_slice(&self.state_tree);
        buf.extend_from_slice(&self.extra_data);
        buf.extend_from_slice(&self.gas_fee.to_be_bytes());
        crate::hash_bytes(&buf)
    }

    /// The weight used for fork choice: `(total_qn, pv)`, see `BlockWeight`.
    pub fn weight(&self) -> BlockWeight {
        BlockWeight {
            total_qn: self.total_qn,
            pv: crate::hash_bytes(&self.prove_value),
        }
    }
}

/// Block = header + ordered transactions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<RawTransaction>,
}

/// `(totalQN, pv)`. Higher `total_qn` wins; ties broken by larger `pv`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockWeight {
    pub total_qn: u64,
    pub pv: Hash,
}

impl PartialOrd for BlockWeight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BlockWeight {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_qn
            .cmp(&other.total_qn)
            .then_with(|| self.pv.cmp(&other.pv))
    }
}

// =============================================================================
// CLUSTER C: MINERS & STAKE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinerType {
    Proposal,
    Verify,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinerStatus {
    Normal,
    Prepare,
    Frozen,
    Abort,
}

/// A per-`(address, type)` miner record. See spec §3 "Miner" and §4.C state
/// machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Miner {
    pub id: Address,
    pub miner_type: MinerType,
    pub stake: u64,
    pub status: MinerStatus,
    pub apply_height: u64,
    pub abort_height: u64,
    pub public_key: Vec<u8>,
    pub vrf_public_key: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeStatus {
    Staked,
    StakeFrozen,
}

/// Keyed by `(source, mType, status)` under `target`'s account subtree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakeDetail {
    pub source: Address,
    pub target: Address,
    pub mtype: MinerType,
    pub status: StakeStatus,
    pub value: u64,
    pub update_height: u64,
}

// =============================================================================
// CLUSTER D: CONSENSUS GROUP
// =============================================================================

/// Index of a member within a `VerifyGroup`.
pub type MemberId = usize;

/// The verifier committee responsible for a contiguous span of heights.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifyGroup {
    pub seed: Hash,
    pub members: Vec<Address>,
    pub threshold: u32,
    /// BLS-style group public key used to verify the recovered aggregate.
    pub public_key: Vec<u8>,
    pub work_height: u64,
    pub dismiss_height: u64,
}

impl VerifyGroup {
    pub fn member_index(&self, addr: &Address) -> Option<MemberId> {
        self.members.iter().position(|m| m == addr)
    }

    pub fn is_member(&self, addr: &Address) -> bool {
        self.members.contains(addr)
    }
}

// =============================================================================
// CLUSTER E: WIRE MESSAGES (spec §6)
// =============================================================================

/// `SignedInfo = { signer, dataHash, sign }`, attached to both Cast and
/// Verify wire messages.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedInfo {
    pub signer: Address,
    pub data_hash: Hash,
    #[serde_as(as = "Bytes")]
    pub sign: Vec<u8>,
}

/// `ConsensusCastMessage { bh, SI }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsensusCastMessage {
    pub bh: BlockHeader,
    pub si: SignedInfo,
}

/// `ConsensusVerifyMessage { blockHash, SI, randomSign }`.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsensusVerifyMessage {
    pub block_hash: Hash,
    pub si: SignedInfo,
    #[serde_as(as = "Bytes")]
    pub random_sign: Vec<u8>,
}

// =============================================================================
// CLUSTER F: EXECUTION RECEIPTS
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Receipt {
    /// `true` on success, matching the spec's `status: !success` framing
    /// inverted for readability (`status == true` means the tx succeeded).
    pub status: bool,
    pub cumulative_gas_used: u64,
    pub logs: Vec<Vec<u8>>,
    pub tx_hash: Hash,
    pub contract_address: Option<Address>,
    pub tx_index: usize,
    pub height: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_hash_excludes_sign_and_source() {
        let mut tx = RawTransaction {
            tx_type: TxType::Transfer,
            nonce: 1,
            value: BigInt(100),
            target: Some(Address([1u8; 32])),
            gas_limit: 21_000,
            gas_price: BigInt(1),
            data: vec![],
            extra_data: vec![],
            sign: vec![0xAA; 64],
            source: None,
        };
        let h1 = tx.hash();
        tx.sign = vec![0xBB; 64];
        tx.source = Some(Address([2u8; 32]));
        let h2 = tx.hash();
        assert_eq!(h1, h2);
    }

    #[test]
    fn gas_limit_invariant() {
        let mut tx_ok = RawTransaction {
            tx_type: TxType::Transfer,
            nonce: 0,
            value: BigInt(0),
            target: None,
            gas_limit: GAS_LIMIT_MAX,
            gas_price: BigInt(0),
            data: vec![],
            extra_data: vec![],
            sign: vec![],
            source: None,
        };
        assert!(tx_ok.within_gas_limit());
        tx_ok.gas_limit += 1;
        assert!(!tx_ok.within_gas_limit());
    }

    #[test]
    fn block_weight_orders_by_qn_then_pv() {
        let low = BlockWeight { total_qn: 1, pv: [0u8; 32] };
        let high_qn = BlockWeight { total_qn: 2, pv: [0u8; 32] };
        assert!(high_qn > low);

        let mut pv_a = [0u8; 32];
        pv_a[0] = 1;
        let tie_a = BlockWeight { total_qn: 5, pv: pv_a };
        let tie_b = BlockWeight { total_qn: 5, pv: [0u8; 32] };
        assert!(tie_a > tie_b);
    }
}
