//! Exercises the wired-up node end to end: a genesis-seeded proposer
//! casting its own block and a transaction being admitted into the
//! mempool, both observed purely through `BlockchainEvent`s on the shared
//! bus, the way `ipc_integration_test.rs` exercises the teacher's own
//! choreography.

use std::time::Duration;

use shared_bus::{BlockchainEvent, EventFilter, EventPublisher};
use shared_types::{Address, BigInt, RawTransaction, TxType};
use tokio::time::timeout;

use node_runtime::config::NodeConfig;
use node_runtime::container::NodeContainer;

fn transfer(sender: Address, nonce: u64) -> RawTransaction {
    RawTransaction {
        tx_type: TxType::Transfer,
        nonce,
        value: BigInt::ZERO,
        target: None,
        gas_limit: 21_000,
        gas_price: BigInt(1),
        data: vec![],
        extra_data: vec![],
        sign: vec![],
        source: Some(sender),
    }
}

#[tokio::test]
async fn genesis_node_casts_its_own_first_block() {
    let node = NodeContainer::new(NodeConfig::default());

    let mut subscription = node.event_bus.subscribe(EventFilter::all());
    tokio::task::yield_now().await;

    let height = node.chain.top_height() + 1;
    let pre_hash = node.chain.top_hash();
    node.on_tick(height, pre_hash, 0).await;

    let mut saw_cast = false;
    for _ in 0..8 {
        let event = timeout(Duration::from_millis(200), subscription.recv())
            .await
            .expect("event within timeout")
            .expect("event present");
        if let BlockchainEvent::BlockCast { proposer, height: cast_height, .. } = event {
            assert_eq!(proposer, node.node_address);
            assert_eq!(cast_height, height);
            saw_cast = true;
            break;
        }
    }

    assert!(saw_cast, "expected a BlockCast event from the genesis proposer's own tick");
}

#[tokio::test]
async fn mempool_admission_is_published_on_the_bus() {
    let node = NodeContainer::new(NodeConfig::default());

    let mut subscription = node.event_bus.subscribe(EventFilter::all());
    tokio::task::yield_now().await;

    let sender = Address([7u8; 32]);
    let tx = transfer(sender, 1);
    let tx_hash = tx.hash();

    node.mempool_adapter.push_and_publish(tx).await.expect("tx admitted");

    let mut saw_admission = false;
    for _ in 0..8 {
        let event = timeout(Duration::from_millis(200), subscription.recv())
            .await
            .expect("event within timeout")
            .expect("event present");
        if let BlockchainEvent::TransactionAdmitted { hash, sender: event_sender, nonce } = event {
            assert_eq!(hash, tx_hash);
            assert_eq!(event_sender, sender);
            assert_eq!(nonce, 1);
            saw_admission = true;
            break;
        }
    }

    assert!(saw_admission, "expected a TransactionAdmitted event");
}

#[tokio::test]
async fn proposal_set_rebuild_does_not_drop_the_genesis_proposer() {
    let node = NodeContainer::new(NodeConfig::default());
    node.maybe_rebuild_proposal_set(0);
    assert!(node.proposal_set.contains(&node.node_address));
}
