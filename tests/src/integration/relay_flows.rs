//! # Relay-Mode Flows
//!
//! Chain A (`1356:appchain1`) and chain B (`1356:appchain2`) exchange
//! transfers through the simulated hub. Every IBTP is read from a poller,
//! so the event, receipt and proof paths of the relay client are all on
//! the route.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{pair, route, Chain};
    use crate::hub::SimulatedHub;
    use ir_04_relay_client::{generate_callback, request_content, RelayQueryApi, RelaySubmitApi};
    use shared_types::IbtpType;

    async fn chains() -> (Chain, Chain) {
        let a = Chain::relay("appchain1").await;
        let b = Chain::relay("appchain2").await;
        a.set_balance("alice", 100).await;
        (a, b)
    }

    // =============================================================================
    // Request → Receipt
    // =============================================================================

    #[tokio::test]
    async fn test_transfer_round_trip() {
        let hub = SimulatedHub::relay();
        let (mut a, mut b) = chains().await;

        a.transfer_to(&b.service(), "alice", "bob", 30).await;
        assert_eq!(a.balance("alice").await, 70);

        let request = a.next_ibtp().await;
        assert_eq!(request.typ, IbtpType::Interchain);
        assert_eq!((request.from.as_str(), request.index), (a.service().as_str(), 1));
        assert_eq!(request.to, b.service());
        assert!(!request.proof.is_empty());
        let content = request_content(&request).unwrap();
        assert_eq!(content.func, "interchainCharge");

        let delivered = hub.forward_request(&request, b.client()).await.unwrap().unwrap();
        assert!(delivered.status, "{}", delivered.message);
        assert_eq!(b.balance("bob").await, 30);
        assert_eq!(
            b.client().get_inner_meta().await.unwrap().get(&pair(&a.service(), &b.service())),
            Some(&1)
        );

        let receipt = b.next_ibtp().await;
        assert_eq!(receipt.typ, IbtpType::ReceiptSuccess);
        assert_eq!(receipt.id(), request.id());
        assert_eq!(delivered.result.map(|r| r.typ), Some(IbtpType::ReceiptSuccess));

        assert!(route(&hub, &receipt, &a).await);
        assert_eq!(
            a.client().get_callback_meta().await.unwrap().get(&pair(&a.service(), &b.service())),
            Some(&1)
        );
        assert_eq!(a.balance("alice").await, 70);
        assert!(a.is_quiet().await);

        a.stop().await;
        b.stop().await;
    }

    #[tokio::test]
    async fn test_failed_call_rolls_back_sender() {
        let hub = SimulatedHub::relay();
        let (mut a, mut b) = chains().await;
        // A receiver balance that is not a number makes the charge fail.
        b.exec("setBalance", &["bob", "lots"]).await.unwrap();

        a.transfer_to(&b.service(), "alice", "bob", 30).await;
        let request = a.next_ibtp().await;
        assert!(route(&hub, &request, &b).await);

        let receipt = b.next_ibtp().await;
        assert_eq!(receipt.typ, IbtpType::ReceiptFailure);

        // What the source will run for this outcome.
        let callback = generate_callback(&request, Vec::new(), Vec::new(), false).unwrap();
        let rollback = request_content(&callback).unwrap();
        assert_eq!(rollback.func, "interchainRollback");
        assert_eq!(rollback.args, vec![b"alice".to_vec(), 30u64.to_be_bytes().to_vec()]);

        assert!(route(&hub, &receipt, &a).await);
        assert_eq!(a.balance("alice").await, 100);
        assert_eq!(
            a.client().get_callback_meta().await.unwrap().get(&pair(&a.service(), &b.service())),
            Some(&1)
        );

        a.stop().await;
        b.stop().await;
    }

    #[tokio::test]
    async fn test_rejected_request_rolls_back_on_hub_receipt() {
        let hub = SimulatedHub::relay();
        let (mut a, b) = chains().await;

        // Aimed at a service chain B never approved.
        a.transfer_to("1356:appchain2:mychannel&ghost", "alice", "bob", 25).await;
        let request = a.next_ibtp().await;

        let refused = hub.forward_request(&request, b.client()).await.unwrap().unwrap();
        assert!(!refused.status);
        assert!(refused.result.is_none());

        let failure = hub.receipt(&request, IbtpType::ReceiptFailure).unwrap();
        assert!(route(&hub, &failure, &a).await);
        assert_eq!(a.balance("alice").await, 100);

        a.stop().await;
        b.stop().await;
    }

    // =============================================================================
    // Delivery guarantees
    // =============================================================================

    #[tokio::test]
    async fn test_duplicate_request_is_dropped() {
        let hub = SimulatedHub::relay();
        let (mut a, b) = chains().await;

        a.transfer_to(&b.service(), "alice", "bob", 30).await;
        let request = a.next_ibtp().await;
        assert!(route(&hub, &request, &b).await);
        assert!(!route(&hub, &request, &b).await);

        // Past the hub, the broker refuses the replay on its own.
        let replay = b
            .client()
            .submit_ibtp(hub.inbound_request(&request).unwrap())
            .await
            .unwrap();
        assert!(!replay.status);
        assert_eq!(replay.message, "inner meta:incorrect index, expect 2");
        assert_eq!(b.balance("bob").await, 30);

        a.stop().await;
        b.stop().await;
    }

    #[tokio::test]
    async fn test_out_of_order_request_waits_for_its_turn() {
        let hub = SimulatedHub::relay();
        let (mut a, b) = chains().await;

        a.transfer_to(&b.service(), "alice", "bob", 10).await;
        a.transfer_to(&b.service(), "alice", "bob", 15).await;
        let first = a.next_ibtp().await;
        let second = a.next_ibtp().await;
        assert_eq!((first.index, second.index), (1, 2));

        let early = hub.forward_request(&second, b.client()).await.unwrap().unwrap();
        assert!(!early.status);
        assert_eq!(early.message, "inner meta:incorrect index, expect 1");
        assert_eq!(b.balance("bob").await, 0);

        // A refused delivery is not remembered, so it can be retried.
        assert!(route(&hub, &first, &b).await);
        assert!(route(&hub, &second, &b).await);
        assert_eq!(b.balance("bob").await, 25);

        a.stop().await;
        b.stop().await;
    }

    #[tokio::test]
    async fn test_batch_delivery_settles_every_receipt() {
        let hub = SimulatedHub::relay();
        let (mut a, mut b) = chains().await;

        for amount in [5, 10, 20] {
            a.transfer_to(&b.service(), "alice", "bob", amount).await;
        }
        let mut requests = Vec::new();
        for _ in 0..3 {
            requests.push(a.next_ibtp().await);
        }

        let delivered = hub.forward_batch(&requests, b.client()).await.unwrap();
        assert!(delivered.status, "{}", delivered.message);
        assert_eq!(b.balance("bob").await, 35);

        for index in 1..=3 {
            let receipt = b.next_ibtp().await;
            assert_eq!((receipt.index, receipt.typ), (index, IbtpType::ReceiptSuccess));
            assert!(route(&hub, &receipt, &a).await);
        }
        assert_eq!(
            a.client().get_callback_meta().await.unwrap().get(&pair(&a.service(), &b.service())),
            Some(&3)
        );

        // Already accepted, so nothing is left to submit.
        let again = hub.forward_batch(&requests, b.client()).await.unwrap();
        assert!(again.status);
        assert_eq!(b.balance("bob").await, 35);

        a.stop().await;
        b.stop().await;
    }

    // =============================================================================
    // Timeout rollback
    // =============================================================================

    #[tokio::test]
    async fn test_timeout_rollback_undoes_applied_request() {
        let hub = SimulatedHub::relay();
        let (mut a, b) = chains().await;

        a.transfer_to(&b.service(), "alice", "bob", 30).await;
        let request = a.next_ibtp().await;
        assert!(route(&hub, &request, &b).await);
        assert_eq!(b.balance("bob").await, 30);

        let undone = hub.rollback_request(&request, b.client()).await.unwrap();
        assert!(undone.status, "{}", undone.message);
        assert_eq!(b.balance("bob").await, 0);
        assert_eq!(
            b.client().get_dst_rollback_meta().await.unwrap().get(&pair(&a.service(), &b.service())),
            Some(&1)
        );

        let receipt = undone.result.unwrap();
        assert_eq!(receipt.typ, IbtpType::ReceiptRollback);
        assert!(route(&hub, &receipt, &a).await);
        assert_eq!(a.balance("alice").await, 100);

        a.stop().await;
        b.stop().await;
    }

    // =============================================================================
    // Both directions at once
    // =============================================================================

    #[tokio::test]
    async fn test_bidirectional_traffic_settles() {
        let hub = SimulatedHub::relay();
        let (mut a, mut b) = chains().await;
        b.set_balance("carol", 50).await;

        a.transfer_to(&b.service(), "alice", "bob", 30).await;
        b.transfer_to(&a.service(), "carol", "dave", 5).await;

        // Two requests and two receipts.
        for _ in 0..4 {
            let (ibtp, from_a) = tokio::select! {
                ibtp = a.next_ibtp() => (ibtp, true),
                ibtp = b.next_ibtp() => (ibtp, false),
            };
            let peer = if from_a { &b } else { &a };
            assert!(route(&hub, &ibtp, peer).await);
        }

        assert_eq!(a.balance("alice").await, 70);
        assert_eq!(b.balance("bob").await, 30);
        assert_eq!(b.balance("carol").await, 45);
        assert_eq!(a.balance("dave").await, 5);
        assert_eq!(
            a.client().get_callback_meta().await.unwrap().get(&pair(&a.service(), &b.service())),
            Some(&1)
        );
        assert_eq!(
            b.client().get_callback_meta().await.unwrap().get(&pair(&b.service(), &a.service())),
            Some(&1)
        );
        assert!(a.is_quiet().await);
        assert!(b.is_quiet().await);

        a.stop().await;
        b.stop().await;
    }
}
