//! # Direct-Mode Flows
//!
//! Chains `chainA` and `chainB` peer with each other without a relay hub.
//! Each broker registers the other chain at bootstrap, and the sender's
//! transaction tracker follows every call from start to its final status.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{pair, route, Chain};
    use crate::hub::SimulatedHub;
    use ir_04_relay_client::RelayQueryApi;
    use shared_types::{ibtp_id, IbtpType};

    const BEGIN: u64 = 1;
    const ROLLBACK_BEGIN: u64 = 2;
    const SUCCESS: u64 = 3;
    const FAIL: u64 = 4;
    const ROLLBACK_END: u64 = 5;

    async fn chains() -> (Chain, Chain) {
        let a = Chain::direct("chainA", "chainB").await;
        let b = Chain::direct("chainB", "chainA").await;
        a.set_balance("alice", 100).await;
        (a, b)
    }

    async fn status(a: &Chain, b: &Chain, index: u64) -> u64 {
        let id = ibtp_id(&a.service(), &b.service(), index);
        a.client().get_direct_transaction_meta(&id).await.unwrap().status
    }

    #[tokio::test]
    async fn test_direct_transfer_round_trip() {
        let hub = SimulatedHub::direct();
        let (mut a, mut b) = chains().await;
        assert_eq!(a.service(), ":chainA:mychannel&transfer");

        a.transfer_to(&b.service(), "alice", "bob", 20).await;
        assert_eq!(status(&a, &b, 1).await, BEGIN);

        let request = a.next_ibtp().await;
        assert!(route(&hub, &request, &b).await);
        assert_eq!(b.balance("bob").await, 20);

        let receipt = b.next_ibtp().await;
        assert_eq!(receipt.typ, IbtpType::ReceiptSuccess);
        assert!(route(&hub, &receipt, &a).await);

        assert_eq!(status(&a, &b, 1).await, SUCCESS);
        assert_eq!(a.balance("alice").await, 80);
        assert_eq!(
            a.client().get_callback_meta().await.unwrap().get(&pair(&a.service(), &b.service())),
            Some(&1)
        );

        a.stop().await;
        b.stop().await;
    }

    #[tokio::test]
    async fn test_direct_failure_refunds_and_fails() {
        let hub = SimulatedHub::direct();
        let (mut a, mut b) = chains().await;
        b.exec("setBalance", &["bob", "lots"]).await.unwrap();

        a.transfer_to(&b.service(), "alice", "bob", 20).await;
        let request = a.next_ibtp().await;
        assert!(route(&hub, &request, &b).await);

        let receipt = b.next_ibtp().await;
        assert_eq!(receipt.typ, IbtpType::ReceiptFailure);
        assert!(route(&hub, &receipt, &a).await);

        assert_eq!(status(&a, &b, 1).await, FAIL);
        assert_eq!(a.balance("alice").await, 100);

        a.stop().await;
        b.stop().await;
    }

    #[tokio::test]
    async fn test_direct_timeout_rolls_back_both_sides() {
        let hub = SimulatedHub::direct();
        let (mut a, b) = chains().await;

        a.transfer_to(&b.service(), "alice", "bob", 20).await;
        let request = a.next_ibtp().await;
        assert!(route(&hub, &request, &b).await);
        assert_eq!(b.balance("bob").await, 20);

        // The sender gives up first and refunds locally.
        let timed_out = hub.receipt(&request, IbtpType::ReceiptRollback).unwrap();
        assert!(route(&hub, &timed_out, &a).await);
        assert_eq!(status(&a, &b, 1).await, ROLLBACK_BEGIN);
        assert_eq!(a.balance("alice").await, 100);

        // Then the destination undoes the charge and confirms.
        let undone = hub.rollback_request(&request, b.client()).await.unwrap();
        assert!(undone.status, "{}", undone.message);
        assert_eq!(b.balance("bob").await, 0);
        let end = undone.result.unwrap();
        assert_eq!(end.typ, IbtpType::ReceiptRollbackEnd);

        assert!(route(&hub, &end, &a).await);
        assert_eq!(status(&a, &b, 1).await, ROLLBACK_END);
        assert_eq!(a.balance("alice").await, 100);

        a.stop().await;
        b.stop().await;
    }

    #[tokio::test]
    async fn test_direct_unregistered_peer_is_refused() {
        let (a, b) = chains().await;

        let err = a
            .exec("transfer", &[":chainC:mychannel&transfer", "alice", "bob", "1"])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("remote service is not registered"));
        assert_eq!(a.balance("alice").await, 100);

        let info = a.client().get_appchain_info("chainB").await.unwrap();
        assert_eq!(info.broker, "broker");

        a.stop().await;
        b.stop().await;
    }
}
