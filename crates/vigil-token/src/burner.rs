use std::sync::Arc;

use async_trait::async_trait;

use vigil_ledger::{EventKind, EventLog, EventRecord};
use vigil_types::{AgentId, Amount, ChainClock, Result, VigilError};

use crate::traits::{HeartbeatCollector, SplitReceipt, TokenTransfer};

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Splits each heartbeat payment into a burned portion and a protocol fee.
///
/// The burn goes to an immutable sink account that nothing ever spends from;
/// the fee goes to the treasury. The two portions always sum to exactly the
/// input amount: the fee is rounded down, so every integer remainder lands
/// on the burn side.
pub struct FeeSplitBurner {
    token: Arc<dyn TokenTransfer>,
    log: Arc<dyn EventLog>,
    clock: Arc<dyn ChainClock>,
    sink: AgentId,
    treasury: AgentId,
    fee_bps: u16,
}

impl FeeSplitBurner {
    pub fn new(
        token: Arc<dyn TokenTransfer>,
        log: Arc<dyn EventLog>,
        clock: Arc<dyn ChainClock>,
        sink: AgentId,
        treasury: AgentId,
        fee_bps: u16,
    ) -> Result<Self> {
        if sink.is_zero() || treasury.is_zero() {
            return Err(VigilError::ZeroAddress);
        }
        if fee_bps > BPS_DENOMINATOR {
            return Err(VigilError::InvalidFeeBps {
                provided: fee_bps,
                max: BPS_DENOMINATOR,
            });
        }
        Ok(Self {
            token,
            log,
            clock,
            sink,
            treasury,
            fee_bps,
        })
    }

    /// Deterministic split of `amount` into burn and fee portions.
    ///
    /// Computed as `fee = floor(amount * fee_bps / 10_000)` without
    /// overflowing `u128`: the quotient and remainder of `amount / 10_000`
    /// are scaled separately.
    pub fn split(&self, amount: Amount) -> SplitReceipt {
        let denom = BPS_DENOMINATOR as Amount;
        let bps = self.fee_bps as Amount;
        let fee = (amount / denom) * bps + (amount % denom) * bps / denom;
        SplitReceipt {
            burned: amount - fee,
            fee,
        }
    }

    pub fn sink(&self) -> AgentId {
        self.sink
    }

    pub fn treasury(&self) -> AgentId {
        self.treasury
    }
}

impl std::fmt::Debug for FeeSplitBurner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeeSplitBurner")
            .field("sink", &self.sink)
            .field("treasury", &self.treasury)
            .field("fee_bps", &self.fee_bps)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl HeartbeatCollector for FeeSplitBurner {
    async fn collect(&self, from: AgentId, amount: Amount) -> Result<SplitReceipt> {
        let receipt = self.split(amount);

        if receipt.burned > 0 {
            self.token.transfer_from(from, self.sink, receipt.burned).await?;
        }
        if receipt.fee > 0 {
            self.token
                .transfer_from(from, self.treasury, receipt.fee)
                .await?;
        }

        tracing::debug!(
            %from,
            burned = %receipt.burned,
            fee = %receipt.fee,
            "heartbeat payment split"
        );

        let previous_hash = self.log.latest_hash().await?;
        let record = EventRecord::new(
            EventKind::FeeSplit,
            self.clock.now(),
            from,
            self.sink,
            serde_json::json!({
                "amount": amount.to_string(),
                "burned": receipt.burned.to_string(),
                "fee": receipt.fee.to_string(),
            }),
            previous_hash,
        );
        self.log.append(record).await?;

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryToken;
    use proptest::prelude::*;
    use vigil_ledger::InMemoryEventLog;
    use vigil_types::ManualClock;

    fn burner_with(fee_bps: u16) -> (Arc<InMemoryToken>, FeeSplitBurner, AgentId, AgentId) {
        let token = Arc::new(InMemoryToken::new());
        let sink = AgentId::random();
        let treasury = AgentId::random();
        let burner = FeeSplitBurner::new(
            token.clone(),
            Arc::new(InMemoryEventLog::new()),
            Arc::new(ManualClock::new(0)),
            sink,
            treasury,
            fee_bps,
        )
        .unwrap();
        (token, burner, sink, treasury)
    }

    #[test]
    fn test_zero_sink_rejected() {
        let token: Arc<dyn TokenTransfer> = Arc::new(InMemoryToken::new());
        let err = FeeSplitBurner::new(
            token.clone(),
            Arc::new(InMemoryEventLog::new()),
            Arc::new(ManualClock::new(0)),
            AgentId::ZERO,
            AgentId::random(),
            1_000,
        )
        .unwrap_err();
        assert!(matches!(err, VigilError::ZeroAddress));

        let err = FeeSplitBurner::new(
            token,
            Arc::new(InMemoryEventLog::new()),
            Arc::new(ManualClock::new(0)),
            AgentId::random(),
            AgentId::ZERO,
            1_000,
        )
        .unwrap_err();
        assert!(matches!(err, VigilError::ZeroAddress));
    }

    #[test]
    fn test_fee_bps_above_denominator_rejected() {
        let token: Arc<dyn TokenTransfer> = Arc::new(InMemoryToken::new());
        let err = FeeSplitBurner::new(
            token,
            Arc::new(InMemoryEventLog::new()),
            Arc::new(ManualClock::new(0)),
            AgentId::random(),
            AgentId::random(),
            10_001,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            VigilError::InvalidFeeBps {
                provided: 10_001,
                max: 10_000
            }
        ));
    }

    #[test]
    fn test_split_conserves_smallest_unit() {
        let (_, burner, _, _) = burner_with(1_000);
        // 10% of 1 rounds to zero fee; the whole unit burns.
        let receipt = burner.split(1);
        assert_eq!(receipt.fee, 0);
        assert_eq!(receipt.burned, 1);
        assert_eq!(receipt.total(), 1);
    }

    #[test]
    fn test_split_remainder_goes_to_burn() {
        let (_, burner, _, _) = burner_with(3_333);
        // 33.33% of 100 = 33.33 -> fee 33, burn 67.
        let receipt = burner.split(100);
        assert_eq!(receipt.fee, 33);
        assert_eq!(receipt.burned, 67);
    }

    #[test]
    fn test_split_extremes() {
        let (_, all_burn, _, _) = burner_with(0);
        let receipt = all_burn.split(500);
        assert_eq!(receipt.fee, 0);
        assert_eq!(receipt.burned, 500);

        let (_, all_fee, _, _) = burner_with(10_000);
        let receipt = all_fee.split(500);
        assert_eq!(receipt.fee, 500);
        assert_eq!(receipt.burned, 0);
    }

    #[tokio::test]
    async fn test_collect_moves_both_portions() {
        let (token, burner, sink, treasury) = burner_with(2_500);
        let agent = AgentId::random();
        token.mint(agent, 1_000);

        let receipt = burner.collect(agent, 200).await.unwrap();
        assert_eq!(receipt.fee, 50);
        assert_eq!(receipt.burned, 150);

        assert_eq!(token.balance_of(agent).await, 800);
        assert_eq!(token.balance_of(sink).await, 150);
        assert_eq!(token.balance_of(treasury).await, 50);
    }

    #[tokio::test]
    async fn test_collect_fails_without_funds() {
        let (token, burner, sink, treasury) = burner_with(2_500);
        let agent = AgentId::random();
        token.mint(agent, 10);

        assert!(burner.collect(agent, 200).await.is_err());
        assert_eq!(token.balance_of(sink).await, 0);
        assert_eq!(token.balance_of(treasury).await, 0);
    }

    #[tokio::test]
    async fn test_collect_records_fee_split_event() {
        let token = Arc::new(InMemoryToken::new());
        let log = Arc::new(InMemoryEventLog::new());
        let burner = FeeSplitBurner::new(
            token.clone(),
            log.clone(),
            Arc::new(ManualClock::new(7)),
            AgentId::random(),
            AgentId::random(),
            1_000,
        )
        .unwrap();
        let agent = AgentId::random();
        token.mint(agent, 100);

        burner.collect(agent, 100).await.unwrap();

        let records = log.query_by_kind(EventKind::FeeSplit).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].actor, agent);
        assert_eq!(records[0].chain_time, 7);
    }

    proptest! {
        #[test]
        fn prop_split_conserves_value(amount in any::<u128>(), fee_bps in 0u16..=10_000) {
            let token: Arc<dyn TokenTransfer> = Arc::new(InMemoryToken::new());
            let burner = FeeSplitBurner::new(
                token,
                Arc::new(InMemoryEventLog::new()),
                Arc::new(ManualClock::new(0)),
                AgentId::random(),
                AgentId::random(),
                fee_bps,
            )
            .unwrap();
            let receipt = burner.split(amount);
            prop_assert_eq!(receipt.burned + receipt.fee, amount);
            // Rounding bias: any remainder lands on the burn side, so a
            // below-100% fee never consumes the whole amount.
            if fee_bps < 10_000 && amount > 0 {
                prop_assert!(receipt.burned > 0);
            }
        }
    }
}
