//! Confirmation monitoring
//!
//! Polls the RPC collaborator until a submitted transaction is observed, or
//! a bounded window elapses. One invocation produces exactly one terminal
//! status: the poll loop runs inside `tokio::time::timeout`, so the
//! timeout-versus-late-result race cannot double-resolve and no timer can
//! leak — cancelling the future cancels the loop with it.
//!
//! All polling is read-only; any number of monitors may run concurrently
//! over the same RPC collaborator.

use crate::rpc::LedgerRpc;
use crate::types::{TransactionRecord, TransactionStatus};
use metrics::counter;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// What the monitor watches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorTarget {
    /// A submission handle from a broadcast
    Handle(Signature),
    /// Fallback: the newest transaction referencing this key
    ///
    /// Used when the handle was lost (page reload, process restart) but the
    /// attempt's reference key is known.
    Reference(Pubkey),
}

/// Monitoring window and poll cadence
#[derive(Debug, Clone, Copy)]
pub struct MonitorOptions {
    /// Overall window before resolving `Timeout`
    pub timeout: Duration,
    /// Delay between poll ticks
    pub interval: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(60_000),
            interval: Duration::from_millis(1_000),
        }
    }
}

impl MonitorOptions {
    /// Build options from raw millisecond settings
    pub fn from_millis(timeout_ms: u64, interval_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            interval: Duration::from_millis(interval_ms),
        }
    }
}

/// Watch a target until it resolves or the window elapses
///
/// Resolves to exactly one of `Success`, `Failed`, or `Timeout`; never
/// `Pending` and never later than the window plus one poll interval.
/// `Timeout` means unknown, not failed — the transaction may still land,
/// so callers must not assume the payment did not happen.
pub async fn monitor(
    rpc: &dyn LedgerRpc,
    target: MonitorTarget,
    options: MonitorOptions,
) -> TransactionStatus {
    let status = match tokio::time::timeout(options.timeout, poll_until_observed(rpc, &target, options.interval)).await
    {
        Ok(status) => status,
        Err(_elapsed) => {
            debug!(?target, timeout_ms = options.timeout.as_millis() as u64, "monitor window elapsed");
            TransactionStatus::Timeout
        }
    };

    counter!(
        "shopchain_monitor_resolutions_total",
        "status" => match status {
            TransactionStatus::Success => "success",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Timeout => "timeout",
            TransactionStatus::Pending => "pending",
        }
    )
    .increment(1);
    status
}

/// Poll forever until the target is observed; cancellation comes from the
/// timeout wrapper
async fn poll_until_observed(
    rpc: &dyn LedgerRpc,
    target: &MonitorTarget,
    interval: Duration,
) -> TransactionStatus {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match lookup(rpc, target).await {
            Ok(Some(record)) => {
                debug!(?target, slot = record.slot, err = ?record.err, "transaction observed");
                return if record.succeeded() {
                    TransactionStatus::Success
                } else {
                    TransactionStatus::Failed
                };
            }
            Ok(None) => {}
            // Transient read failure; the next tick retries
            Err(e) => warn!(?target, "poll tick failed: {e}"),
        }
    }
}

async fn lookup(
    rpc: &dyn LedgerRpc,
    target: &MonitorTarget,
) -> crate::errors::Result<Option<TransactionRecord>> {
    match target {
        MonitorTarget::Handle(signature) => rpc.get_transaction(signature).await,
        MonitorTarget::Reference(reference) => {
            let records = rpc.signatures_for_address(reference).await?;
            // Entries come newest first
            Ok(records.into_iter().next().map(|r| TransactionRecord {
                slot: r.slot,
                err: r.err,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::OrchestratorError;
    use crate::types::SignatureRecord;
    use async_trait::async_trait;
    use solana_sdk::{hash::Hash, transaction::VersionedTransaction};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Fake RPC that starts answering after a fixed number of polls
    struct ScriptedRpc {
        polls: AtomicUsize,
        answer_after: usize,
        record: Option<TransactionRecord>,
        reference_records: Mutex<Vec<SignatureRecord>>,
        fail_first: bool,
    }

    impl ScriptedRpc {
        fn resolves(after: usize, record: TransactionRecord) -> Self {
            Self {
                polls: AtomicUsize::new(0),
                answer_after: after,
                record: Some(record),
                reference_records: Mutex::new(vec![]),
                fail_first: false,
            }
        }

        fn never_resolves() -> Self {
            Self {
                polls: AtomicUsize::new(0),
                answer_after: usize::MAX,
                record: None,
                reference_records: Mutex::new(vec![]),
                fail_first: false,
            }
        }
    }

    #[async_trait]
    impl LedgerRpc for ScriptedRpc {
        async fn latest_blockhash(&self) -> crate::errors::Result<Hash> {
            Ok(Hash::new_unique())
        }
        async fn send_transaction(
            &self,
            _tx: &VersionedTransaction,
        ) -> crate::errors::Result<Signature> {
            Ok(Signature::default())
        }
        async fn get_transaction(
            &self,
            _signature: &Signature,
        ) -> crate::errors::Result<Option<TransactionRecord>> {
            let poll = self.polls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && poll == 0 {
                return Err(OrchestratorError::rpc("transient"));
            }
            if poll >= self.answer_after {
                Ok(self.record.clone())
            } else {
                Ok(None)
            }
        }
        async fn signatures_for_address(
            &self,
            _address: &Pubkey,
        ) -> crate::errors::Result<Vec<SignatureRecord>> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reference_records.lock().unwrap().clone())
        }
        async fn get_balance(&self, _address: &Pubkey) -> crate::errors::Result<u64> {
            Ok(0)
        }
    }

    fn options(timeout_ms: u64, interval_ms: u64) -> MonitorOptions {
        MonitorOptions::from_millis(timeout_ms, interval_ms)
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_success_when_observed_clean() {
        let rpc = ScriptedRpc::resolves(2, TransactionRecord { slot: 10, err: None });
        let status = monitor(
            &rpc,
            MonitorTarget::Handle(Signature::default()),
            options(60_000, 1_000),
        )
        .await;
        assert_eq!(status, TransactionStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_failed_on_error_marker() {
        let rpc = ScriptedRpc::resolves(
            0,
            TransactionRecord {
                slot: 10,
                err: Some("custom program error: 0x1771".to_string()),
            },
        );
        let status = monitor(
            &rpc,
            MonitorTarget::Handle(Signature::default()),
            options(60_000, 1_000),
        )
        .await;
        assert_eq!(status, TransactionStatus::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_within_bound() {
        let rpc = ScriptedRpc::never_resolves();
        let started = tokio::time::Instant::now();

        let status = monitor(
            &rpc,
            MonitorTarget::Handle(Signature::default()),
            options(5_000, 1_000),
        )
        .await;

        assert_eq!(status, TransactionStatus::Timeout);
        // Never hangs past the window plus one interval
        assert!(started.elapsed() <= Duration::from_millis(6_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_result_does_not_change_resolved_status() {
        // Resolution arrives on poll 100; the window allows ~5 polls
        let rpc = ScriptedRpc::resolves(100, TransactionRecord { slot: 1, err: None });
        let status = monitor(
            &rpc,
            MonitorTarget::Handle(Signature::default()),
            options(5_000, 1_000),
        )
        .await;
        assert_eq!(status, TransactionStatus::Timeout);

        // The loop was cancelled with the window; no further polls happen
        let polls_at_resolution = rpc.polls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(rpc.polls.load(Ordering::SeqCst), polls_at_resolution);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_poll_error_retries_next_tick() {
        let rpc = ScriptedRpc {
            fail_first: true,
            ..ScriptedRpc::resolves(1, TransactionRecord { slot: 3, err: None })
        };
        let status = monitor(
            &rpc,
            MonitorTarget::Handle(Signature::default()),
            options(60_000, 1_000),
        )
        .await;
        assert_eq!(status, TransactionStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reference_fallback_uses_newest_entry() {
        let rpc = ScriptedRpc::never_resolves();
        rpc.reference_records.lock().unwrap().push(SignatureRecord {
            signature: Signature::default(),
            slot: 42,
            err: None,
        });

        let status = monitor(
            &rpc,
            MonitorTarget::Reference(Pubkey::new_unique()),
            options(10_000, 1_000),
        )
        .await;
        assert_eq!(status, TransactionStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reference_fallback_empty_times_out() {
        let rpc = ScriptedRpc::never_resolves();
        let status = monitor(
            &rpc,
            MonitorTarget::Reference(Pubkey::new_unique()),
            options(3_000, 1_000),
        )
        .await;
        assert_eq!(status, TransactionStatus::Timeout);
    }
}
