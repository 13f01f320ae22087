//! Post-commit fan-out of core facts to downstream mirror sinks.
//!
//! Services publish a [`CoreFact`] onto a bounded channel after their own
//! transaction commits. A single [`MirrorDispatcher`] task drains the channel
//! and hands each fact to every sink. Publishing never blocks: when the queue
//! is full the fact is dropped with a warning so a slow mirror cannot hold up
//! a purchase.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::ports::{MirrorSink, MirrorSinkError};
use crate::domain::{Order, PublicUser, TraceId};

/// Fact emitted by the core after a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreFact {
    /// An order was written to the ledger.
    OrderCommitted(Order),
    /// A user account was created.
    UserRegistered(PublicUser),
}

impl CoreFact {
    fn kind(&self) -> &'static str {
        match self {
            Self::OrderCommitted(_) => "order_committed",
            Self::UserRegistered(_) => "user_registered",
        }
    }
}

/// Fact plus the trace identifier of the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactEnvelope {
    pub fact: CoreFact,
    pub trace_id: Option<TraceId>,
}

/// Create a publisher and the receiving end for a [`MirrorDispatcher`].
///
/// A zero capacity is raised to one.
pub fn mirror_channel(capacity: usize) -> (MirrorPublisher, mpsc::Receiver<FactEnvelope>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (
        MirrorPublisher {
            sender: Some(sender),
        },
        receiver,
    )
}

/// Cheap, cloneable handle used by services to emit facts.
#[derive(Debug, Clone, Default)]
pub struct MirrorPublisher {
    sender: Option<mpsc::Sender<FactEnvelope>>,
}

impl MirrorPublisher {
    /// Publisher that discards every fact.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Queue a fact for delivery, capturing the current trace identifier.
    ///
    /// Returns `false` when the fact was dropped.
    pub fn publish(&self, fact: CoreFact) -> bool {
        let Some(sender) = &self.sender else {
            return false;
        };
        let kind = fact.kind();
        let envelope = FactEnvelope {
            fact,
            trace_id: TraceId::current(),
        };
        match sender.try_send(envelope) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(fact = kind, "mirror queue full; dropping fact");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(fact = kind, "mirror dispatcher stopped; dropping fact");
                false
            }
        }
    }
}

/// Background task delivering facts to every registered sink.
pub struct MirrorDispatcher {
    receiver: mpsc::Receiver<FactEnvelope>,
    sinks: Vec<Arc<dyn MirrorSink>>,
}

impl MirrorDispatcher {
    /// Dispatcher reading from `receiver` and fanning out to `sinks`.
    pub fn new(receiver: mpsc::Receiver<FactEnvelope>, sinks: Vec<Arc<dyn MirrorSink>>) -> Self {
        Self { receiver, sinks }
    }

    /// Drain the channel until every publisher has been dropped.
    pub async fn run(mut self) {
        while let Some(envelope) = self.receiver.recv().await {
            self.deliver(envelope).await;
        }
        debug!("mirror dispatcher stopped");
    }

    async fn deliver(&self, envelope: FactEnvelope) {
        let FactEnvelope { fact, trace_id } = envelope;
        let deliveries = self.sinks.iter().map(|sink| {
            let fact = &fact;
            TraceId::scope_optional(trace_id, async move {
                if let Err(error) = Self::deliver_to(sink.as_ref(), fact).await {
                    warn!(
                        sink = sink.name(),
                        fact = fact.kind(),
                        error = %error,
                        "mirror sink failed"
                    );
                }
            })
        });
        join_all(deliveries).await;
    }

    async fn deliver_to(sink: &dyn MirrorSink, fact: &CoreFact) -> Result<(), MirrorSinkError> {
        match fact {
            CoreFact::OrderCommitted(order) => sink.on_order_committed(order).await,
            CoreFact::UserRegistered(user) => sink.on_user_registered(user).await,
        }
    }
}
