//! Port for downstream mirror stores fed with committed facts.
//!
//! Sinks are best-effort consumers. Their failures are logged by the mirror
//! dispatcher and never reach the request that produced the fact.

use async_trait::async_trait;

use crate::domain::{Order, PublicUser};

use super::define_port_error;

define_port_error! {
    /// Errors raised while delivering a fact to a sink.
    pub enum MirrorSinkError {
        /// The downstream store rejected or never received the fact.
        Delivery { message: String } => "mirror delivery failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MirrorSink: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// A purchase committed.
    async fn on_order_committed(&self, order: &Order) -> Result<(), MirrorSinkError>;

    /// A user registered.
    async fn on_user_registered(&self, user: &PublicUser) -> Result<(), MirrorSinkError>;
}
