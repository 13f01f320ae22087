//! Mirror sink that records facts as structured log events.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::ports::{MirrorSink, MirrorSinkError};
use crate::domain::{Order, PublicUser};

/// Logs every fact under the `mirror` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMirrorSink;

#[async_trait]
impl MirrorSink for TracingMirrorSink {
    fn name(&self) -> &str {
        "tracing"
    }

    async fn on_order_committed(&self, order: &Order) -> Result<(), MirrorSinkError> {
        let total: Decimal = order.lines().iter().map(|line| line.total()).sum();
        info!(
            target: "mirror",
            order_id = %order.id(),
            user_id = %order.user_id(),
            lines = order.lines().len(),
            total = %total,
            "order committed"
        );
        Ok(())
    }

    async fn on_user_registered(&self, user: &PublicUser) -> Result<(), MirrorSinkError> {
        info!(target: "mirror", user_id = %user.id, "user registered");
        Ok(())
    }
}
