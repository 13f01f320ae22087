//! Mirror sinks fed by the domain's mirror dispatcher.

mod tracing_sink;
mod webhook_sink;

pub use tracing_sink::TracingMirrorSink;
pub use webhook_sink::WebhookMirrorSink;
