//! Shared helpers for HTTP handler tests.

use std::sync::Arc;

use actix_web::web;
use serde_json::Value;

use crate::domain::ports::{
    MockAnalyticsQuery, MockEventQuery, MockOrderQuery, MockPurchaseCommand,
    MockRegistrationCommand,
};
use crate::inbound::http::state::HttpState;

/// Driving-port mocks; tests set expectations on the ones they exercise.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub purchases: MockPurchaseCommand,
    pub events: MockEventQuery,
    pub registration: MockRegistrationCommand,
    pub analytics: MockAnalyticsQuery,
    pub orders: MockOrderQuery,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            purchases: Arc::new(self.purchases),
            events: Arc::new(self.events),
            registration: Arc::new(self.registration),
            analytics: Arc::new(self.analytics),
            orders: Arc::new(self.orders),
        })
    }
}

/// Read `details.code` from an error envelope.
pub(crate) fn detail_code(body: &Value) -> Option<&str> {
    body.get("details")
        .and_then(|details| details.get("code"))
        .and_then(Value::as_str)
}
