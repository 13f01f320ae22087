//! Reqwest-backed mirror sink that POSTs facts to a webhook.
//!
//! Each fact is sent as `{ "kind": ..., "payload": ... }` with the current
//! trace identifier in the `trace-id` header. Non-2xx responses are delivery
//! failures; the dispatcher logs them and moves on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;

use crate::domain::ports::{MirrorSink, MirrorSinkError};
use crate::domain::{Order, PublicUser, TRACE_ID_HEADER, TraceId};

const DEFAULT_USER_AGENT: &str = "ticketing-mirror/0.1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookBody<'a, T: Serialize> {
    kind: &'static str,
    payload: &'a T,
}

/// Mirror sink that forwards facts to one HTTP endpoint.
pub struct WebhookMirrorSink {
    client: Client,
    endpoint: Url,
}

impl WebhookMirrorSink {
    /// Build a sink with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    async fn post<T: Serialize + Sync>(
        &self,
        kind: &'static str,
        payload: &T,
    ) -> Result<(), MirrorSinkError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&WebhookBody { kind, payload });
        if let Some(trace_id) = TraceId::current() {
            request = request.header(TRACE_ID_HEADER, trace_id.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|err| MirrorSinkError::delivery(format!("webhook transport error: {err}")))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(MirrorSinkError::delivery(format!(
                "webhook responded with status {}",
                status.as_u16()
            )))
        }
    }
}

#[async_trait]
impl MirrorSink for WebhookMirrorSink {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn on_order_committed(&self, order: &Order) -> Result<(), MirrorSinkError> {
        self.post("order_committed", order).await
    }

    async fn on_user_registered(&self, user: &PublicUser) -> Result<(), MirrorSinkError> {
        self.post("user_registered", user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserId, UserProfile};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn body_wraps_payload_with_kind() {
        let user = PublicUser {
            id: UserId::new("ada@example.com").expect("user id"),
            profile: UserProfile::default(),
        };
        let body = serde_json::to_value(WebhookBody {
            kind: "user_registered",
            payload: &user,
        })
        .expect("serialise body");

        assert_eq!(body.get("kind"), Some(&json!("user_registered")));
        assert_eq!(body.pointer("/payload/id"), Some(&json!("ada@example.com")));
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_endpoints_are_delivery_errors() {
        let endpoint = Url::parse("http://127.0.0.1:9/mirror").expect("valid url");
        let sink = WebhookMirrorSink::new(endpoint, Duration::from_millis(200)).expect("client");
        let user = PublicUser {
            id: UserId::new("ada@example.com").expect("user id"),
            profile: UserProfile::default(),
        };

        let err = sink.on_user_registered(&user).await.expect_err("no listener");
        assert!(matches!(err, MirrorSinkError::Delivery { .. }));
    }
}
