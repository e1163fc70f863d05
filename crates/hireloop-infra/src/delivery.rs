//! Delivery over the in-process bus or an HTTP callback.

use std::sync::Arc;
use std::time::Duration;

use hireloop_core::delivery::{Delivery, DeliveryError};
use hireloop_core::message::{Envelope, MessageBus};
use hireloop_types::inbound::ReplyRoute;
use tracing::{debug, warn};

/// Sends each payload over the transport its [`ReplyRoute`] names.
pub struct RoutedDelivery {
    bus: Arc<MessageBus>,
    client: reqwest::Client,
    timeout: Duration,
}

impl RoutedDelivery {
    pub fn new(bus: Arc<MessageBus>, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            bus,
            client,
            timeout,
        })
    }

    async fn post(&self, url: &str, payload: &serde_json::Value) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Timeout(self.timeout)
                } else {
                    DeliveryError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "callback rejected payload");
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(url, "callback accepted payload");
        Ok(())
    }
}

impl Delivery for RoutedDelivery {
    async fn deliver(
        &self,
        from: &str,
        route: &ReplyRoute,
        payload: &serde_json::Value,
    ) -> Result<(), DeliveryError> {
        match route {
            ReplyRoute::Direct { agent_id } => {
                self.bus
                    .send(Envelope::new(from, agent_id.as_str(), payload.clone()))?;
                Ok(())
            }
            ReplyRoute::Callback { url } => self.post(url, payload).await,
        }
    }

    fn is_reachable(&self, route: &ReplyRoute) -> bool {
        match route {
            ReplyRoute::Direct { agent_id } => self.bus.is_registered(agent_id),
            ReplyRoute::Callback { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use hireloop_core::message::MessageError;
    use serde_json::json;

    use super::*;

    fn delivery(bus: &Arc<MessageBus>) -> RoutedDelivery {
        RoutedDelivery::new(Arc::clone(bus), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn direct_route_lands_in_mailbox() {
        let bus = Arc::new(MessageBus::new());
        let mut rx = bus.register("applicant");
        let route = ReplyRoute::Direct {
            agent_id: "applicant".to_string(),
        };

        let delivery = delivery(&bus);
        assert!(delivery.is_reachable(&route));
        delivery
            .deliver("hiring-manager", &route, &json!({"message": "Hello", "done": false}))
            .await
            .unwrap();

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.from, "hiring-manager");
        assert_eq!(envelope.to, "applicant");
        assert_eq!(envelope.payload["message"], "Hello");
    }

    #[tokio::test]
    async fn unknown_agent_is_unreachable() {
        let bus = Arc::new(MessageBus::new());
        let route = ReplyRoute::Direct {
            agent_id: "nobody".to_string(),
        };

        let delivery = delivery(&bus);
        assert!(!delivery.is_reachable(&route));

        let err = delivery
            .deliver("hiring-manager", &route, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Bus(MessageError::NotRegistered(_))));
    }

    #[tokio::test]
    async fn callback_routes_count_as_reachable() {
        let bus = Arc::new(MessageBus::new());
        let route = ReplyRoute::Callback {
            url: "https://example.invalid/hook".to_string(),
        };
        assert!(delivery(&bus).is_reachable(&route));
    }

    /// Serve `app` on an ephemeral port and return the callback URL.
    async fn serve(app: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/hook")
    }

    #[tokio::test]
    async fn callback_posts_payload_as_json() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let app = axum::Router::new().route(
            "/hook",
            axum::routing::post(move |axum::Json(body): axum::Json<serde_json::Value>| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(body);
                    "ok"
                }
            }),
        );
        let route = ReplyRoute::Callback {
            url: serve(app).await,
        };

        let bus = Arc::new(MessageBus::new());
        delivery(&bus)
            .deliver("hiring-manager", &route, &json!({"message": "Hello", "concluded": false}))
            .await
            .unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received, json!({"message": "Hello", "concluded": false}));
    }

    #[tokio::test]
    async fn non_success_status_is_rejected() {
        let app = axum::Router::new().route(
            "/hook",
            axum::routing::post(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let route = ReplyRoute::Callback {
            url: serve(app).await,
        };

        let bus = Arc::new(MessageBus::new());
        let err = delivery(&bus)
            .deliver("hiring-manager", &route, &json!({"message": "x", "concluded": true}))
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Rejected { status: 500 }));
    }

    #[tokio::test]
    async fn slow_callback_times_out_with_exact_duration() {
        let app = axum::Router::new().route(
            "/hook",
            axum::routing::post(|| async {
                tokio::time::sleep(Duration::from_millis(1500)).await;
                "late"
            }),
        );
        let route = ReplyRoute::Callback {
            url: serve(app).await,
        };

        let bus = Arc::new(MessageBus::new());
        let delivery = RoutedDelivery::new(bus, Duration::from_millis(500)).unwrap();
        let err = delivery
            .deliver("applicant", &route, &json!({"kind": "turn"}))
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Timeout(d) if d == Duration::from_millis(500)));
        assert_eq!(err.to_string(), "callback timed out after 500ms");
    }

    #[tokio::test]
    async fn refused_callback_is_an_http_error() {
        let bus = Arc::new(MessageBus::new());
        let route = ReplyRoute::Callback {
            url: "http://127.0.0.1:1/hook".to_string(),
        };

        let err = delivery(&bus)
            .deliver("hiring-manager", &route, &json!({"message": "x", "done": true}))
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Http(_) | DeliveryError::Timeout(_)));
    }
}
