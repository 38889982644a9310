//! In-process message bus with pub/sub topic semantics
//!
//! Mirrors the shape of a two-topic request/reply middleware: requests flow
//! over an mpsc "topic" into the single responder, responses are fanned out
//! over a broadcast "topic" to every client endpoint. A client therefore sees
//! every response on the bus, including those for other clients, and must
//! filter by correlation id — the same situation a real pub/sub transport
//! presents. A slow client that lags behind the broadcast loses the skipped
//! responses, which surfaces as attempt timeouts, not as errors.

use crate::channel::{ClientEndpoint, EndpointProvider, ResponderEndpoint};
use crate::error::{AppError, Result};
use crate::models::{Request, Response};
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::{broadcast, mpsc};

/// Default per-topic buffering, matching a keep-last resource limit of a
/// middleware configured for bounded history.
pub const DEFAULT_TOPIC_CAPACITY: usize = 1000;

/// In-process request/response bus shared by one responder and many clients.
pub struct LocalBus {
    request_tx: mpsc::Sender<Request>,
    request_rx: Mutex<Option<mpsc::Receiver<Request>>>,
    response_tx: broadcast::Sender<Response>,
}

impl LocalBus {
    pub fn new(capacity: usize) -> Self {
        let (request_tx, request_rx) = mpsc::channel(capacity);
        let (response_tx, _) = broadcast::channel(capacity);
        Self {
            request_tx,
            request_rx: Mutex::new(Some(request_rx)),
            response_tx,
        }
    }

    /// Take the responder endpoint. The bus carries a single responder;
    /// a second call fails with a channel setup error.
    pub fn responder_endpoint(&self) -> Result<LocalResponderEndpoint> {
        let rx = self
            .request_rx
            .lock()
            .map_err(|_| AppError::internal("bus responder slot poisoned"))?
            .take()
            .ok_or_else(|| AppError::channel_setup("responder endpoint already taken"))?;
        Ok(LocalResponderEndpoint {
            request_rx: rx,
            response_tx: self.response_tx.clone(),
        })
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new(DEFAULT_TOPIC_CAPACITY)
    }
}

impl EndpointProvider for LocalBus {
    type Endpoint = LocalClientEndpoint;

    fn client_endpoint(&self, _client_id: &str) -> Result<LocalClientEndpoint> {
        Ok(LocalClientEndpoint {
            request_tx: self.request_tx.clone(),
            response_rx: self.response_tx.subscribe(),
        })
    }
}

/// Client end of the bus: publishes requests, subscribes to all responses.
pub struct LocalClientEndpoint {
    request_tx: mpsc::Sender<Request>,
    response_rx: broadcast::Receiver<Response>,
}

#[async_trait]
impl ClientEndpoint for LocalClientEndpoint {
    async fn send_request(&mut self, request: Request) -> Result<()> {
        self.request_tx
            .send(request)
            .await
            .map_err(|_| AppError::transport("request topic closed"))
    }

    async fn recv_response(&mut self) -> Result<Response> {
        loop {
            match self.response_rx.recv().await {
                Ok(response) => return Ok(response),
                // Lagging drops the oldest responses; to the probe this is
                // indistinguishable from channel loss and ends in a timeout.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(AppError::transport("response topic closed"))
                }
            }
        }
    }
}

/// Responder end of the bus: consumes the request topic, publishes responses.
pub struct LocalResponderEndpoint {
    request_rx: mpsc::Receiver<Request>,
    response_tx: broadcast::Sender<Response>,
}

#[async_trait]
impl ResponderEndpoint for LocalResponderEndpoint {
    async fn recv_request(&mut self) -> Result<Option<Request>> {
        Ok(self.request_rx.recv().await)
    }

    async fn send_response(&mut self, response: Response) -> Result<()> {
        // A send with no live subscribers is a publish into the void, which
        // pub/sub semantics permit.
        let _ = self.response_tx.send(response);
        Ok(())
    }
}
