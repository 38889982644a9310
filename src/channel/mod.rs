//! Message channel abstraction
//!
//! The measurement core consumes the transport only through the endpoint
//! traits below: publish a message, await the next inbound one. Delivery may
//! be dropped, delayed or duplicated; the probe relies on nothing beyond
//! per-id correlation. A real middleware binding implements these traits
//! out-of-crate; [`local::LocalBus`] provides the in-process implementation
//! used by the bundled binary and the test suite.

pub mod local;

pub use local::{LocalBus, LocalClientEndpoint, LocalResponderEndpoint};

use crate::error::Result;
use crate::models::{Request, Response};
use async_trait::async_trait;

/// Client-side channel capability: send requests, receive responses.
#[async_trait]
pub trait ClientEndpoint: Send {
    /// Publish one request to the request topic.
    async fn send_request(&mut self, request: Request) -> Result<()>;

    /// Await the next response visible to this endpoint.
    ///
    /// Responses for other correlation ids may be delivered here; the caller
    /// filters by id. Returns an error only when the channel itself is gone.
    async fn recv_response(&mut self) -> Result<Response>;
}

/// Responder-side channel capability: receive requests, send responses.
#[async_trait]
pub trait ResponderEndpoint: Send {
    /// Await the next inbound request. `Ok(None)` means the request topic
    /// closed (every publisher is gone) and the responder should stop.
    async fn recv_request(&mut self) -> Result<Option<Request>>;

    /// Publish one response to the response topic.
    async fn send_response(&mut self, response: Response) -> Result<()>;
}

/// Source of client endpoints, one per sweep client.
///
/// Endpoint creation is the "client setup" step of the error taxonomy: a
/// failure here is fatal to that client and to no one else.
pub trait EndpointProvider: Send + Sync {
    type Endpoint: ClientEndpoint + 'static;

    fn client_endpoint(&self, client_id: &str) -> Result<Self::Endpoint>;
}
