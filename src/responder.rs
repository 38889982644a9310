//! Echo responder: answers every request with an identical response
//!
//! The reply rule is the pure function [`echo`]; the responder itself is just
//! that function registered against the channel's inbound path. It keeps no
//! per-request state, so concurrent clients are answered independently in
//! whatever order their requests arrive.

use crate::channel::ResponderEndpoint;
use crate::error::Result;
use crate::logging::Logger;
use crate::models::{Request, Response};
use tokio::sync::watch;

/// The echo mapping: same id, same payload, no transformation.
pub fn echo(request: &Request) -> Response {
    Response {
        id: request.id,
        payload: request.payload.clone(),
    }
}

/// Serve loop wrapping [`echo`] around a responder endpoint.
pub struct EchoResponder<E: ResponderEndpoint> {
    endpoint: E,
    logger: Logger,
    served: u64,
}

impl<E: ResponderEndpoint> EchoResponder<E> {
    pub fn new(endpoint: E, verbose: bool, debug: bool, color: bool) -> Self {
        Self {
            endpoint,
            logger: Logger::from_flags("responder", verbose, debug, color),
            served: 0,
        }
    }

    /// Answer requests until the shutdown signal is raised or the request
    /// topic closes (every client endpoint gone). Returns the number of
    /// requests served.
    pub async fn serve(mut self, mut shutdown: watch::Receiver<bool>) -> Result<u64> {
        self.logger.info("echo responder started");
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                inbound = self.endpoint.recv_request() => {
                    match inbound? {
                        Some(request) => {
                            self.served += 1;
                            self.logger.debug(format!(
                                "request {}: id={}, {} bytes",
                                self.served,
                                request.id,
                                request.payload.len()
                            ));
                            self.endpoint.send_response(echo(&request)).await?;
                        }
                        None => break,
                    }
                }
            }
        }
        self.logger.info(format!("echo responder stopped after {} requests", self.served));
        Ok(self.served)
    }
}
