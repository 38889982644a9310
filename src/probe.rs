//! RTT probe: one correlated request/reply attempt at a time
//!
//! A probe owns its channel endpoint and its correlation-id counter
//! exclusively, so no synchronization is needed. It issues exactly one
//! outstanding request, then suspends on the receive path with a deadline
//! until a response carrying the allocated id arrives or the timeout fires.

use crate::channel::ClientEndpoint;
use crate::error::Result;
use crate::models::{Request, Sample};
use crate::types::{create_payload, validate_payload, Outcome};
use std::time::Duration;
use tokio::time::{timeout_at, Instant as TokioInstant};

/// Single-client RTT probe over a channel endpoint.
pub struct RttProbe<E: ClientEndpoint> {
    endpoint: E,
    next_id: i32,
}

impl<E: ClientEndpoint> RttProbe<E> {
    /// Probe whose correlation ids start at 1.
    pub fn new(endpoint: E) -> Self {
        Self::with_first_id(endpoint, 1)
    }

    /// Probe with an explicit first correlation id. The fleet coordinator
    /// uses this to give every client a disjoint id region.
    pub fn with_first_id(endpoint: E, first_id: i32) -> Self {
        Self {
            endpoint,
            next_id: first_id,
        }
    }

    /// Allocate the next correlation id. Strictly increasing; wraps only on
    /// i32 overflow, which a single run does not approach.
    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Execute one request/reply attempt and produce exactly one sample.
    ///
    /// Timeouts and payload mismatches are recorded in the sample, never
    /// raised; only a broken channel propagates as an error. A timeout
    /// sample carries the timeout duration as its rtt for bookkeeping —
    /// statistics must exclude it.
    pub async fn attempt(&mut self, size: usize, iteration: u32, timeout: Duration) -> Result<Sample> {
        let id = self.allocate_id();
        let payload = create_payload(size);

        let deadline = TokioInstant::now() + timeout;
        let start = std::time::Instant::now();
        self.endpoint
            .send_request(Request {
                id,
                payload: payload.clone(),
            })
            .await?;

        loop {
            match timeout_at(deadline, self.endpoint.recv_response()).await {
                Err(_elapsed) => {
                    return Ok(Sample {
                        size,
                        iteration,
                        rtt: timeout,
                        outcome: Outcome::Timeout,
                    })
                }
                Ok(Err(e)) => return Err(e),
                Ok(Ok(response)) => {
                    if response.id != id {
                        // Late or foreign delivery; discard and keep waiting.
                        continue;
                    }
                    let rtt = start.elapsed();
                    let outcome = if validate_payload(&payload, &response.payload) {
                        Outcome::Ok
                    } else {
                        Outcome::PayloadMismatch
                    };
                    return Ok(Sample {
                        size,
                        iteration,
                        rtt,
                        outcome,
                    });
                }
            }
        }
    }

    /// Next id this probe would allocate; exposed for coordination checks.
    pub fn peek_next_id(&self) -> i32 {
        self.next_id
    }
}
