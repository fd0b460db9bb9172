//! Request gateway: decode, dispatch, respond.
//!
//! Frames are handled strictly one at a time. A frame that fails to decode
//! is counted and dropped; it never stops the gateway. Every decoded frame
//! produces exactly one response, delivered best-effort.

use std::sync::Arc;

use crossbeam_channel::{select, Receiver};
use tracing::{debug, info, warn};

use crate::core::clock::StopCause;
use crate::core::context::ControllerContext;
use crate::core::directory::Registration;
use crate::core::engine::AdmissionEngine;
use crate::core::stats::{GatewayCounters, GatewayStats};
use crate::infra::mailbox::Mailbox;
use crate::infra::queue::InboundFrame;
use crate::protocol::{Message, RegisterMessage, ReserveMessage, Response};

/// Serial dispatcher between the inbound queue and the controller context.
pub struct RequestGateway<M> {
    ctx: Arc<ControllerContext>,
    mailbox: M,
    counters: GatewayCounters,
}

impl<M: Mailbox> RequestGateway<M> {
    /// Create a gateway over `ctx` answering through `mailbox`.
    pub fn new(ctx: Arc<ControllerContext>, mailbox: M) -> Self {
        Self {
            ctx,
            mailbox,
            counters: GatewayCounters::default(),
        }
    }

    /// Snapshot of the gateway counters.
    pub fn stats(&self) -> GatewayStats {
        self.counters.snapshot()
    }

    /// Handle one frame off the inbound queue.
    ///
    /// A frame the transport already refused is counted as malformed.
    pub fn handle_inbound(&mut self, frame: InboundFrame) -> Option<Response> {
        match frame {
            InboundFrame::Line(line) => self.handle_frame(&line),
            InboundFrame::Rejected(e) => {
                GatewayCounters::bump(&self.counters.received);
                GatewayCounters::bump(&self.counters.malformed);
                warn!(error = %e, "dropping malformed frame");
                None
            }
        }
    }

    /// Decode one raw frame, dispatch it and deliver the response.
    ///
    /// Returns the response, or `None` when the frame was malformed.
    pub fn handle_frame(&mut self, frame: &str) -> Option<Response> {
        GatewayCounters::bump(&self.counters.received);
        let message = match Message::decode(frame) {
            Ok(message) => message,
            Err(e) => {
                GatewayCounters::bump(&self.counters.malformed);
                warn!(error = %e, "dropping malformed frame");
                return None;
            }
        };

        let response = self.dispatch(&message);
        self.deliver(message.response_channel_id(), &response);
        Some(response)
    }

    /// Route a decoded message to the directory or the admission engine.
    pub fn dispatch(&self, message: &Message) -> Response {
        match message {
            Message::Register(register) => self.register(register),
            Message::Reserve(reserve) => self.reserve(reserve),
        }
    }

    fn register(&self, message: &RegisterMessage) -> Response {
        GatewayCounters::bump(&self.counters.registrations);
        let hour = self.ctx.ledger.current_hour();
        let outcome = self.ctx.directory.register(
            &message.agent_name,
            &message.response_channel_id,
            hour,
        );
        match outcome {
            Registration::New => info!(
                agent = %message.agent_name,
                channel = %message.response_channel_id,
                hour,
                "agent registered"
            ),
            Registration::Refreshed { previous_channel } => info!(
                agent = %message.agent_name,
                channel = %message.response_channel_id,
                previous = %previous_channel,
                hour,
                "agent re-registered"
            ),
        }
        Response::CurrentHour(hour)
    }

    fn reserve(&self, message: &ReserveMessage) -> Response {
        GatewayCounters::bump(&self.counters.reservations);
        if !self.ctx.directory.contains(&message.agent_name) {
            warn!(agent = %message.agent_name, "reservation from unregistered agent");
        }
        let decision = AdmissionEngine::new(&self.ctx).admit(message.to_request());
        Response::Decision(decision)
    }

    fn deliver(&mut self, channel: &str, response: &Response) {
        match self.mailbox.deliver(channel, response) {
            Ok(()) => {
                GatewayCounters::bump(&self.counters.delivered);
                debug!(channel, %response, "response delivered");
            }
            Err(e) => {
                GatewayCounters::bump(&self.counters.delivery_failures);
                warn!(channel, error = %e, "response delivery abandoned");
            }
        }
    }

    /// Serve frames until `shutdown` fires or every producer hangs up.
    ///
    /// Blocks on both channels at once, so it wakes exactly when a frame or
    /// the shutdown notice arrives.
    pub fn run(mut self, inbound: &Receiver<InboundFrame>, shutdown: &Receiver<StopCause>) -> GatewayStats {
        info!("request gateway started");
        loop {
            select! {
                recv(inbound) -> frame => match frame {
                    Ok(frame) => {
                        self.handle_inbound(frame);
                    }
                    Err(_) => {
                        debug!("inbound queue disconnected");
                        break;
                    }
                },
                recv(shutdown) -> cause => {
                    info!(?cause, "request gateway shutting down");
                    break;
                }
            }
        }
        self.stats()
    }
}
