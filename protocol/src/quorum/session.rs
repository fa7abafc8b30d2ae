//! # Quorum Signing Session
//!
//! The challenge/response loop every state-changing operation goes through:
//!
//! ```text
//! Idle -> AwaitingChallenge -> Signing -> Submitting -> AwaitingChallenge ...
//!                                                   \-> Succeeded | Failed
//! ```
//!
//! 1. POST the operation's open request.
//! 2. While the response carries a challenge `{id, hash}`: sign the decoded
//!    hash locally and POST it to `/api/signature-response`.
//! 3. The first response without a challenge ends the session.
//!
//! A `status: false` anywhere fails the session. The loop is bounded by
//! [`QuorumConfig::max_rounds`] signature submissions and by
//! [`QuorumConfig::deadline`], which also cancels an in-flight request.
//! Transport errors are returned as they are, never retried.

use serde_json::Value;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::{ExceededCause, QuorumError};
use super::messages::{signature_submission, Challenge, NodeResponse, ResultPayload};
use crate::config::{QuorumConfig, ENDPOINT_SIGNATURE_RESPONSE};
use crate::crypto::keys::RubixKeypair;
use crate::transport::Transport;

/// Where a session is in the protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundState {
    Idle,
    AwaitingChallenge,
    Signing,
    Submitting,
    Succeeded,
    Failed,
}

impl RoundState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RoundState::Succeeded | RoundState::Failed)
    }
}

/// The terminal response of a successful session.
#[derive(Clone, Debug, PartialEq)]
pub struct QuorumOutcome {
    pub message: Option<String>,
    pub result: Option<ResultPayload>,
    /// Signatures submitted to reach this outcome.
    pub rounds: u32,
}

impl QuorumOutcome {
    /// The result when it is a plain string.
    pub fn result_text(&self) -> Option<&str> {
        match &self.result {
            Some(ResultPayload::Text(s)) => Some(s),
            _ => None,
        }
    }

    fn from_response(response: NodeResponse, rounds: u32) -> Self {
        Self {
            message: response.message,
            result: response.result,
            rounds,
        }
    }
}

/// One signing operation against one node. Single use.
pub struct QuorumSession<'a> {
    transport: &'a dyn Transport,
    keypair: &'a RubixKeypair,
    config: QuorumConfig,
    state: RoundState,
    rounds: u32,
    operation_id: Uuid,
}

impl<'a> QuorumSession<'a> {
    pub fn new(transport: &'a dyn Transport, keypair: &'a RubixKeypair, config: QuorumConfig) -> Self {
        Self {
            transport,
            keypair,
            config,
            state: RoundState::Idle,
            rounds: 0,
            operation_id: Uuid::new_v4(),
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    /// Signatures submitted so far.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Correlates every log line of this session.
    pub fn operation_id(&self) -> Uuid {
        self.operation_id
    }

    /// Send the open request and drive the loop to a terminal response.
    ///
    /// If the open response is already terminal it is returned as-is and
    /// nothing is signed.
    pub async fn open(&mut self, endpoint: &str, body: &Value) -> Result<QuorumOutcome, QuorumError> {
        self.run(endpoint, body, false).await
    }

    /// Like [`open`](Self::open), but the open response must carry a
    /// challenge. Used where the node always asks for a signature.
    pub async fn open_for_challenge(
        &mut self,
        endpoint: &str,
        body: &Value,
    ) -> Result<QuorumOutcome, QuorumError> {
        self.run(endpoint, body, true).await
    }

    async fn run(
        &mut self,
        endpoint: &str,
        body: &Value,
        require_challenge: bool,
    ) -> Result<QuorumOutcome, QuorumError> {
        if self.state != RoundState::Idle {
            return Err(QuorumError::SessionFinished);
        }
        info!(operation_id = %self.operation_id, endpoint, "signing session started");
        let deadline = Instant::now() + self.config.deadline;

        let result = self.drive(endpoint, body, require_challenge, deadline).await;
        match &result {
            Ok(outcome) => {
                self.transition(RoundState::Succeeded);
                info!(
                    operation_id = %self.operation_id,
                    endpoint,
                    rounds = outcome.rounds,
                    "signing session succeeded"
                );
            }
            Err(e) => {
                self.transition(RoundState::Failed);
                warn!(
                    operation_id = %self.operation_id,
                    endpoint,
                    rounds = self.rounds,
                    error = %e,
                    "signing session failed"
                );
            }
        }
        result
    }

    async fn drive(
        &mut self,
        endpoint: &str,
        body: &Value,
        require_challenge: bool,
        deadline: Instant,
    ) -> Result<QuorumOutcome, QuorumError> {
        self.transition(RoundState::AwaitingChallenge);
        let raw = self.post(endpoint, body, deadline).await?;
        let response = NodeResponse::from_value(endpoint, raw)?;
        if !response.status {
            return Err(rejected(endpoint, None, response));
        }

        let mut challenge = match response.challenge()? {
            Some(challenge) => challenge,
            None if require_challenge => {
                return Err(QuorumError::UnexpectedShape {
                    endpoint: endpoint.to_string(),
                    message: "expected a signature challenge".into(),
                })
            }
            None => return Ok(QuorumOutcome::from_response(response, 0)),
        };

        loop {
            if self.rounds >= self.config.max_rounds {
                return Err(QuorumError::Exceeded {
                    cause: ExceededCause::RoundLimit,
                    rounds: self.rounds,
                });
            }

            let submission = self.sign_challenge(&challenge)?;

            self.transition(RoundState::Submitting);
            let raw = self
                .post(ENDPOINT_SIGNATURE_RESPONSE, &submission, deadline)
                .await?;
            self.rounds += 1;

            self.transition(RoundState::AwaitingChallenge);
            let response = NodeResponse::from_value(ENDPOINT_SIGNATURE_RESPONSE, raw)?;
            if !response.status {
                return Err(rejected(
                    ENDPOINT_SIGNATURE_RESPONSE,
                    Some(challenge.request_id),
                    response,
                ));
            }
            match response.challenge()? {
                Some(next) => challenge = next,
                None => return Ok(QuorumOutcome::from_response(response, self.rounds)),
            }
        }
    }

    fn sign_challenge(&mut self, challenge: &Challenge) -> Result<Value, QuorumError> {
        self.transition(RoundState::Signing);
        debug!(
            operation_id = %self.operation_id,
            request_id = %challenge.request_id,
            round = self.rounds + 1,
            "signing challenge"
        );
        let signature = self.keypair.sign(&challenge.message_hash)?;
        Ok(signature_submission(&challenge.request_id, &signature))
    }

    async fn post(&self, endpoint: &str, body: &Value, deadline: Instant) -> Result<Value, QuorumError> {
        let exceeded = || QuorumError::Exceeded {
            cause: ExceededCause::Deadline,
            rounds: self.rounds,
        };
        if Instant::now() >= deadline {
            return Err(exceeded());
        }
        match timeout_at(deadline, self.transport.post(endpoint, body)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(exceeded()),
        }
    }

    fn transition(&mut self, next: RoundState) {
        debug!(
            operation_id = %self.operation_id,
            from = ?self.state,
            to = ?next,
            "round state"
        );
        self.state = next;
    }
}

fn rejected(endpoint: &str, request_id: Option<String>, response: NodeResponse) -> QuorumError {
    QuorumError::Rejected {
        endpoint: endpoint.to_string(),
        request_id,
        message: response.message.unwrap_or_default(),
    }
}
