// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-request sequencing: access, generation, delivery.

use std::sync::Arc;
use std::time::Instant;

use reelgen_access::AccessGuard;
use reelgen_config::ReelgenConfig;
use reelgen_core::{
    ErrorKind, FileRelay, GenerationRequest, MessageSurface, ReelgenError, Transport, UserId,
    VideoProvider,
};
use reelgen_delivery::DeliveryManager;
use reelgen_provider::RequestClient;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::inflight::InFlightRegistry;
use crate::messages::{self, user_message};
use crate::status;

/// Uniform result of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub succeeded: bool,
    /// Set once delivery was attempted.
    pub transport: Option<Transport>,
    pub error_kind: Option<ErrorKind>,
    /// Reply shown to the requester on failure.
    pub message: Option<String>,
}

impl PipelineOutcome {
    fn delivered(transport: Transport) -> Self {
        Self {
            succeeded: true,
            transport: Some(transport),
            error_kind: None,
            message: None,
        }
    }

    fn failed(error: &ReelgenError, transport: Option<Transport>) -> Self {
        Self {
            succeeded: false,
            transport,
            error_kind: Some(error.kind()),
            message: Some(user_message(error)),
        }
    }
}

/// Runs requests through the access guard, the video provider, and the
/// delivery manager. Shared across concurrent requests behind an `Arc`.
pub struct Orchestrator {
    config: ReelgenConfig,
    guard: AccessGuard,
    client: RequestClient,
    provider: Arc<dyn VideoProvider>,
    delivery: DeliveryManager,
    in_flight: InFlightRegistry,
}

impl Orchestrator {
    pub fn new(config: ReelgenConfig) -> Result<Self, ReelgenError> {
        let client = RequestClient::new(&config.api)?;
        let delivery = DeliveryManager::new(&config.delivery, *client.policy())?;
        let provider: Arc<dyn VideoProvider> = Arc::new(client.clone());

        Ok(Self {
            guard: AccessGuard::new(&config.access),
            client,
            provider,
            delivery,
            in_flight: InFlightRegistry::new(),
            config,
        })
    }

    /// Replaces the video provider.
    pub fn with_provider(mut self, provider: Arc<dyn VideoProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// Replaces the relay target.
    pub fn with_relay(mut self, relay: Arc<dyn FileRelay>) -> Self {
        self.delivery = self.delivery.with_relay(relay);
        self
    }

    pub fn config(&self) -> &ReelgenConfig {
        &self.config
    }

    pub fn access_guard(&self) -> &AccessGuard {
        &self.guard
    }

    pub fn delivery(&self) -> &DeliveryManager {
        &self.delivery
    }

    pub fn in_flight(&self) -> &InFlightRegistry {
        &self.in_flight
    }

    /// Handles one request end to end and reports the result to `surface`.
    ///
    /// Failures are answered with a short text reply; a cancelled request
    /// gets no reply since its origin is gone.
    pub async fn handle(
        &self,
        request: GenerationRequest,
        surface: &dyn MessageSurface,
        cancel: &CancellationToken,
    ) -> PipelineOutcome {
        let started = Instant::now();
        let outcome = self.run(&request, surface, cancel).await;

        match &outcome {
            Ok(transport) => {
                info!(
                    user_id = %request.user_id,
                    transport = %transport,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request completed"
                );
                PipelineOutcome::delivered(*transport)
            }
            Err((error, transport)) => {
                warn!(
                    user_id = %request.user_id,
                    kind = %error.kind(),
                    error = %error,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request failed"
                );
                let result = PipelineOutcome::failed(error, *transport);
                if error.kind() != ErrorKind::Cancelled
                    && let Some(text) = &result.message
                {
                    reply(surface, text).await;
                }
                result
            }
        }
    }

    async fn run(
        &self,
        request: &GenerationRequest,
        surface: &dyn MessageSurface,
        cancel: &CancellationToken,
    ) -> Result<Transport, (ReelgenError, Option<Transport>)> {
        if !self.config.agent.enabled {
            return Err((ReelgenError::Disabled, None));
        }

        let decision = self.guard.check(request.group_id.as_ref(), &request.user_id);
        if !decision.allowed {
            return Err((
                ReelgenError::AccessDenied {
                    reason: decision.reason,
                },
                None,
            ));
        }

        // Released on every return path below.
        let Some(slot) = self.in_flight.try_acquire(&request.user_id) else {
            return Err((ReelgenError::Busy, None));
        };

        if request.image_bytes().is_none() {
            return Err((ReelgenError::MissingImage, None));
        }

        info!(
            user_id = %request.user_id,
            group_id = request.group_id.as_ref().map(|g| g.0.as_str()).unwrap_or("-"),
            task_id = slot.task_id(),
            prompt = %truncate(&request.prompt, 40),
            "generation accepted"
        );
        reply(surface, messages::ACCEPTED).await;

        let media = self
            .provider
            .generate(request, cancel)
            .await
            .map_err(|e| (e, None))?;
        debug!(task_id = slot.task_id(), url = %media.video_url, "media extracted");

        self.delivery
            .execute(&media, surface, cancel)
            .await
            .map_err(|failure| (failure.error, Some(failure.transport)))
    }

    /// Status report with a live API probe.
    pub async fn status_report(&self) -> String {
        let probe = self.client.probe().await;
        status::status_report(&self.config, &probe)
    }

    /// [`status_report`](Self::status_report), restricted to admin users.
    pub async fn admin_status(&self, user: &UserId) -> String {
        if !self.guard.is_admin(user) {
            return messages::ADMIN_ONLY.to_string();
        }
        self.status_report().await
    }

    pub fn help_text(&self) -> String {
        status::help_text(&self.config)
    }

    /// Sweeps stale cache files and drops elapsed rate windows.
    pub async fn maintenance(&self) -> Result<usize, ReelgenError> {
        if let Some(limiter) = self.guard.rate_limiter() {
            let pruned = limiter.prune_expired_at(Instant::now());
            debug!(pruned, "rate windows pruned");
        }
        self.delivery.sweep().await
    }
}

async fn reply(surface: &dyn MessageSurface, text: &str) {
    if let Err(e) = surface.send_text(text).await {
        warn!(surface = surface.name(), error = %e, "failed to send reply");
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
