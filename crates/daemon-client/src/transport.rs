//! Pooled HTTP/1.1 transport with cancellation, deadlines and bounded retry.
//!
//! The executor owns the connection pool shared by every caller of one
//! client handle. Each attempt races the exchange (send and full body read)
//! against the caller's cancellation token and deadline, so a call never
//! outlives its [`RequestContext`].
//!
//! ## Retry rules
//!
//! A failed attempt is re-issued only when all of the following hold:
//!
//! - `request_retries` has not been used up;
//! - the verb is idempotent (see [`PreparedRequest::is_idempotent`]);
//! - the failure's [`RetryPolicy`] is retryable.
//!
//! A context that is cancelled or past its deadline stops the loop.
//!
//! Back-off starts at `retry_backoff` and doubles per attempt; a numeric
//! `Retry-After` header raises the delay to at least that many seconds,
//! capped at one minute.

use std::time::{Duration, Instant};

use api::{ClientError, Operation, RequestContext, Result, RetryPolicy};
use reqwest::header::RETRY_AFTER;
use tracing::Instrument;

use crate::request::PreparedRequest;
use crate::response::RawResponse;
use crate::settings::TransportOptions;

/// Upper bound on the back-off exponent.
const MAX_BACKOFF_SHIFT: u32 = 10;

/// Longest `Retry-After` the executor will honour.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Executes prepared requests against the daemon.
#[derive(Debug, Clone)]
pub struct TransportExecutor {
    client: reqwest::Client,
    options: TransportOptions,
}

impl TransportExecutor {
    /// Builds the connection pool described by `options`.
    pub fn new(options: &TransportOptions) -> Result<Self> {
        options
            .validate()
            .map_err(|err| ClientError::invalid(err.to_string()))?;

        let client = reqwest::Client::builder()
            .http1_only()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .pool_max_idle_per_host(options.max_conns_per_host)
            .pool_idle_timeout(options.idle_conn_timeout)
            .tcp_keepalive(options.keep_alive)
            .build()
            .map_err(|err| ClientError::invalid(format!("failed to build HTTP transport: {err}")))?;

        Ok(Self {
            client,
            options: options.clone(),
        })
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    /// Sends `request`, retrying transient failures of idempotent verbs.
    ///
    /// Returns the daemon's response whatever its status; classification is
    /// left to the caller. A context that is already cancelled or expired
    /// fails without touching the network.
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        request: &PreparedRequest,
    ) -> Result<RawResponse> {
        let operation = request.operation();
        let mut attempt: u32 = 0;

        loop {
            let span = tracing::debug_span!(
                "daemon_request",
                operation = %operation,
                attempt = attempt + 1
            );
            let outcome = self.attempt(ctx, request).instrument(span).await;

            let Some(delay) = self.retry_delay(ctx, request, attempt, &outcome) else {
                return outcome;
            };

            match &outcome {
                Ok(response) => tracing::warn!(
                    operation = %operation,
                    status = response.status,
                    delay_ms = delay.as_millis() as u64,
                    "daemon returned a transient status; retrying"
                ),
                Err(err) => tracing::warn!(
                    operation = %operation,
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "daemon request failed; retrying"
                ),
            }

            wait(ctx, operation, delay).await?;
            attempt += 1;
        }
    }

    async fn attempt(&self, ctx: &RequestContext, request: &PreparedRequest) -> Result<RawResponse> {
        let operation = request.operation();
        if ctx.is_cancelled() {
            return Err(cancelled(operation));
        }
        if ctx.is_expired() {
            return Err(timed_out(operation));
        }

        let mut builder = self
            .client
            .request(request.method().clone(), request.url())
            .headers(request.headers().clone());
        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        let started = Instant::now();
        let exchange = async {
            let response = builder
                .send()
                .await
                .map_err(|err| transport_error(operation, err))?;
            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let body = response
                .bytes()
                .await
                .map_err(|err| transport_error(operation, err))?;
            Ok::<_, ClientError>(RawResponse {
                status,
                headers,
                body: body.to_vec(),
            })
        };

        let outcome = tokio::select! {
            biased;
            _ = ctx.token().cancelled() => Err(cancelled(operation)),
            _ = deadline(ctx) => Err(timed_out(operation)),
            outcome = exchange => outcome,
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(response) => tracing::debug!(
                status = response.status,
                elapsed_ms,
                "daemon request completed"
            ),
            Err(err) => tracing::debug!(error = %err, elapsed_ms, "daemon request failed"),
        }
        outcome
    }

    /// Returns the back-off before the next attempt, or `None` to stop.
    fn retry_delay(
        &self,
        ctx: &RequestContext,
        request: &PreparedRequest,
        attempt: u32,
        outcome: &Result<RawResponse>,
    ) -> Option<Duration> {
        if attempt >= self.options.request_retries || !request.is_idempotent() {
            return None;
        }
        if ctx.is_cancelled() || ctx.is_expired() {
            return None;
        }

        let policy = match outcome {
            Ok(response) => match RetryPolicy::for_status(response.status) {
                RetryPolicy::Retryable { .. } => RetryPolicy::Retryable {
                    after: retry_after(response),
                },
                RetryPolicy::NonRetryable => RetryPolicy::NonRetryable,
            },
            Err(err) => err.retry_policy(),
        };

        match policy {
            RetryPolicy::Retryable { after } => {
                let backoff = self
                    .options
                    .retry_backoff
                    .saturating_mul(1 << attempt.min(MAX_BACKOFF_SHIFT));
                Some(after.map_or(backoff, |after| after.max(backoff)))
            }
            RetryPolicy::NonRetryable => None,
        }
    }
}

/// Sleeps for `delay` unless the context is cancelled or expires first.
async fn wait(ctx: &RequestContext, operation: &Operation, delay: Duration) -> Result<()> {
    tokio::select! {
        biased;
        _ = ctx.token().cancelled() => Err(cancelled(operation)),
        _ = deadline(ctx) => Err(timed_out(operation)),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}

/// Resolves when the context's deadline passes; never, if it has none.
async fn deadline(ctx: &RequestContext) {
    match ctx.deadline() {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

fn retry_after(response: &RawResponse) -> Option<Duration> {
    response
        .headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(|secs| Duration::from_secs(secs).min(MAX_RETRY_AFTER))
}

fn cancelled(operation: &Operation) -> ClientError {
    ClientError::Cancelled {
        operation: operation.clone(),
    }
}

fn timed_out(operation: &Operation) -> ClientError {
    ClientError::Timeout {
        operation: operation.clone(),
    }
}

fn transport_error(operation: &Operation, err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return timed_out(operation);
    }
    ClientError::Transport {
        operation: operation.clone(),
        connect: err.is_connect(),
        source: Box::new(err),
    }
}
