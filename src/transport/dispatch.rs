//! The request dispatcher: every endpoint call funnels through
//! [`Transport::perform_request`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE, WARNING};
use tokio::sync::Notify;
use tokio::time::Instant;
use url::Url;
use uuid::Uuid;

use crate::config::schema::AuthConfig;
use crate::error::Error;
use crate::observability::hooks::{RequestEvent, RequestObserver, ResponseEvent};
use crate::observability::metrics;
use crate::pool::connection::Connection;
use crate::pool::pool::ConnectionPool;
use crate::resilience::retry::Retrier;
use crate::transport::decode::Decoder;
use crate::transport::request::{Body, RequestOptions};
use crate::transport::response::Response;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Dispatches requests against the pool with failover, retry/backoff,
/// and passive liveness updates.
pub struct Transport {
    pool: Arc<ConnectionPool>,
    http: reqwest::Client,
    retrier: Arc<dyn Retrier>,
    decoder: Arc<dyn Decoder>,
    auth: AuthConfig,
    default_timeout: Option<Duration>,
    observer: Option<Arc<dyn RequestObserver>>,
    sniff_trigger: Option<Arc<Notify>>,
}

impl Transport {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        pool: Arc<ConnectionPool>,
        http: reqwest::Client,
        retrier: Arc<dyn Retrier>,
        decoder: Arc<dyn Decoder>,
        auth: AuthConfig,
        default_timeout: Option<Duration>,
        observer: Option<Arc<dyn RequestObserver>>,
        sniff_trigger: Option<Arc<Notify>>,
    ) -> Self {
        Self {
            pool,
            http,
            retrier,
            decoder,
            auth,
            default_timeout,
            observer,
            sniff_trigger,
        }
    }

    /// Execute one logical request: select a connection, issue the HTTP
    /// call, classify the outcome, and retry per policy until success,
    /// a non-retryable error, budget exhaustion, or the deadline.
    pub async fn perform_request(&self, options: RequestOptions) -> Result<Response, Error> {
        let request_id = Uuid::new_v4().to_string();
        let retrier = options.retrier.clone().unwrap_or_else(|| self.retrier.clone());
        let deadline = options
            .timeout
            .or(self.default_timeout)
            .map(|t| Instant::now() + t);

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let conn = self.pool.select()?;
            let url = build_url(conn.url(), &options)?;

            tracing::debug!(
                request_id = %request_id,
                method = %options.method,
                url = %url,
                attempt,
                "dispatching request"
            );
            if let Some(observer) = &self.observer {
                observer.on_request(&RequestEvent {
                    request_id: &request_id,
                    method: &options.method,
                    url: &url,
                    attempt,
                });
            }

            let started = Instant::now();
            let outcome = self
                .execute(&conn, &url, &options, &request_id, deadline)
                .await;

            let error = match outcome {
                Ok(response) => {
                    // Reaching the node at all proves liveness, even when
                    // the status is an error.
                    self.pool.mark_alive(&conn);

                    let status = response.status().as_u16();
                    let headers = response.headers().clone();
                    let body = match response.bytes().await {
                        Ok(body) => body,
                        Err(source) => {
                            self.pool.mark_dead(&conn);
                            let error = Error::Connection {
                                url: url.to_string(),
                                source,
                            };
                            self.backoff_or_fail(&*retrier, attempt, error, deadline, &conn)
                                .await?;
                            continue;
                        }
                    };

                    self.emit_warnings(&headers);
                    metrics::record_request(
                        options.method.as_str(),
                        status,
                        conn.url().as_str(),
                        started.elapsed(),
                    );
                    if let Some(observer) = &self.observer {
                        observer.on_response(&ResponseEvent {
                            request_id: &request_id,
                            method: &options.method,
                            url: &url,
                            status,
                            elapsed: started.elapsed(),
                        });
                    }

                    if status < 400 || options.ignore_statuses.contains(&status) {
                        return Ok(Response::new(status, headers, body, self.decoder.clone()));
                    }

                    Error::Server {
                        status,
                        url: url.to_string(),
                        body,
                    }
                }
                Err(error) => {
                    // A failed exchange makes the node suspect; a spent
                    // deadline says nothing about it.
                    if error.is_connection() {
                        self.pool.mark_dead(&conn);
                        metrics::record_request(
                            options.method.as_str(),
                            0,
                            conn.url().as_str(),
                            started.elapsed(),
                        );
                    }
                    error
                }
            };

            self.backoff_or_fail(&*retrier, attempt, error, deadline, &conn)
                .await?;
        }
    }

    /// Build and send one HTTP attempt. Connection-level failures come
    /// back as [`Error::Connection`].
    async fn execute(
        &self,
        conn: &Connection,
        url: &Url,
        options: &RequestOptions,
        request_id: &str,
        deadline: Option<Instant>,
    ) -> Result<reqwest::Response, Error> {
        let mut builder = self.http.request(options.method.clone(), url.clone());

        let mut headers = options.headers.clone();
        if !headers.contains_key(REQUEST_ID_HEADER) {
            if let Ok(value) = HeaderValue::from_str(request_id) {
                headers.insert(REQUEST_ID_HEADER, value);
            }
        }
        if options.body.is_some() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        builder = builder.headers(headers);

        if let Some(basic) = &self.auth.basic {
            builder = builder.basic_auth(&basic.username, Some(&basic.password));
        } else if let Some(key) = &self.auth.api_key {
            builder = builder.header(reqwest::header::AUTHORIZATION, format!("ApiKey {key}"));
        }

        match &options.body {
            Some(Body::Raw(bytes)) => builder = builder.body(bytes.clone()),
            Some(Body::Json(value)) => builder = builder.json(value),
            None => {}
        }

        // The per-attempt timeout never reaches past the call deadline.
        if let Some(deadline) = deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(Error::DeadlineExceeded);
            }
            builder = builder.timeout(remaining);
        }

        builder.send().await.map_err(|source| {
            if source.is_timeout() && deadline_passed(deadline) {
                Error::DeadlineExceeded
            } else {
                Error::Connection {
                    url: conn.url().to_string(),
                    source,
                }
            }
        })
    }

    /// Consult the retry policy; either sleep out the backoff (bounded
    /// by the deadline) and return for another attempt, or convert the
    /// error into the caller-visible failure.
    async fn backoff_or_fail(
        &self,
        retrier: &dyn Retrier,
        attempt: u32,
        error: Error,
        deadline: Option<Instant>,
        conn: &Arc<Connection>,
    ) -> Result<(), Error> {
        if matches!(error, Error::DeadlineExceeded) {
            return Err(error);
        }

        match retrier.retry(attempt, &error) {
            Some(delay) => {
                if let Some(deadline) = deadline {
                    if Instant::now() + delay >= deadline {
                        tracing::debug!(attempt, "deadline leaves no room for backoff");
                        return Err(Error::DeadlineExceeded);
                    }
                }
                tracing::info!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "retrying after backoff"
                );
                metrics::record_retry(conn.url().as_str());
                tokio::time::sleep(delay).await;
                Ok(())
            }
            None => Err(self.give_up(attempt, error)),
        }
    }

    /// Shape the terminal error. Retryable-by-nature failures that ran
    /// out of budget report their attempt count; everything else (the
    /// dominant 4xx path) propagates as-is after its single attempt.
    fn give_up(&self, attempt: u32, error: Error) -> Error {
        let exhausted_budget = match &error {
            Error::Connection { .. } => true,
            Error::Server { .. } => attempt > 1,
            _ => false,
        };
        if !exhausted_budget {
            return error;
        }

        if error.is_connection() {
            // Every attempt died at the transport level; the topology
            // may have moved under us.
            if let Some(trigger) = &self.sniff_trigger {
                trigger.notify_one();
            }
        }

        Error::RetriesExhausted {
            attempts: attempt,
            source: Box::new(error),
        }
    }

    fn emit_warnings(&self, headers: &reqwest::header::HeaderMap) {
        for value in headers.get_all(WARNING) {
            if let Ok(warning) = value.to_str() {
                tracing::warn!(warning = %warning, "deprecation warning from cluster");
                if let Some(observer) = &self.observer {
                    observer.on_deprecation(warning);
                }
            }
        }
    }
}

fn deadline_passed(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

/// Join the node base URL with the request path and encode the query.
fn build_url(base: &Url, options: &RequestOptions) -> Result<Url, Error> {
    let mut url = base.join(options.path.trim_start_matches('/'))?;
    if !options.query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(options.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    Ok(url)
}
