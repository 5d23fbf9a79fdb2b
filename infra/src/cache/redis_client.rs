//! Redis client with retry logic
//!
//! Wraps a multiplexed connection. Idempotent commands go through
//! [`RedisClient::query`], which retries transient failures with exponential backoff.
//! Scripts that increment counters must not be replayed and use
//! [`RedisClient::eval_once`].

use redis::{aio::MultiplexedConnection, Client, Cmd, FromRedisValue, RedisError, RedisResult, Script};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use cc_shared::config::CacheConfig;

use crate::InfrastructureError;

const MAX_RETRY_DELAY_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis client shared by every storage call
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
    config: CacheConfig,
}

impl RedisClient {
    /// Connect using the URL and retry settings of `config`
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::create_connection_with_retry(client, config.max_retries, config.retry_delay_ms)
                .await?;

        info!("Redis client created successfully");

        Ok(Self { connection, config })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Prefix a key with the configured namespace
    pub fn make_key(&self, key: &str) -> String {
        self.config.make_key(key)
    }

    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Run an idempotent command, retrying transient failures
    pub async fn query<T>(&self, cmd: Cmd) -> Result<T, InfrastructureError>
    where
        T: FromRedisValue + Send + 'static,
    {
        self.execute_with_retry(move |mut conn| {
            let cmd = cmd.clone();
            Box::pin(async move { cmd.query_async::<_, T>(&mut conn).await })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    /// Run an idempotent script, retrying transient failures
    pub async fn eval_with_retry<T>(
        &self,
        script: &'static Script,
        keys: Vec<String>,
        args: Vec<String>,
    ) -> Result<T, InfrastructureError>
    where
        T: FromRedisValue + Send + 'static,
    {
        self.execute_with_retry(move |mut conn| {
            let keys = keys.clone();
            let args = args.clone();
            Box::pin(async move { invoke(script, &keys, &args, &mut conn).await })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    /// Run a script exactly once
    pub async fn eval_once<T>(
        &self,
        script: &'static Script,
        keys: Vec<String>,
        args: Vec<String>,
    ) -> Result<T, InfrastructureError>
    where
        T: FromRedisValue + Send + 'static,
    {
        let mut conn = self.connection.clone();
        invoke(script, &keys, &args, &mut conn).await.map_err(|e| {
            error!("Redis script failed: {}", e);
            InfrastructureError::Cache(e)
        })
    }

    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let max_retries = self.config.max_retries.max(1);
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            match operation(conn).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Redis operation failed after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }

    /// Check the connection with a PING
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");

        match self.query::<String>(redis::cmd("PING")).await {
            Ok(response) if response == "PONG" => {
                debug!("Redis health check passed");
                Ok(true)
            }
            Ok(response) => {
                warn!("Redis health check returned unexpected response: {}", response);
                Ok(false)
            }
            Err(e) => {
                error!("Redis health check failed: {}", e);
                Err(e)
            }
        }
    }
}

async fn invoke<T: FromRedisValue>(
    script: &Script,
    keys: &[String],
    args: &[String],
    conn: &mut MultiplexedConnection,
) -> RedisResult<T> {
    let mut invocation = script.prepare_invoke();
    for key in keys {
        invocation.key(key);
    }
    for arg in args {
        invocation.arg(arg);
    }
    invocation.invoke_async(conn).await
}

/// Whether a failed command may be sent again
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Hide credentials in a Redis URL before logging it
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}
