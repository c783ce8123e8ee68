//! Starknet gateway client.
//!
//! Read-only calls go to the feeder gateway, transactions to the gateway.
use std::time::Duration;

use reqwest::Url;
use starkcall_common::BlockId;
use starkcall_gateway_types::error::SequencerError;
use starkcall_gateway_types::reply;
use starkcall_gateway_types::request::add_transaction::{AddTransaction, InvokeFunction};
use starkcall_gateway_types::request::CallContract;

mod builder;

/// Timeout applied to every request unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// The transport a contract talks to the network through.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait::async_trait]
pub trait GatewayApi {
    /// Executes a read-only call and returns its flattened result.
    async fn call_contract(
        &self,
        call: CallContract,
        block: BlockId,
    ) -> Result<reply::CallContract, SequencerError>;

    /// Submits an invoke transaction.
    async fn add_invoke_transaction(
        &self,
        invoke: InvokeFunction,
    ) -> Result<reply::add_transaction::InvokeResponse, SequencerError>;
}

/// Starknet gateway client using REST API.
///
/// No request is ever retried: a failure is returned to the caller as is.
#[derive(Debug, Clone)]
pub struct Client {
    /// This client is internally refcounted
    inner: reqwest::Client,
    /// Starknet gateway URL.
    gateway: Url,
    /// Starknet feeder gateway URL.
    feeder_gateway: Url,
    /// API key sent in the throttling bypass header.
    api_key: Option<String>,
}

impl Client {
    /// Creates a [Client] with a shared feeder gateway and gateway base url.
    pub fn with_base_url(base: Url) -> anyhow::Result<Self> {
        let gateway = base.join("gateway")?;
        let feeder_gateway = base.join("feeder_gateway")?;
        Self::with_urls(gateway, feeder_gateway, DEFAULT_TIMEOUT)
    }

    /// Create a gateway client for the given [Url]s.
    pub fn with_urls(gateway: Url, feeder_gateway: Url, timeout: Duration) -> anyhow::Result<Self> {
        for url in [&gateway, &feeder_gateway] {
            anyhow::ensure!(!url.cannot_be_a_base(), "Gateway URL {url} is not a base URL");
        }

        Ok(Self {
            inner: reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(starkcall_common::USER_AGENT)
                .build()?,
            gateway,
            feeder_gateway,
            api_key: None,
        })
    }

    /// Use the given API key for all requests.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn gateway_url(&self) -> &Url {
        &self.gateway
    }

    pub fn feeder_gateway_url(&self) -> &Url {
        &self.feeder_gateway
    }

    fn gateway_request(&self) -> builder::Request<'_, builder::stage::Method> {
        builder::Request::builder(&self.inner, self.gateway.clone(), self.api_key.clone())
    }

    fn feeder_gateway_request(&self) -> builder::Request<'_, builder::stage::Method> {
        builder::Request::builder(
            &self.inner,
            self.feeder_gateway.clone(),
            self.api_key.clone(),
        )
    }
}

#[async_trait::async_trait]
impl GatewayApi for Client {
    #[tracing::instrument(skip(self))]
    async fn call_contract(
        &self,
        call: CallContract,
        block: BlockId,
    ) -> Result<reply::CallContract, SequencerError> {
        self.feeder_gateway_request()
            .call_contract()
            .block(block)
            .post_with_json(&call)
            .await
    }

    /// Adds a transaction invoking a contract.
    #[tracing::instrument(skip(self))]
    async fn add_invoke_transaction(
        &self,
        invoke: InvokeFunction,
    ) -> Result<reply::add_transaction::InvokeResponse, SequencerError> {
        let req = AddTransaction::Invoke(invoke);

        // Note that we don't do retries here.
        // Resubmitting a transaction is only safe once the caller has
        // decided the first attempt did not go through.
        self.gateway_request()
            .add_transaction()
            .post_with_json(&req)
            .await
    }
}
