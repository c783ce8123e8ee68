//! A handle on a deployed Cairo 0 contract.
//!
//! [Contract] binds a [ContractAbi] to an address and a [GatewayApi]
//! transport. Arguments are validated against the ABI before anything is
//! encoded or sent, and call results are decoded back into named values.
use std::sync::Arc;

use starkcall_abi::{Args, CallKind, ContractAbi};
use starkcall_common::{
    CallParam,
    ContractAddress,
    EntryPoint,
    Fee,
    TransactionNonce,
    TransactionSignatureElem,
    TransactionVersion,
};
use starkcall_gateway_client::GatewayApi;
use starkcall_gateway_types::reply::add_transaction::InvokeResponse;
use starkcall_gateway_types::request::add_transaction::InvokeFunction;
use starkcall_gateway_types::request::CallContract;

mod error;

pub use error::ContractError;
pub use starkcall_common::BlockId;

/// Transaction metadata of an invoke. Produced by the account or signer
/// and forwarded as is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvokeOptions {
    pub max_fee: Fee,
    pub signature: Vec<TransactionSignatureElem>,
    pub nonce: Option<TransactionNonce>,
    pub version: TransactionVersion,
}

#[derive(Clone, Debug)]
pub struct Contract<G> {
    abi: Arc<ContractAbi>,
    client: G,
    address: Option<ContractAddress>,
}

impl<G: GatewayApi> Contract<G> {
    /// Creates a handle that is not yet bound to an address.
    pub fn new(abi: impl Into<Arc<ContractAbi>>, client: G) -> Self {
        Self {
            abi: abi.into(),
            client,
            address: None,
        }
    }

    pub fn with_address(mut self, address: ContractAddress) -> Self {
        self.address = Some(address);
        self
    }

    /// Rebinds this handle to `address`.
    pub fn connect(&mut self, address: ContractAddress) -> &mut Self {
        tracing::debug!(%address, "Connecting contract");
        self.address = Some(address);
        self
    }

    pub fn address(&self) -> Option<ContractAddress> {
        self.address
    }

    pub fn abi(&self) -> &ContractAbi {
        &self.abi
    }

    /// Validates and encodes `args` for `method`, returning the target address,
    /// selector and calldata.
    fn prepare(
        &self,
        kind: CallKind,
        method: &str,
        args: &Args,
    ) -> Result<(ContractAddress, EntryPoint, Vec<CallParam>), ContractError> {
        let address = self.address.ok_or(ContractError::NotConnected)?;

        starkcall_abi::validate(&self.abi, kind, method, args)?;
        let calldata = starkcall_abi::encode_for(&self.abi, method, args)?;

        Ok((address, EntryPoint::hashed(method.as_bytes()), calldata))
    }

    /// Submits a state-changing `method` invocation and returns the gateway's
    /// acknowledgement.
    #[tracing::instrument(skip(self, args, options))]
    pub async fn invoke(
        &self,
        method: &str,
        args: &Args,
        options: InvokeOptions,
    ) -> Result<InvokeResponse, ContractError> {
        let (contract_address, selector, calldata) =
            self.prepare(CallKind::Invoke, method, args)?;

        let invoke = InvokeFunction {
            version: options.version,
            max_fee: options.max_fee,
            signature: options.signature,
            nonce: options.nonce,
            contract_address,
            entry_point_selector: Some(selector),
            calldata,
        };

        let response = self.client.add_invoke_transaction(invoke).await?;
        tracing::debug!(transaction_hash=%response.transaction_hash, code=%response.code, "Invoke submitted");

        Ok(response)
    }

    /// Executes the read-only `method` at `block` and decodes its outputs.
    #[tracing::instrument(skip(self, args))]
    pub async fn call(
        &self,
        method: &str,
        args: &Args,
        block: BlockId,
    ) -> Result<Args, ContractError> {
        let (contract_address, entry_point_selector, calldata) =
            self.prepare(CallKind::Call, method, args)?;

        let call = CallContract {
            contract_address,
            entry_point_selector,
            calldata,
            signature: vec![],
        };

        let reply = self.client.call_contract(call, block).await?;
        Ok(starkcall_abi::decode(&self.abi, method, &reply.result)?)
    }
}
