//! Provides a builder API for creating and sending gateway REST requests.
//!
//! This builder utilises a type state builder pattern with generics to only
//! allow valid operations at each stage of the build process. Each stage is
//! consumed to generate the next stage and the final stage sends the request.
//!
//!   1. [Method](stage::Method), created by [Request::builder], where you
//!      select the REST API method.
//!   2. [Params](stage::Params) where you add query parameters and then send
//!      the request.
use starkcall_common::BlockId;
use starkcall_gateway_types::error::SequencerError;

const X_THROTTLING_BYPASS: &str = "X-Throttling-Bypass";

/// A gateway Request builder.
pub struct Request<'a, S: RequestState> {
    state: S,
    url: reqwest::Url,
    api_key: Option<String>,
    client: &'a reqwest::Client,
}

pub mod stage {
    /// Select the gateway API method to call:
    /// - [add_transaction](super::Request::add_transaction)
    /// - [call_contract](super::Request::call_contract)
    pub struct Method;

    /// Specify the request parameters:
    /// - [block](super::Request::block)
    ///
    /// and then send it with [post_with_json](super::Request::post_with_json).
    pub struct Params;

    impl super::RequestState for Method {}
    impl super::RequestState for Params {}
}

/// Helper macros used in [`stage::Method`]
mod request_macros {
    /// Generates one method per name in the list.
    ///
    /// Each generated method delegates the call to `method`.
    macro_rules! methods {
        () => {
            compile_error!("At least one method has to be defined");
        };
        ($($name:ident),+ $(,)?) => {
            $(
                pub fn $name(self) -> Request<'a, stage::Params> {
                    self.method(stringify!($name))
                }
            )+
        };
    }

    pub(super) use methods;
}

impl<'a> Request<'a, stage::Method> {
    /// Initialize a [Request] builder.
    pub fn builder(
        client: &'a reqwest::Client,
        url: reqwest::Url,
        api_key: Option<String>,
    ) -> Request<'a, stage::Method> {
        Request {
            url,
            client,
            api_key,
            state: stage::Method,
        }
    }

    request_macros::methods!(add_transaction, call_contract);

    /// Appends the given method to the request url.
    fn method(mut self, method: &'static str) -> Request<'a, stage::Params> {
        // Clients only accept base URLs, so the segments are always there.
        if let Ok(mut segments) = self.url.path_segments_mut() {
            segments.pop_if_empty().push(method);
        }

        Request {
            url: self.url,
            client: self.client,
            api_key: self.api_key,
            state: stage::Params,
        }
    }
}

impl Request<'_, stage::Params> {
    pub fn block<B: Into<BlockId>>(self, block: B) -> Self {
        // Tags have to use "blockNumber" as well, "blockHash" does not accept them.
        let value = match block.into() {
            BlockId::Number(number) => number.to_string(),
            BlockId::Latest => "latest".to_owned(),
            BlockId::Pending => "pending".to_owned(),
        };
        self.param("blockNumber", &value)
    }

    fn param(mut self, name: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Sends the request as a REST `POST` operation, in addition to
    /// the specified JSON body. The response is parsed as type `T`.
    pub async fn post_with_json<T, J>(self, json: &J) -> Result<T, SequencerError>
    where
        T: serde::de::DeserializeOwned,
        J: serde::Serialize + ?Sized,
    {
        tracing::trace!(url=%self.url, "Posting data to gateway");

        let request = self.client.post(self.url);
        let request = match self.api_key {
            Some(api_key) => request.header(X_THROTTLING_BYPASS, api_key),
            None => request,
        };
        let response = request.json(json).send().await?;
        parse::<T>(response).await
    }
}

async fn parse<T>(response: reqwest::Response) -> Result<T, SequencerError>
where
    T: ::serde::de::DeserializeOwned,
{
    let response = parse_raw(response).await?;
    // Attempt to deserialize the actual data we are looking for
    let response = response.json::<T>().await?;
    Ok(response)
}

/// Maps gateway error replies to [SequencerError].
async fn parse_raw(response: reqwest::Response) -> Result<reqwest::Response, SequencerError> {
    use starkcall_gateway_types::error::StarknetError;

    tracing::trace!(status=%response.status(), "Parsing response from gateway");

    // Starknet specific errors end with a 400 or 500 status code
    // but the body contains a JSON object with the error description
    if response.status() == reqwest::StatusCode::INTERNAL_SERVER_ERROR
        || response.status() == reqwest::StatusCode::BAD_REQUEST
    {
        let body = response.text().await?;
        tracing::trace!(%body, "Parsing error response from gateway");

        return match serde_json::from_str::<StarknetError>(&body) {
            Ok(e) => Err(SequencerError::StarknetError(e)),
            Err(e) => {
                tracing::debug!(
                    reason=?e,
                    "Failed to decode Starknet error from gateway response"
                );
                Err(SequencerError::InvalidStarknetErrorVariant)
            }
        };
    }
    // Status codes 401..499 and 501..599 are mapped to
    // SequencerError::ReqwestError
    response.error_for_status_ref().map(|_| ())?;
    Ok(response)
}

pub trait RequestState {}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use pretty_assertions_sorted::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn method_and_block_are_appended() {
        let client = reqwest::Client::new();
        let url = reqwest::Url::parse("http://localhost/feeder_gateway/").unwrap();

        let request = Request::builder(&client, url.clone(), None)
            .call_contract()
            .block(BlockId::Latest);
        assert_eq!(
            request.url.as_str(),
            "http://localhost/feeder_gateway/call_contract?blockNumber=latest"
        );

        let request = Request::builder(&client, url, None)
            .call_contract()
            .block(7u64);
        assert_eq!(
            request.url.as_str(),
            "http://localhost/feeder_gateway/call_contract?blockNumber=7"
        );
    }

    #[tokio::test]
    async fn api_key_is_set_when_configured() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).header(X_THROTTLING_BYPASS, "secret");
                then.status(200).json_body(json!({}));
            })
            .await;

        let client = reqwest::Client::new();
        let url = server.base_url().parse().unwrap();
        let _: serde_json::Value = Request::builder(&client, url, Some("secret".to_owned()))
            .add_transaction()
            .post_with_json(&json!({}))
            .await
            .unwrap();

        mock.assert_async().await;
    }
}
