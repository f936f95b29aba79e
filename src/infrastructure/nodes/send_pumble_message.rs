//! Pumble channel message node

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::domain::credentials::{PumbleCredentials, PUMBLE_API_BASE_URL, PUMBLE_CREDENTIAL};
use crate::domain::node::{
    run_per_item, ExecuteFunctions, IntegerBounds, ItemParameters, ItemResult, Node,
    NodeDescription, NodeOutput, NodeProperty,
};
use crate::domain::NodeError;
use crate::infrastructure::http_client::{join_url, status_text};

pub const SEND_PUMBLE_MESSAGE_NODE: &str = "rondonjonSendPumbleMessage";

const SEND_MESSAGE_PATH: &str = "/sendMessage";
const API_KEY_HEADER: &str = "Api-Key";
const FAILURE_CONTEXT: &str = "Pumble HTTP request failed";

const PARAM_CHANNEL_ID: &str = "channelId";
const PARAM_MESSAGE_BODY: &str = "messageBody";
const PARAM_DESTINATION_KEY: &str = "destinationKey";
const PARAM_TIMEOUT_MILLIS: &str = "timeoutMillis";

const DEFAULT_DESTINATION_KEY: &str = "pumble";
const DEFAULT_TIMEOUT_MILLIS: u64 = 5000;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageBody<'a> {
    as_bot: bool,
    channel_id: &'a str,
    text: &'a str,
}

/// Sends a message to a Pumble channel
#[derive(Debug, Clone)]
pub struct SendPumbleMessageNode {
    client: reqwest::Client,
    base_url: String,
    default_timeout_ms: u64,
}

impl SendPumbleMessageNode {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: PUMBLE_API_BASE_URL.to_string(),
            default_timeout_ms: DEFAULT_TIMEOUT_MILLIS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Timeout used when the item does not set one
    pub fn with_default_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.default_timeout_ms = timeout_ms;
        self
    }

    fn timeout_ms(&self, params: &ItemParameters<'_>) -> u64 {
        let default = i64::try_from(self.default_timeout_ms).unwrap_or(i64::MAX);
        let timeout = params.integer(PARAM_TIMEOUT_MILLIS, default, IntegerBounds::at_least(0));

        u64::try_from(timeout).unwrap_or(self.default_timeout_ms)
    }

    async fn execute_item(
        &self,
        host: &dyn ExecuteFunctions,
        credentials: &PumbleCredentials,
        item_index: usize,
    ) -> Result<ItemResult, NodeError> {
        let params = ItemParameters::new(host, item_index);

        let channel_id = params.trimmed(PARAM_CHANNEL_ID, "");
        if channel_id.is_empty() {
            return Err(NodeError::validation("Channel ID is required"));
        }

        let text = params.string(PARAM_MESSAGE_BODY, "");
        let destination_key = params.destination_key(PARAM_DESTINATION_KEY, DEFAULT_DESTINATION_KEY);
        let timeout_ms = self.timeout_ms(&params);

        debug!(item_index, channel_id = %channel_id, timeout_ms, "Sending Pumble message");

        let body = SendMessageBody {
            as_bot: true,
            channel_id: &channel_id,
            text: &text,
        };

        let started = Instant::now();

        let response = self
            .client
            .post(join_url(&self.base_url, SEND_MESSAGE_PATH))
            .timeout(Duration::from_millis(timeout_ms))
            .header(API_KEY_HEADER, credentials.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    format!("request timed out after {} ms", timeout_ms)
                } else {
                    e.to_string()
                };

                NodeError::transport(message).with_context(FAILURE_CONTEXT)
            })?;

        let status = response.status();

        if status != StatusCode::OK {
            return Err(NodeError::upstream_status(status.as_u16(), status_text(status))
                .with_context(FAILURE_CONTEXT));
        }

        Ok(ItemResult::new(
            destination_key,
            json!({
                "durationMillis": started.elapsed().as_millis() as u64,
                "status": status.as_u16(),
                "statusText": status_text(status),
            }),
        ))
    }
}

#[async_trait]
impl Node for SendPumbleMessageNode {
    fn description(&self) -> NodeDescription {
        NodeDescription::new(SEND_PUMBLE_MESSAGE_NODE, "Send Pumble Message")
            .with_description("Send a message to a Pumble channel")
            .with_credential(PUMBLE_CREDENTIAL)
            .with_documentation_url(
                "https://pumble.com/help/integrations/automation-workflow-integrations/api-keys-integration/",
            )
            .with_property(
                NodeProperty::string(PARAM_CHANNEL_ID, "Channel ID")
                    .required()
                    .with_description("ID of the channel to send the message to"),
            )
            .with_property(
                NodeProperty::string(PARAM_MESSAGE_BODY, "Message Body")
                    .required()
                    .with_description("Plain-text message to send"),
            )
            .with_property(
                NodeProperty::string(PARAM_DESTINATION_KEY, "Destination Key").with_description(
                    "The key to which the Pumble response will be written (default: \"pumble\")",
                ),
            )
            .with_property(
                NodeProperty::number(PARAM_TIMEOUT_MILLIS, "Timeout")
                    .with_default(self.default_timeout_ms)
                    .with_bounds(IntegerBounds::at_least(0))
                    .with_description("Timeout in milliseconds after which the request will be aborted"),
            )
    }

    async fn execute(&self, host: &dyn ExecuteFunctions) -> Result<NodeOutput, NodeError> {
        let credentials: PumbleCredentials = host
            .credentials(PUMBLE_CREDENTIAL)
            .await?
            .decode(PUMBLE_CREDENTIAL)?;
        let credentials = &credentials;

        run_per_item(host, move |item_index| {
            self.execute_item(host, credentials, item_index)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credentials::CredentialData;
    use crate::domain::node::WorkflowItem;
    use crate::domain::ErrorKind;
    use crate::infrastructure::host::StaticHost;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn host() -> StaticHost {
        StaticHost::new(SEND_PUMBLE_MESSAGE_NODE)
            .with_item(WorkflowItem::from_value(json!({"id": 7})).unwrap())
            .with_credentials(PUMBLE_CREDENTIAL, CredentialData::new().with("apiKey", "pumble-key"))
            .with_parameter(PARAM_CHANNEL_ID, "channel-1")
            .with_parameter(PARAM_MESSAGE_BODY, "Build finished")
    }

    fn node(server: &MockServer) -> SendPumbleMessageNode {
        SendPumbleMessageNode::new(reqwest::Client::new()).with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_sends_message_as_bot() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sendMessage"))
            .and(header("Api-Key", "pumble-key"))
            .and(body_json(json!({
                "asBot": true,
                "channelId": "channel-1",
                "text": "Build finished"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "m-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let output = node(&server).execute(&host()).await.unwrap();

        let item = &output[0][0];
        assert_eq!(item.get("id"), Some(&json!(7)));

        let pumble = item.get("pumble").unwrap();
        assert_eq!(pumble["status"], json!(200));
        assert_eq!(pumble["statusText"], json!("OK"));
        assert!(pumble["durationMillis"].is_u64());
    }

    #[tokio::test]
    async fn test_timeout_fails_item_without_result() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let host = host()
            .with_parameter(PARAM_TIMEOUT_MILLIS, 50)
            .with_continue_on_fail(true);

        let output = node(&server).execute(&host).await.unwrap();

        let items = &output[0];
        assert_eq!(items.len(), 2);
        assert!(items[0].get("pumble").is_none());
        assert!(items[1].get("pumble").is_none());

        let error = items[1].error.as_ref().unwrap();
        assert_eq!(error.kind, ErrorKind::Transport);
        assert_eq!(
            error.message,
            "Pumble HTTP request failed: request timed out after 50 ms"
        );
    }

    #[tokio::test]
    async fn test_configured_default_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let node = node(&server).with_default_timeout_ms(20);
        let error = node.execute(&host()).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Transport);
        assert_eq!(error.item_index(), Some(0));
    }

    #[tokio::test]
    async fn test_non_ok_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let error = node(&server).execute(&host()).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::UpstreamStatus);
        assert_eq!(error.root().to_string(), "Pumble HTTP request failed: Forbidden");
    }

    #[tokio::test]
    async fn test_blank_channel_is_rejected() {
        let server = MockServer::start().await;
        let host = host().with_parameter(PARAM_CHANNEL_ID, "  ");

        let error = node(&server).execute(&host).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Validation);
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
