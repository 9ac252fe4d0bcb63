//! Retell API Client
//!
//! HTTP implementation of the `VoicePlatform` port.

use anyhow::{Context, Result};
use async_trait::async_trait;
use first_greet::{
    Agent, AgentProfile, AgentUpdate, DomainError, LlmDocument, LlmResource, PhoneNumber,
    PhoneNumberBinding, VoicePlatform,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::Settings;

/// API Client for Retell
pub struct RetellClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RetellClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("first-greet/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.base_url, &settings.api_key, settings.timeout)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn execute(&self, operation: &str, request: RequestBuilder) -> Result<Response, DomainError> {
        tracing::debug!(operation = %operation, "Calling Retell API");

        let resp = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                DomainError::external(operation, format!("Failed to connect to Retell API: {}", e))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::external_status(
                operation,
                status.as_u16(),
                format!("API error ({}): {}", status, body),
            ));
        }

        Ok(resp)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, DomainError> {
        let resp = self.execute(operation, request).await?;
        resp.json().await.map_err(|e| {
            DomainError::external(operation, format!("Failed to parse response: {}", e))
        })
    }
}

#[async_trait]
impl VoicePlatform for RetellClient {
    async fn create_llm(&self, document: &LlmDocument) -> Result<LlmResource, DomainError> {
        let request = self.client.post(self.url("create-retell-llm")).json(document);
        self.send("create_llm", request).await
    }

    async fn delete_llm(&self, llm_id: &str) -> Result<(), DomainError> {
        let url = self.url(&format!("delete-retell-llm/{}", urlencoding::encode(llm_id)));
        self.execute("delete_llm", self.client.delete(url)).await?;
        Ok(())
    }

    async fn list_agents(&self) -> Result<Vec<Agent>, DomainError> {
        let request = self.client.get(self.url("list-agents"));
        self.send("list_agents", request).await
    }

    async fn create_agent(&self, profile: &AgentProfile) -> Result<Agent, DomainError> {
        let request = self.client.post(self.url("create-agent")).json(profile);
        self.send("create_agent", request).await
    }

    async fn update_agent(
        &self,
        agent_id: &str,
        update: &AgentUpdate,
    ) -> Result<Agent, DomainError> {
        let url = self.url(&format!("update-agent/{}", urlencoding::encode(agent_id)));
        self.send("update_agent", self.client.patch(url).json(update))
            .await
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<(), DomainError> {
        let url = self.url(&format!("delete-agent/{}", urlencoding::encode(agent_id)));
        self.execute("delete_agent", self.client.delete(url)).await?;
        Ok(())
    }

    async fn list_phone_numbers(&self) -> Result<Vec<PhoneNumber>, DomainError> {
        let request = self.client.get(self.url("list-phone-numbers"));
        self.send("list_phone_numbers", request).await
    }

    async fn update_phone_number(
        &self,
        phone_number: &str,
        binding: &PhoneNumberBinding,
    ) -> Result<PhoneNumber, DomainError> {
        // E.164 '+' must be escaped in the path
        let url = self.url(&format!(
            "update-phone-number/{}",
            urlencoding::encode(phone_number)
        ));
        self.send("update_phone_number", self.client.patch(url).json(binding))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use first_greet::{
        screening, AgentTarget, E164Number, NoopReporter, ProvisionPlan, ProvisionService,
        ResponseEngine, Stage,
    };
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> RetellClient {
        RetellClient::new(&server.uri(), "key_test", Duration::from_secs(5)).unwrap()
    }

    fn document() -> LlmDocument {
        screening::dialogue(&E164Number::parse("+18475550100").unwrap())
    }

    #[tokio::test]
    async fn test_create_llm_posts_document() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create-retell-llm"))
            .and(header("authorization", "Bearer key_test"))
            .and(body_partial_json(json!({
                "model": "gpt-4.1-mini",
                "start_speaker": "agent",
                "starting_state": "screening",
                "general_tools": [{ "type": "end_call", "name": "emergency_end" }]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "llm_id": "llm_abc",
                "version": 0,
                "last_modification_timestamp": 1_700_000_000_000u64
            })))
            .expect(1)
            .mount(&server)
            .await;

        let llm = client(&server).create_llm(&document()).await.unwrap();
        assert_eq!(llm.llm_id, "llm_abc");
    }

    #[tokio::test]
    async fn test_list_agents() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list-agents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "agent_id": "agent_1",
                    "agent_name": "First Greet",
                    "voice_id": "11labs-Grace",
                    "response_engine": { "type": "retell-llm", "llm_id": "llm_old" }
                },
                {
                    "agent_id": "agent_2",
                    "response_engine": { "type": "conversation-flow", "conversation_flow_id": "cf_1" }
                }
            ])))
            .mount(&server)
            .await;

        let agents = client(&server).list_agents().await.unwrap();
        assert_eq!(agents.len(), 2);
        assert!(agents[0].is_named("First Greet"));
        assert_eq!(agents[1].response_engine, ResponseEngine::Other);
    }

    #[tokio::test]
    async fn test_error_status_is_external_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create-retell-llm"))
            .respond_with(ResponseTemplate::new(422).set_body_string("starting_state is invalid"))
            .mount(&server)
            .await;

        let err = client(&server).create_llm(&document()).await.unwrap_err();
        match err {
            DomainError::ExternalService {
                operation,
                status,
                message,
            } => {
                assert_eq!(operation, "create_llm");
                assert_eq!(status, Some(422));
                assert!(message.contains("starting_state is invalid"));
            }
            other => panic!("Expected ExternalService, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparseable_body_is_external_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list-phone-numbers"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server).list_phone_numbers().await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::ExternalService { status: None, .. }
        ));
    }

    #[tokio::test]
    async fn test_update_phone_number_escapes_plus() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/update-phone-number/%2B18475550199"))
            .and(body_json(json!({
                "inbound_agent_id": "agent_1",
                "outbound_agent_id": "agent_1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "phone_number": "+18475550199",
                "phone_number_pretty": "+1 (847) 555-0199",
                "nickname": "First Greet line",
                "inbound_agent_id": "agent_1",
                "outbound_agent_id": "agent_1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let number = client(&server)
            .update_phone_number("+18475550199", &PhoneNumberBinding::both("agent_1"))
            .await
            .unwrap();
        assert!(number.is_inbound_bound_to("agent_1"));
    }

    #[tokio::test]
    async fn test_update_agent_sends_engine_only() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/update-agent/agent_1"))
            .and(body_json(json!({
                "response_engine": { "type": "retell-llm", "llm_id": "llm_new" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "agent_id": "agent_1",
                "agent_name": "First Greet",
                "response_engine": { "type": "retell-llm", "llm_id": "llm_new", "version": 1 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let agent = client(&server)
            .update_agent(
                "agent_1",
                &AgentUpdate::rebind(ResponseEngine::retell_llm("llm_new")),
            )
            .await
            .unwrap();
        assert_eq!(agent.response_engine.llm_id(), Some("llm_new"));
    }

    #[tokio::test]
    async fn test_deletes_accept_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/delete-retell-llm/llm_abc"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/delete-agent/agent_1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        client.delete_llm("llm_abc").await.unwrap();
        client.delete_agent("agent_1").await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = RetellClient::new("http://127.0.0.1:1", "key_test", Duration::from_secs(2))
            .unwrap();
        let err = client.list_agents().await.unwrap_err();
        assert!(err.to_string().contains("Failed to connect"));
    }

    #[tokio::test]
    async fn test_rejected_llm_stops_the_run() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create-retell-llm"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .expect(1)
            .mount(&server)
            .await;
        for (verb, route) in [
            ("GET", "/list-agents"),
            ("POST", "/create-agent"),
            ("GET", "/list-phone-numbers"),
        ] {
            Mock::given(method(verb))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200))
                .expect(0)
                .mount(&server)
                .await;
        }

        let plan = ProvisionPlan::new(document(), AgentTarget::by_name("First Greet"), "First Greet");
        let failure = ProvisionService::new(Arc::new(client(&server)))
            .run(&plan, &mut NoopReporter)
            .await
            .unwrap_err();

        assert_eq!(failure.stage, Stage::CreateLlm);
        assert!(!failure.mutated);
    }

    #[tokio::test]
    async fn test_full_run_creates_agent_and_rebinds_number() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create-retell-llm"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "llm_id": "llm_abc" })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/list-agents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/create-agent"))
            .and(body_partial_json(json!({
                "agent_name": "First Greet",
                "voice_id": "11labs-Grace",
                "response_engine": { "type": "retell-llm", "llm_id": "llm_abc" }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "agent_id": "agent_new",
                "agent_name": "First Greet",
                "response_engine": { "type": "retell-llm", "llm_id": "llm_abc" }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/list-phone-numbers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "phone_number": "+18475550199", "nickname": "First Greet line", "inbound_agent_id": "agent_old" }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/update-phone-number/%2B18475550199"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "phone_number": "+18475550199",
                "nickname": "First Greet line",
                "inbound_agent_id": "agent_new",
                "outbound_agent_id": "agent_new"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let plan = ProvisionPlan::new(document(), AgentTarget::by_name("First Greet"), "First Greet");
        let outcome = ProvisionService::new(Arc::new(client(&server)))
            .run(&plan, &mut NoopReporter)
            .await
            .unwrap();

        assert_eq!(outcome.llm.llm_id, "llm_abc");
        assert_eq!(outcome.agent.agent_id(), "agent_new");
        assert_eq!(outcome.phone.number().unwrap().display(), "+18475550199");
    }
}
