use super::*;
use crate::VaultError;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    let url = Url::parse(&server.uri()).expect("mock server uri parses");
    let mut config = Config::default();
    config.ollama.host = url.host_str().expect("mock server has host").to_string();
    config.ollama.port = url.port().expect("mock server has port");
    config
}

#[test]
fn client_configuration() {
    let mut config = Config::default();
    config.ollama.host = "test-host".to_string();
    config.ollama.port = 1234;
    config.ollama.model = "test-model".to_string();

    let client = OllamaClient::new(&config).expect("Failed to create client");

    assert_eq!(client.model, "test-model");
    assert_eq!(client.base_url.host_str(), Some("test-host"));
    assert_eq!(client.base_url.port(), Some(1234));
}

#[tokio::test]
async fn embed_posts_prompt_to_embeddings_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .and(body_json(serde_json::json!({
            "model": "nomic-embed-text",
            "prompt": "hello world",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "embedding": [0.1, 0.2, 0.3],
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&config_for(&server)).expect("Failed to create client");
    let embedding = client
        .generate_embedding("hello world")
        .expect("embedding succeeds");

    assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn embed_surfaces_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&config_for(&server)).expect("Failed to create client");
    let error = client
        .generate_embedding("hello")
        .expect_err("embedding should fail");

    assert!(matches!(error, VaultError::Embedding(_)));
    assert!(error.to_string().contains("500"));
}

#[tokio::test]
async fn embed_rejects_empty_embedding() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "embedding": [] })),
        )
        .mount(&server)
        .await;

    let client = OllamaClient::new(&config_for(&server)).expect("Failed to create client");
    let error = client
        .generate_embedding("hello")
        .expect_err("empty embedding should fail");

    assert!(matches!(error, VaultError::Embedding(_)));
    assert!(error.to_string().contains("empty"));
}

#[tokio::test]
async fn embed_rejects_malformed_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&config_for(&server)).expect("Failed to create client");
    let error = client
        .generate_embedding("hello")
        .expect_err("malformed response should fail");

    assert!(matches!(error, VaultError::Embedding(_)));
}

#[tokio::test]
async fn ping_and_model_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [
                { "name": "nomic-embed-text:latest", "size": 274_302_450_u64 },
                { "name": "llama3:8b" },
            ],
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&config_for(&server)).expect("Failed to create client");

    client.ping().expect("ping succeeds");

    let models = client.list_models().expect("list_models succeeds");
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].name, "nomic-embed-text:latest");
}

#[tokio::test]
async fn untagged_model_matches_tagged_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [{ "name": "nomic-embed-text:latest" }],
        })))
        .mount(&server)
        .await;

    // Default config uses the untagged model name
    let client = OllamaClient::new(&config_for(&server)).expect("Failed to create client");
    client.validate_model().expect("untagged name should match");
}

#[tokio::test]
async fn missing_model_fails_validation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [{ "name": "llama3:8b" }],
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&config_for(&server)).expect("Failed to create client");
    assert!(client.validate_model().is_err());
    assert!(client.health_check().is_err());
}

#[test]
fn ollama_client_is_an_embedding_provider() {
    fn assert_provider<T: crate::embeddings::EmbeddingProvider>() {}
    assert_provider::<OllamaClient>();
}
