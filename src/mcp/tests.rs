//! MCP implementation tests.
//!
//! Unit tests for the MCP server, covering protocol parsing, request
//! dispatch, and tool definitions.

#[cfg(test)]
mod protocol_tests {
    use crate::mcp::protocol::{
        CallToolResult, JsonRpcError, JsonRpcMessage, RequestId, ToolContent, error_codes,
    };
    use serde_json::json;

    #[test]
    fn request_ids_accept_strings_and_numbers() {
        let string_id: RequestId =
            serde_json::from_value(json!("req-1")).expect("string id parses");
        assert_eq!(string_id, RequestId::String("req-1".to_string()));

        let number_id: RequestId = serde_json::from_value(json!(7)).expect("number id parses");
        assert_eq!(number_id, RequestId::Number(7));
    }

    #[test]
    fn requests_and_notifications_are_distinguished() {
        let with_id = r#"{"jsonrpc":"2.0","method":"ping","id":1}"#;
        let message: JsonRpcMessage = serde_json::from_str(with_id).expect("request parses");
        assert!(matches!(message, JsonRpcMessage::Request(_)));

        let without_id = r#"{"jsonrpc":"2.0","method":"initialized"}"#;
        let message: JsonRpcMessage = serde_json::from_str(without_id).expect("notification parses");
        assert!(matches!(message, JsonRpcMessage::Notification(_)));
    }

    #[test]
    fn error_constructors_use_standard_codes() {
        assert_eq!(JsonRpcError::parse_error().code, error_codes::PARSE_ERROR);
        assert_eq!(
            JsonRpcError::invalid_request().code,
            error_codes::INVALID_REQUEST
        );
        assert_eq!(
            JsonRpcError::method_not_found().code,
            error_codes::METHOD_NOT_FOUND
        );

        let default_params = JsonRpcError::invalid_params(None);
        assert_eq!(default_params.code, error_codes::INVALID_PARAMS);
        assert_eq!(default_params.message, "Invalid params");

        let internal = JsonRpcError::internal_error(Some("broken".to_string()));
        assert_eq!(internal.code, error_codes::INTERNAL_ERROR);
        assert_eq!(internal.message, "broken");
    }

    #[test]
    fn tool_results_serialize_the_is_error_flag() {
        let result = CallToolResult {
            content: vec![ToolContent::Text {
                text: "oops".to_string(),
            }],
            is_error: Some(true),
        };

        let value = serde_json::to_value(&result).expect("result serializes");
        assert_eq!(value["isError"], json!(true));
        assert_eq!(value["content"][0]["type"], json!("text"));
        assert_eq!(value["content"][0]["text"], json!("oops"));
    }
}

#[cfg(test)]
mod server_tests {
    use crate::mcp::protocol::{CallToolParams, CallToolResult, MCP_VERSION, Tool, ToolContent};
    use crate::mcp::server::{ConnectionState, McpServer, MessageHandler, ToolHandler};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    struct EchoTool;

    #[async_trait]
    impl ToolHandler for EchoTool {
        async fn handle(&self, params: CallToolParams) -> anyhow::Result<CallToolResult> {
            let args = params.arguments.unwrap_or_default();
            let message = args
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();

            Ok(CallToolResult {
                content: vec![ToolContent::Text { text: message }],
                is_error: Some(false),
            })
        }
    }

    fn echo_definition() -> Tool {
        Tool {
            name: "echo".to_string(),
            description: Some("Echo a message back".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "message": {"type": "string"}
                },
                "required": ["message"]
            }),
        }
    }

    fn initialize_params(version: &str) -> serde_json::Value {
        json!({
            "protocolVersion": version,
            "capabilities": {},
            "clientInfo": {
                "name": "test-client",
                "version": "1.0.0"
            }
        })
    }

    #[tokio::test]
    async fn initialize_handshake_reports_server_info() {
        let server = Arc::new(McpServer::new(
            "resume-vault".to_string(),
            "0.1.0".to_string(),
        ));
        let handler = MessageHandler::new(Arc::clone(&server));

        let result = handler
            .handle_initialize(Some(initialize_params(MCP_VERSION)))
            .await
            .expect("initialize succeeds");

        assert_eq!(result["protocolVersion"], json!(MCP_VERSION));
        assert_eq!(result["serverInfo"]["name"], json!("resume-vault"));
        assert_eq!(result["serverInfo"]["version"], json!("0.1.0"));
        assert_eq!(server.connection_state().await, ConnectionState::Initializing);
    }

    #[tokio::test]
    async fn unsupported_protocol_version_is_rejected() {
        let server = Arc::new(McpServer::new(
            "resume-vault".to_string(),
            "0.1.0".to_string(),
        ));
        let handler = MessageHandler::new(Arc::clone(&server));

        let result = handler
            .handle_initialize(Some(initialize_params("2024-01-01")))
            .await;

        let error = result.expect_err("version mismatch is an error");
        assert!(error.to_string().contains("Unsupported protocol version"));
    }

    #[tokio::test]
    async fn registered_tools_are_listed() {
        let server = Arc::new(McpServer::new(
            "resume-vault".to_string(),
            "0.1.0".to_string(),
        ));
        server.register_tool(echo_definition(), EchoTool).await;

        let handler = MessageHandler::new(Arc::clone(&server));
        let result = handler.handle_list_tools().await.expect("tools are listed");

        let tools = result["tools"].as_array().expect("tools is an array");
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], json!("echo"));
    }

    #[tokio::test]
    async fn calling_a_registered_tool_dispatches_to_its_handler() {
        let server = Arc::new(McpServer::new(
            "resume-vault".to_string(),
            "0.1.0".to_string(),
        ));
        server.register_tool(echo_definition(), EchoTool).await;

        let handler = MessageHandler::new(Arc::clone(&server));
        let params = json!({
            "name": "echo",
            "arguments": {"message": "hello"}
        });

        let result = handler
            .handle_call_tool(Some(params))
            .await
            .expect("tool call succeeds");

        assert_eq!(result["content"][0]["text"], json!("hello"));
        assert_eq!(result["isError"], json!(false));
    }

    #[tokio::test]
    async fn calling_an_unknown_tool_is_an_error() {
        let server = Arc::new(McpServer::new(
            "resume-vault".to_string(),
            "0.1.0".to_string(),
        ));
        let handler = MessageHandler::new(Arc::clone(&server));

        let params = json!({"name": "missing"});
        let result = handler.handle_call_tool(Some(params)).await;

        let error = result.expect_err("unknown tool is an error");
        assert!(error.to_string().contains("Tool not found: missing"));
    }

    #[tokio::test]
    async fn ping_returns_an_empty_object() {
        let server = Arc::new(McpServer::new(
            "resume-vault".to_string(),
            "0.1.0".to_string(),
        ));
        let handler = MessageHandler::new(server);

        let result = handler.handle_ping().expect("ping succeeds");
        assert_eq!(result, json!({}));
    }
}

#[cfg(test)]
mod search_resumes_tool_tests {
    use crate::mcp::tools::SearchResumesHandler;

    #[test]
    fn search_resumes_tool_definition() {
        let tool = SearchResumesHandler::tool_definition();

        assert_eq!(tool.name, "search_resumes");
        assert_eq!(
            tool.description,
            Some("Search stored resumes by semantic similarity".to_string())
        );

        let schema = tool.input_schema;
        let properties = schema["properties"].as_object().expect("has properties");
        assert!(properties.contains_key("query"));
        assert!(properties.contains_key("top_k"));

        let required = schema["required"].as_array().expect("has required array");
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "query");
    }
}

#[cfg(test)]
mod ingest_resume_tool_tests {
    use crate::mcp::tools::IngestResumeHandler;

    #[test]
    fn ingest_resume_tool_definition() {
        let tool = IngestResumeHandler::tool_definition();

        assert_eq!(tool.name, "ingest_resume");
        assert_eq!(
            tool.description,
            Some("Store a resume and index it for semantic search".to_string())
        );

        let schema = tool.input_schema;
        let properties = schema["properties"].as_object().expect("has properties");
        assert!(properties.contains_key("text"));
        assert!(properties.contains_key("display_name"));
        assert!(properties.contains_key("filename"));

        let required = schema["required"].as_array().expect("has required array");
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "text");
    }
}

#[cfg(test)]
mod list_candidates_tool_tests {
    use crate::mcp::tools::ListCandidatesHandler;

    #[test]
    fn list_candidates_tool_definition() {
        let tool = ListCandidatesHandler::tool_definition();

        assert_eq!(tool.name, "list_candidates");
        assert_eq!(
            tool.description,
            Some("List every stored candidate".to_string())
        );

        let schema = tool.input_schema;
        let properties = schema["properties"].as_object().expect("has properties");
        assert!(properties.is_empty());
    }
}
