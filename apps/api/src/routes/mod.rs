pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::report::handlers::handle_report;
use crate::sections::handlers;
use crate::state::AppState;

/// Generation and report routes. Mounted at the root and again under `/api`.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/visao", post(handlers::handle_overview))
        .route("/materiais", post(handlers::handle_materials))
        .route("/montagem", post(handlers::handle_assembly))
        .route("/procedimento", post(handlers::handle_procedure))
        .route("/perguntar", post(handlers::handle_question))
        .route("/relatorio", post(handle_report))
}

pub fn build_router(state: AppState) -> Router {
    let api = api_routes();
    let mut router = Router::new()
        .route("/health", get(health::health_handler))
        .merge(api.clone())
        .nest("/api", api);

    if let Some(dist) = &state.config.frontend_dist {
        router = router
            .nest_service("/static", ServeDir::new(dist))
            .route_service("/", ServeFile::new(dist.join("index.html")));
    }

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt; // for oneshot

    use crate::config::Config;
    use crate::layout::default_page_config;
    use crate::llm_client::LlmError;
    use crate::report::consistency::{ConsistencyChecker, ConsistencyVerdict, TopicConsistencyChecker};
    use crate::report::gate::GatedReport;
    use crate::sections::generator::ContentGenerator;
    use crate::sections::models::{GeneratedSection, Section};
    use crate::session::SessionStore;

    struct StubGenerator;

    #[async_trait]
    impl ContentGenerator for StubGenerator {
        async fn generate_section(
            &self,
            section: Section,
            topic: &str,
        ) -> Result<GeneratedSection, LlmError> {
            Ok(GeneratedSection {
                content: format!("{} de {topic}.\n\nSegundo parágrafo.", section.title()),
                books: vec!["Halliday, Fundamentos de Física".to_string()],
                notes: String::new(),
            })
        }

        async fn answer_question(&self, question: &str) -> Result<String, LlmError> {
            Ok(format!("Resposta: {question}"))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl ContentGenerator for FailingGenerator {
        async fn generate_section(&self, _section: Section, _topic: &str) -> Result<GeneratedSection, LlmError> {
            Err(LlmError::EmptyContent)
        }

        async fn answer_question(&self, _question: &str) -> Result<String, LlmError> {
            Err(LlmError::RateLimited { retries: 3 })
        }
    }

    struct RejectingChecker;

    #[async_trait]
    impl ConsistencyChecker for RejectingChecker {
        async fn check(&self, _report: &GatedReport) -> ConsistencyVerdict {
            ConsistencyVerdict {
                consistent: false,
                mismatch: vec![Section::Materials],
                explanation: "materiais de outro experimento".to_string(),
            }
        }
    }

    fn test_config() -> Config {
        Config {
            openai_api_key: "test".to_string(),
            openai_base_url: "http://localhost:0".to_string(),
            llm_timeout_secs: 1,
            llm_max_retries: 1,
            session_ttl_secs: 3600,
            session_sweep_secs: 60,
            enable_llm_consistency_check: false,
            frontend_dist: None,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }

    fn test_state(generator: Arc<dyn ContentGenerator>) -> AppState {
        AppState {
            config: test_config(),
            sessions: SessionStore::new(Duration::from_secs(3600), Duration::from_secs(60)),
            generator,
            consistency: Arc::new(TopicConsistencyChecker),
            page_config: default_page_config(),
        }
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(state: &AppState, request: Request<Body>) -> Response {
        build_router(state.clone()).oneshot(request).await.unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    async fn fill_session(state: &AppState, session_id: &str, topic: &str) {
        for section in Section::ALL {
            let uri = format!("/{}", section.as_str());
            let response = send(state, post_json(&uri, json!({"projeto": topic, "session_id": session_id}))).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Health
    // ────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_health_check() {
        let state = test_state(Arc::new(StubGenerator));
        let response = send(
            &state,
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["sessions"], 0);
    }

    // ────────────────────────────────────────────────────────────────────────
    // Sections
    // ────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_section_generates_and_caches() {
        let state = test_state(Arc::new(StubGenerator));
        let response = send(
            &state,
            post_json("/visao", json!({"projeto": "Carrinho de balão (terceira lei)", "session_id": "abc"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["resposta"]["content"]
            .as_str()
            .unwrap()
            .starts_with("Visão Geral de Carrinho de balão"));
        assert_eq!(body["resposta"]["books"][0], "Halliday, Fundamentos de Física");

        let record = state.sessions.get("abc").unwrap();
        assert!(record.section(Section::Overview).is_some());
    }

    #[tokio::test]
    async fn test_section_route_is_also_mounted_under_api() {
        let state = test_state(Arc::new(StubGenerator));
        let response = send(
            &state,
            post_json("/api/materiais", json!({"topic": "queda livre", "session_id": "abc"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.sessions.get("abc").unwrap().section(Section::Materials).is_some());
    }

    #[tokio::test]
    async fn test_denied_topic_is_rejected_and_not_cached() {
        let state = test_state(Arc::new(StubGenerator));
        let response = send(
            &state,
            post_json("/montagem", json!({"projeto": "Receita de bolo", "session_id": "abc"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "TOPIC_DENIED");
        assert!(state.sessions.get("abc").is_none());
    }

    #[tokio::test]
    async fn test_blank_session_id_is_rejected() {
        let state = test_state(Arc::new(StubGenerator));
        let response = send(
            &state,
            post_json("/visao", json!({"projeto": "queda livre", "session_id": "  "})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upstream_failure_degrades_without_caching() {
        let state = test_state(Arc::new(FailingGenerator));
        let response = send(
            &state,
            post_json("/procedimento", json!({"projeto": "queda livre", "session_id": "abc"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["resposta"]["content"],
            "Erro ao gerar resposta: LLM returned empty content"
        );
        assert!(state.sessions.get("abc").is_none());
    }

    // ────────────────────────────────────────────────────────────────────────
    // Free question
    // ────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_question_answers_within_domain() {
        let state = test_state(Arc::new(StubGenerator));
        let response = send(
            &state,
            post_json("/perguntar", json!({"pergunta": "O que é inércia?"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["resposta"], "Resposta: O que é inércia?");
    }

    #[tokio::test]
    async fn test_question_outside_domain_is_denied() {
        let state = test_state(Arc::new(StubGenerator));
        let response = send(&state, post_json("/perguntar", json!({"pergunta": "Quem ganhou o jogo?"}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_question_upstream_failure_is_server_error() {
        let state = test_state(Arc::new(FailingGenerator));
        let response = send(&state, post_json("/perguntar", json!({"pergunta": "Explique o atrito"}))).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"]["code"], "LLM_ERROR");
    }

    // ────────────────────────────────────────────────────────────────────────
    // Report
    // ────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_report_without_sections_lists_all_missing() {
        let state = test_state(Arc::new(StubGenerator));
        let response = send(
            &state,
            post_json("/relatorio", json!({"projeto": "queda livre", "session_id": "nada"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "REPORT_INCOMPLETE");
        assert_eq!(
            body["error"]["details"]["missing"],
            json!(["visao", "materiais", "montagem", "procedimento"])
        );
    }

    #[tokio::test]
    async fn test_report_with_partial_session_lists_gaps() {
        let state = test_state(Arc::new(StubGenerator));
        send(&state, post_json("/visao", json!({"projeto": "queda livre", "session_id": "s"}))).await;
        send(&state, post_json("/montagem", json!({"projeto": "queda livre", "session_id": "s"}))).await;

        let response = send(&state, post_json("/relatorio", json!({"session_id": "s"}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["details"]["missing"],
            json!(["materiais", "procedimento"])
        );
    }

    #[tokio::test]
    async fn test_full_flow_returns_pdf() {
        let state = test_state(Arc::new(StubGenerator));
        fill_session(&state, "s", "Queda livre com paraquedas").await;

        let response = send(
            &state,
            post_json("/relatorio", json!({"projeto": "Queda livre com paraquedas", "session_id": "s"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"relatorio.pdf\""
        );
        assert!(body_bytes(response).await.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_report_topic_defaults_to_session_topic() {
        let state = test_state(Arc::new(StubGenerator));
        fill_session(&state, "s", "queda livre").await;

        let response = send(&state, post_json("/api/relatorio", json!({"session_id": "s", "projeto": ""}))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_report_for_different_topic_is_inconsistent() {
        let state = test_state(Arc::new(StubGenerator));
        fill_session(&state, "s", "queda livre").await;
        // overwrite one section for another project
        send(
            &state,
            post_json("/materiais", json!({"projeto": "plano inclinado com atrito", "session_id": "s"})),
        )
        .await;

        let response = send(
            &state,
            post_json("/relatorio", json!({"projeto": "queda livre", "session_id": "s"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "REPORT_INCONSISTENT");
        assert_eq!(body["error"]["details"]["mismatch"], json!(["materiais"]));
    }

    #[tokio::test]
    async fn test_consistency_checker_can_block_report() {
        let mut state = test_state(Arc::new(StubGenerator));
        state.consistency = Arc::new(RejectingChecker);
        fill_session(&state, "s", "queda livre").await;

        let response = send(&state, post_json("/relatorio", json!({"session_id": "s"}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["details"]["mismatch"], json!(["materiais"]));
        assert_eq!(body["error"]["details"]["explanation"], "materiais de outro experimento");
    }

    // ────────────────────────────────────────────────────────────────────────
    // Static frontend
    // ────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_frontend_is_served_when_configured() {
        let dist = tempfile::tempdir().unwrap();
        std::fs::write(dist.path().join("index.html"), "<h1>FisiQIA</h1>").unwrap();
        std::fs::write(dist.path().join("app.js"), "console.log('ok')").unwrap();

        let mut state = test_state(Arc::new(StubGenerator));
        state.config.frontend_dist = Some(dist.path().to_path_buf());

        let index = send(&state, Request::builder().uri("/").body(Body::empty()).unwrap()).await;
        assert_eq!(index.status(), StatusCode::OK);
        assert_eq!(body_bytes(index).await, b"<h1>FisiQIA</h1>");

        let asset = send(&state, Request::builder().uri("/static/app.js").body(Body::empty()).unwrap()).await;
        assert_eq!(asset.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_root_is_not_found_without_frontend() {
        let state = test_state(Arc::new(StubGenerator));
        let response = send(&state, Request::builder().uri("/").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
