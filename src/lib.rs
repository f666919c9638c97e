use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{any, get},
    Router,
};

pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod jsonrpc;
pub mod logging;

use jsonrpc::{DispatchOptions, Dispatcher, MethodRegistry};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub content_type: HeaderValue,
}

impl AppState {
    pub fn new(
        registry: MethodRegistry,
        options: DispatchOptions,
        content_type: HeaderValue,
    ) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(Arc::new(registry), options)),
            content_type,
        }
    }
}

pub fn build_app(state: AppState, rpc_path: &str) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route(rpc_path, any(http::handlers::rpc_endpoint))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::jsonrpc::{MessageStyle, NotificationErrors};

    use super::*;

    fn app_with(options: DispatchOptions, content_type: &'static str) -> Router {
        let mut builder = MethodRegistry::builder();
        domain::greeting::register(&mut builder).expect("register demo methods");
        let state = AppState::new(
            builder.build(),
            options,
            HeaderValue::from_static(content_type),
        );
        build_app(state, "/")
    }

    fn app() -> Router {
        app_with(DispatchOptions::default(), "application/json")
    }

    async fn post(app: Router, body: &'static str) -> Response {
        app.oneshot(
            Request::builder()
                .uri("/")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .expect("request build"),
        )
        .await
        .expect("request execution")
    }

    async fn body_text(response: Response) -> String {
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        String::from_utf8(body.to_vec()).expect("utf-8 body")
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_text(response).await).expect("valid json response")
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "{\"status\":\"ok\"}");
    }

    #[tokio::test]
    async fn post_single_call_returns_bare_object() {
        let response = post(
            app(),
            r#"{"jsonrpc":"2.0","method":"hello","params":["World"],"id":1}"#,
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json"))
        );
        assert_eq!(
            body_text(response).await,
            r#"{"jsonrpc":"2.0","id":1,"result":"Hello World"}"#
        );
    }

    #[tokio::test]
    async fn post_batch_returns_array_in_order() {
        let response = post(
            app(),
            r#"[{"method":"nope","id":1},{"method":"hello","params":["X"],"id":2},{"method":"multi","params":{"num":4},"id":3}]"#,
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().map(Vec::len), Some(3));
        assert_eq!(body[0]["id"], 1);
        assert_eq!(body[0]["error"]["code"], -32601);
        assert_eq!(body[1], json!({"id": 2, "result": "Hello X"}));
        assert_eq!(body[2], json!({"id": 3, "result": 8}));
    }

    #[tokio::test]
    async fn post_malformed_body_returns_parse_error() {
        let response = post(app(), r#"[{"method":"hello""#).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body.is_object());
        assert_eq!(body["error"]["code"], -32700);
        assert!(body["error"]["data"].is_string());
    }

    #[tokio::test]
    async fn post_wrong_arity_returns_invalid_params() {
        let response = post(app(), r#"{"method":"multi","params":[],"id":"a"}"#).await;

        let body = body_json(response).await;
        assert_eq!(body["id"], "a");
        assert_eq!(body["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn notification_returns_no_content() {
        let response = post(app(), r#"{"method":"hello","params":["X"]}"#).await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(body_text(response).await.is_empty());
    }

    #[tokio::test]
    async fn empty_batch_returns_no_content() {
        let response = post(app(), "[]").await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn get_decodes_params_from_query() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/?params=%5B%22X%22%5D&method=hello&id=1")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["result"], "Hello X");
        assert_eq!(body["id"], "1");
    }

    #[tokio::test]
    async fn get_with_malformed_params_returns_parse_error() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/?params=%5BX&method=hello&id=1")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn other_http_methods_are_bad_requests() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .method("PUT")
                    .body(Body::from(r#"{"method":"hello","params":["X"],"id":1}"#))
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let reason = response
            .extensions()
            .get::<errors::RejectionReason>()
            .map(|reason| reason.0.clone());
        assert_eq!(
            reason.as_deref(),
            Some("http method PUT cannot carry a json-rpc request")
        );
        let body = body_json(response).await;
        assert_eq!(body["code"], "method_not_allowed");
        assert_eq!(body["message"], "Only GET or POST allowed");
    }

    #[tokio::test]
    async fn configured_content_type_and_message_style_apply() {
        let app = app_with(
            DispatchOptions {
                debug: true,
                message_style: MessageStyle::Plain,
                notification_errors: NotificationErrors::Report,
            },
            "application/json-rpc",
        );

        let response = post(app, r#"{"method":"hello","params":[1],"id":1}"#).await;

        assert_eq!(
            response.headers().get(header::CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json-rpc"))
        );
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], -32603);
        assert_eq!(body["error"]["message"], "Internal JSON-RPC error.");
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/rpc/other")
                    .method("POST")
                    .body(Body::from(r#"{"method":"hello","params":["X"],"id":1}"#))
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
