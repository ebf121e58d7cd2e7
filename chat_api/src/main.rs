/**
 * This is the main entry point for the `chat_api` service.
 *
 * The service sits between the healthy-chef frontend and the generative AI
 * providers. It forwards chat messages to `OpenAI` and image prompts to the
 * configured image provider, hiding the API keys from the browser.
 */
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use config::Config;
use state::AppState;

mod composer;
mod config;
mod error;
mod handlers;
mod prompts;
mod recipe;
mod state;
#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let state = hc_app::create_app_context::<AppState, Config>().await?;

    let cors = hc_axum::cors_layer(&state.config.cors_allowed_origins)?;

    let addr = tokio::net::lookup_host((
        state.config.host.as_str(),
        state.config.port,
    ))
    .await?
    .next()
    .ok_or_else(|| format!("could not resolve {}", state.config.host))?;

    hc_axum::run_app(app(state, cors), addr).await
}

fn app(state: AppState, cors: CorsLayer) -> Router {
    let app = Router::new()
        .route("/api/chat", post(handlers::chat::handler))
        .route("/api/generate-image", post(handlers::generate_image::handler))
        .route("/api/health", get(handlers::health::handler))
        .with_state(state);

    hc_axum::with_common_layers(app, cors)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use hc_providers::{GeneratedImage, ProviderError};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{ChatMode, RecipeMerge};
    use crate::test_support::{FakeChat, FakeImages, state};

    const RECIPE_TEXT: &str = r#"{
  "id": "green-salad",
  "name": "Green Salad",
  "calories": 180,
  "image": "",
  "content": ["Lettuce", "Toss"]
}"#;

    fn router(config: Config, chat: FakeChat, images: FakeImages) -> Router {
        let cors = hc_axum::cors_layer(&config.cors_allowed_origins).unwrap();
        app(state(config, chat, images), cors)
    }

    fn recipe_config(merge: RecipeMerge) -> Config {
        Config {
            chat_mode: ChatMode::RecipeWithImage,
            recipe_merge: merge,
            ..Config::default()
        }
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(
            Config::default(),
            FakeChat::replying("unused"),
            FakeImages::url("unused"),
        );
        let request =
            Request::get("/api/health").body(Body::empty()).unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn test_chat_returns_provider_text() {
        let app = router(
            Config::default(),
            FakeChat::replying("Eat more leafy greens."),
            FakeImages::url("unused"),
        );

        let (status, body) = send(
            app,
            post_json("/api/chat", r#"{"message": "what should I eat?"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "response": "Eat more leafy greens." }));
    }

    #[tokio::test]
    async fn test_chat_uses_nutrition_prompt_in_plain_mode() {
        let chat = Arc::new(FakeChat::replying("ok"));
        let app = app(
            AppState::new(
                Config::default(),
                chat.clone(),
                Arc::new(FakeImages::url("unused")),
            ),
            hc_axum::cors_layer("*").unwrap(),
        );

        let (status, _) =
            send(app, post_json("/api/chat", r#"{"message": "snacks"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            chat.calls(),
            vec![(
                prompts::NUTRITION_ASSISTANT.to_string(),
                "snacks".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_chat_recipe_mode_returns_provider_text() {
        let chat = Arc::new(FakeChat::replying(RECIPE_TEXT));
        let images = Arc::new(FakeImages::url("https://img/unused.png"));
        let config = Config {
            chat_mode: ChatMode::Recipe,
            ..Config::default()
        };
        let app = app(
            AppState::new(config, chat.clone(), images.clone()),
            hc_axum::cors_layer("*").unwrap(),
        );

        let (status, body) =
            send(app, post_json("/api/chat", r#"{"message": "salad"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "response": RECIPE_TEXT }));
        assert_eq!(
            chat.calls(),
            vec![(prompts::RECIPE.to_string(), "salad".to_string())]
        );
        assert!(images.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_chat_accepts_legacy_content_field() {
        let app = router(
            Config::default(),
            FakeChat::replying("hello"),
            FakeImages::url("unused"),
        );

        let (status, body) =
            send(app, post_json("/api/chat", r#"{"content": "hi"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "reply": "hello" }));
    }

    #[tokio::test]
    async fn test_chat_provider_failure_is_500_with_detail() {
        let app = router(
            Config::default(),
            FakeChat::failing("invalid api key"),
            FakeImages::url("unused"),
        );

        let (status, body) =
            send(app, post_json("/api/chat", r#"{"message": "hi"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("invalid api key"));
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_message() {
        let app = router(
            Config::default(),
            FakeChat::replying("unused"),
            FakeImages::url("unused"),
        );

        let (status, body) =
            send(app, post_json("/api/chat", r#"{"message": "   "}"#)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "message must not be empty");
    }

    #[tokio::test]
    async fn test_chat_rejects_malformed_body() {
        let app = router(
            Config::default(),
            FakeChat::replying("unused"),
            FakeImages::url("unused"),
        );

        let (status, body) =
            send(app, post_json("/api/chat", r#"{"text": "hi"}"#)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_generate_image_success() {
        let app = router(
            Config::default(),
            FakeChat::replying("unused"),
            FakeImages::url("https://img/salad.png"),
        );

        let (status, body) = send(
            app,
            post_json("/api/generate-image", r#"{"prompt": "a salad"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "imageUrl": "https://img/salad.png", "status": "success" })
        );
    }

    #[tokio::test]
    async fn test_generate_image_inline_result_is_data_uri() {
        let app = router(
            Config::default(),
            FakeChat::replying("unused"),
            FakeImages::returning(|| {
                Ok(GeneratedImage::Inline {
                    mime_type: "image/png".to_string(),
                    bytes: b"png!".to_vec(),
                })
            }),
        );

        let (status, body) = send(
            app,
            post_json("/api/generate-image", r#"{"prompt": "a salad"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imageUrl"], "data:image/png;base64,cG5nIQ==");
    }

    fn upstream_400() -> Result<GeneratedImage, ProviderError> {
        Err(ProviderError::Upstream {
            provider: "DALL-E",
            status: 400,
            body: "content policy violation".to_string(),
        })
    }

    #[tokio::test]
    async fn test_generate_image_keeps_synchronous_upstream_status() {
        let app = router(
            Config::default(),
            FakeChat::replying("unused"),
            FakeImages::returning(upstream_400),
        );

        let (status, body) = send(
            app,
            post_json("/api/generate-image", r#"{"prompt": "a salad"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            body["detail"]
                .as_str()
                .unwrap()
                .contains("content policy violation")
        );
    }

    #[tokio::test]
    async fn test_generate_image_job_provider_errors_are_500() {
        let app = router(
            Config::default(),
            FakeChat::replying("unused"),
            FakeImages::returning(upstream_400).job_based(),
        );

        let (status, _) = send(
            app,
            post_json("/api/generate-image", r#"{"prompt": "a salad"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_generate_image_timeout_is_408() {
        let app = router(
            Config::default(),
            FakeChat::replying("unused"),
            FakeImages::returning(|| {
                Err(ProviderError::Timeout(
                    "no result after 30 status checks".to_string(),
                ))
            })
            .job_based(),
        );

        let (status, body) = send(
            app,
            post_json("/api/generate-image", r#"{"prompt": "a salad"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert!(body["detail"].as_str().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_generate_image_failed_job_is_500() {
        let app = router(
            Config::default(),
            FakeChat::replying("unused"),
            FakeImages::returning(|| {
                Err(ProviderError::GenerationFailed(
                    "creation failed".to_string(),
                ))
            })
            .job_based(),
        );

        let (status, body) = send(
            app,
            post_json("/api/generate-image", r#"{"prompt": "a salad"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("creation failed"));
    }

    #[tokio::test]
    async fn test_generate_image_rejects_blank_prompt() {
        let app = router(
            Config::default(),
            FakeChat::replying("unused"),
            FakeImages::url("unused"),
        );

        let (status, _) = send(
            app,
            post_json("/api/generate-image", r#"{"prompt": ""}"#),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_recipe_with_image_structured() {
        let app = router(
            recipe_config(RecipeMerge::Structured),
            FakeChat::replying(RECIPE_TEXT),
            FakeImages::url("https://img/salad.png"),
        );

        let (status, body) =
            send(app, post_json("/api/chat", r#"{"message": "salad"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        let recipe: Value =
            serde_json::from_str(body["response"].as_str().unwrap()).unwrap();
        assert_eq!(recipe["image"], "https://img/salad.png");
        assert_eq!(recipe["name"], "Green Salad");
    }

    #[tokio::test]
    async fn test_recipe_with_image_splice_keeps_text() {
        let app = router(
            recipe_config(RecipeMerge::Splice),
            FakeChat::replying(RECIPE_TEXT),
            FakeImages::url("https://img/salad.png"),
        );

        let (status, body) =
            send(app, post_json("/api/chat", r#"{"message": "salad"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["response"],
            RECIPE_TEXT.replace(
                r#""image": """#,
                r#""image": "https://img/salad.png""#
            )
        );
    }

    #[tokio::test]
    async fn test_recipe_with_image_unparseable_output_is_502() {
        let app = router(
            recipe_config(RecipeMerge::Structured),
            FakeChat::replying("Here is a lovely salad!"),
            FakeImages::url("https://img/salad.png"),
        );

        let (status, _) =
            send(app, post_json("/api/chat", r#"{"message": "salad"}"#)).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_recipe_with_image_timeout_is_408() {
        let app = router(
            recipe_config(RecipeMerge::Structured),
            FakeChat::replying(RECIPE_TEXT),
            FakeImages::returning(|| {
                Err(ProviderError::Timeout("too slow".to_string()))
            })
            .job_based(),
        );

        let (status, _) =
            send(app, post_json("/api/chat", r#"{"message": "salad"}"#)).await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn test_configured_origin_is_allowed_on_every_route() {
        let config = Config {
            cors_allowed_origins: "http://localhost:3000".to_string(),
            ..Config::default()
        };

        for request in [
            Request::get("/api/health")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
            Request::post("/api/chat")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"message": "hi"}"#))
                .unwrap(),
            Request::post("/api/generate-image")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"prompt": "hi"}"#))
                .unwrap(),
        ] {
            let app = router(
                config.clone(),
                FakeChat::replying("ok"),
                FakeImages::url("https://img/x.png"),
            );
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
                "http://localhost:3000"
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let app = router(
            Config::default(),
            FakeChat::replying("unused"),
            FakeImages::url("unused"),
        );
        let request = Request::get("/api/nope").body(Body::empty()).unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "not found");
    }
}
