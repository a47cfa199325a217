pub mod health;
pub mod models;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::{drafting, guideline, research, review, scrape, session, strategy, validation};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/models", get(models::list_models_handler))
        // Utility: job-posting fetch, usable before a session exists
        .route("/api/v1/scrape", post(scrape::handle_scrape))
        // Session lifecycle and step navigation
        .route(
            "/api/v1/sessions",
            post(session::handlers::handle_create_session),
        )
        .route(
            "/api/v1/sessions/:id",
            get(session::handlers::handle_get_session)
                .delete(session::handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/reset",
            post(session::handlers::handle_reset_session),
        )
        .route(
            "/api/v1/sessions/:id/inputs",
            put(session::handlers::handle_submit_inputs),
        )
        .route(
            "/api/v1/sessions/:id/advance",
            post(session::handlers::handle_advance),
        )
        .route(
            "/api/v1/sessions/:id/back",
            post(session::handlers::handle_back),
        )
        .route(
            "/api/v1/sessions/:id/step",
            post(session::handlers::handle_goto),
        )
        // Step 2: input validation
        .route(
            "/api/v1/sessions/:id/validate",
            post(validation::handlers::handle_validate),
        )
        // Step 3: company research (prompt out, findings in)
        .route(
            "/api/v1/sessions/:id/research/prompt",
            get(research::handlers::handle_research_prompt),
        )
        .route(
            "/api/v1/sessions/:id/research",
            put(research::handlers::handle_submit_research),
        )
        // Step 4: strategy chat loop
        .route(
            "/api/v1/sessions/:id/strategy/init",
            post(strategy::handlers::handle_init),
        )
        .route(
            "/api/v1/sessions/:id/strategy/feedback",
            post(strategy::handlers::handle_feedback),
        )
        .route(
            "/api/v1/sessions/:id/strategy/confirm",
            post(strategy::handlers::handle_confirm),
        )
        // Step 5: writing guideline
        .route(
            "/api/v1/sessions/:id/guidelines",
            get(guideline::handlers::handle_get_guidelines)
                .put(guideline::handlers::handle_update_guidelines),
        )
        // Step 6: draft fan-out and selection
        .route(
            "/api/v1/sessions/:id/drafts",
            post(drafting::handlers::handle_generate_drafts),
        )
        .route(
            "/api/v1/sessions/:id/drafts/selections",
            put(drafting::handlers::handle_update_selections),
        )
        // Step 7: final review
        .route(
            "/api/v1/sessions/:id/review",
            post(review::handlers::handle_review),
        )
        .route(
            "/api/v1/sessions/:id/essays/:question_id",
            put(review::handlers::handle_update_essay),
        )
        // Step 8: finished letter view
        .route(
            "/api/v1/sessions/:id/final",
            get(session::handlers::handle_final_view),
        )
        .with_state(state)
}
