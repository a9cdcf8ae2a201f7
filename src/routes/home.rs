use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::db::queries;
use crate::error::AppResult;
use crate::state::AppState;
use crate::views::{self, PostCard, TagBadge};

#[derive(Template)]
#[template(path = "pages/index.html")]
pub struct IndexTemplate {
    pub most_popular_posts: Vec<PostCard>,
    pub page_posts: Vec<PostCard>,
    pub popular_tags: Vec<TagBadge>,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

/// Sidebar data shown on every listing page.
pub struct Sidebar {
    pub most_popular_posts: Vec<PostCard>,
    pub popular_tags: Vec<TagBadge>,
}

pub fn sidebar(conn: &rusqlite::Connection, state: &AppState) -> AppResult<Sidebar> {
    let listing = &state.config.listing;
    let media_url = &state.config.media.url;

    let popular = queries::popular_posts(conn, listing.popular_posts)?;
    let most_popular_posts = views::popular_post_cards(conn, popular, media_url)?;
    let popular_tags = views::tag_badges(&queries::popular_tags(conn, listing.popular_tags)?);

    Ok(Sidebar {
        most_popular_posts,
        popular_tags,
    })
}

pub async fn index(State(state): State<AppState>) -> AppResult<Html<IndexTemplate>> {
    let conn = state.db.get()?;
    let Sidebar {
        most_popular_posts,
        popular_tags,
    } = sidebar(&conn, &state)?;

    let fresh = queries::recent_posts(&conn, state.config.listing.page_posts)?;
    let page_posts = views::post_cards(&conn, &fresh, &state.config.media.url)?;

    Ok(Html(IndexTemplate {
        most_popular_posts,
        page_posts,
        popular_tags,
    }))
}
