use askama::Template;
use axum::extract::{Path, State};

use crate::db::queries;
use crate::error::AppResult;
use crate::routes::home::{sidebar, Html, Sidebar};
use crate::state::AppState;
use crate::views::{self, PostCard, PostDetail, TagBadge};

#[derive(Template)]
#[template(path = "pages/post_detail.html")]
pub struct PostDetailTemplate {
    pub post: PostDetail,
    pub most_popular_posts: Vec<PostCard>,
    pub popular_tags: Vec<TagBadge>,
}

pub async fn post_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Html<PostDetailTemplate>> {
    let conn = state.db.get()?;
    let post = queries::post_by_slug(&conn, &slug)?;
    let post = views::post_detail(&conn, post, &state.config.media.url)?;

    let Sidebar {
        most_popular_posts,
        popular_tags,
    } = sidebar(&conn, &state)?;

    Ok(Html(PostDetailTemplate {
        post,
        most_popular_posts,
        popular_tags,
    }))
}
