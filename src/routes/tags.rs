use askama::Template;
use axum::extract::{Path, State};

use crate::db::queries;
use crate::error::AppResult;
use crate::routes::home::{sidebar, Html, Sidebar};
use crate::state::AppState;
use crate::views::{self, PostCard, TagBadge};

#[derive(Template)]
#[template(path = "pages/posts_list.html")]
pub struct TagFilterTemplate {
    pub tag: String,
    pub posts: Vec<PostCard>,
    pub most_popular_posts: Vec<PostCard>,
    pub popular_tags: Vec<TagBadge>,
}

/// Posts carrying a tag. The title in the path is matched case-insensitively.
pub async fn tag_filter(
    State(state): State<AppState>,
    Path(tag_title): Path<String>,
) -> AppResult<Html<TagFilterTemplate>> {
    let conn = state.db.get()?;
    let tag = queries::tag_by_title(&conn, &tag_title)?;

    let related = queries::posts_with_tag(&conn, &tag.id, state.config.listing.tag_posts)?;
    let posts = views::post_cards(&conn, &related, &state.config.media.url)?;

    let Sidebar {
        most_popular_posts,
        popular_tags,
    } = sidebar(&conn, &state)?;

    Ok(Html(TagFilterTemplate {
        tag: tag.title,
        posts,
        most_popular_posts,
        popular_tags,
    }))
}
