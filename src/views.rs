//! Plain view records handed to the templates.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::models::{Comment, PopularPost, PopularTag, Post};
use crate::db::queries;
use crate::error::AppResult;

pub const TEASER_CHARS: usize = 200;

#[derive(Debug, Clone, Serialize)]
pub struct TagBadge {
    pub title: String,
    pub posts_with_tag: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub title: String,
    pub teaser_text: String,
    pub author: String,
    pub comments_amount: i64,
    pub image_url: Option<String>,
    pub published_at: NaiveDateTime,
    pub slug: String,
    pub tags: Vec<TagBadge>,
    pub first_tag_title: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub text: String,
    pub published_at: NaiveDateTime,
    pub author: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub title: String,
    pub text: String,
    pub author: String,
    pub comments: Vec<CommentView>,
    pub likes_amount: i64,
    pub image_url: Option<String>,
    pub published_at: NaiveDateTime,
    pub slug: String,
    pub tags: Vec<TagBadge>,
}

/// First 200 characters of the body, or all of it when shorter.
pub fn teaser(text: &str) -> String {
    text.chars().take(TEASER_CHARS).collect()
}

/// Public URL of a post image, `None` when the post has no image.
pub fn image_url(media_url: &str, image: Option<&str>) -> Option<String> {
    image
        .filter(|path| !path.is_empty())
        .map(|path| format!("{}{}", media_url, path.trim_start_matches('/')))
}

pub fn tag_badge(tag: &PopularTag) -> TagBadge {
    TagBadge {
        title: tag.tag.title.clone(),
        posts_with_tag: tag.posts_count,
    }
}

pub fn tag_badges(tags: &[PopularTag]) -> Vec<TagBadge> {
    tags.iter().map(tag_badge).collect()
}

fn comment_view(comment: Comment) -> CommentView {
    CommentView {
        text: comment.text,
        published_at: comment.published_at,
        author: comment.author,
    }
}

/// Build cards for a listing. Comment counts and tags come from one query
/// each, whatever the number of posts.
pub fn post_cards(conn: &Connection, posts: &[Post], media_url: &str) -> AppResult<Vec<PostCard>> {
    let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
    let comment_counts = queries::comment_counts(conn, &ids)?;
    let mut tags = queries::tags_for_posts(conn, &ids)?;

    let cards = posts
        .iter()
        .map(|post| {
            let tags = tag_badges(&tags.remove(&post.id).unwrap_or_default());
            PostCard {
                title: post.title.clone(),
                teaser_text: teaser(&post.text),
                author: post.author.clone(),
                comments_amount: comment_counts.get(&post.id).copied().unwrap_or(0),
                image_url: image_url(media_url, post.image.as_deref()),
                published_at: post.published_at,
                slug: post.slug.clone(),
                first_tag_title: tags.first().map(|t| t.title.clone()),
                tags,
            }
        })
        .collect();
    Ok(cards)
}

pub fn popular_post_cards(
    conn: &Connection,
    popular: Vec<PopularPost>,
    media_url: &str,
) -> AppResult<Vec<PostCard>> {
    let posts: Vec<Post> = popular.into_iter().map(|p| p.post).collect();
    post_cards(conn, &posts, media_url)
}

pub fn post_detail(conn: &Connection, post: Post, media_url: &str) -> AppResult<PostDetail> {
    let comments = queries::comments_for_post(conn, &post.id)?
        .into_iter()
        .map(comment_view)
        .collect();
    let likes_amount = queries::likes_count(conn, &post.id)?;
    let tags = queries::tags_for_posts(conn, &[post.id.as_str()])?
        .remove(&post.id)
        .unwrap_or_default();

    Ok(PostDetail {
        image_url: image_url(media_url, post.image.as_deref()),
        title: post.title,
        text: post.text,
        author: post.author,
        comments,
        likes_amount,
        published_at: post.published_at,
        slug: post.slug,
        tags: tag_badges(&tags),
    })
}
