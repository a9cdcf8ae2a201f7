//! Write-side helpers for creating and removing blog content.
//!
//! The public pages never write; these are used by the demo seeder and tests.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::models::Tag;
use crate::error::{AppError, AppResult};

const MAX_TITLE_LEN: usize = 200;
const MAX_SLUG_LEN: usize = 200;
const MAX_TAG_LEN: usize = 20;

pub struct NewPost {
    pub title: String,
    pub text: String,
    pub slug: String,
    pub image: Option<String>,
    pub published_at: NaiveDateTime,
    pub author_id: String,
}

pub struct NewComment {
    pub post_id: String,
    pub author_id: String,
    pub text: String,
    pub published_at: NaiveDateTime,
}

pub fn create_user(conn: &Connection, username: &str, is_staff: bool) -> AppResult<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username cannot be empty".into()));
    }

    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO users (id, username, is_staff) VALUES (?1, ?2, ?3)",
        params![id, username, is_staff],
    )?;
    Ok(id)
}

/// Insert a post. Only staff users may author posts.
pub fn create_post(conn: &Connection, post: &NewPost) -> AppResult<String> {
    let title = post.title.trim();
    let slug = post.slug.trim();
    if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::BadRequest(format!(
            "Post title must be 1 to {MAX_TITLE_LEN} characters"
        )));
    }
    if slug.is_empty() || slug.chars().count() > MAX_SLUG_LEN {
        return Err(AppError::BadRequest(format!(
            "Post slug must be 1 to {MAX_SLUG_LEN} characters"
        )));
    }

    let is_staff: bool = conn
        .query_row(
            "SELECT is_staff FROM users WHERE id = ?1",
            params![post.author_id],
            |r| r.get(0),
        )
        .optional()?
        .ok_or_else(|| AppError::BadRequest("Post author does not exist".into()))?;
    if !is_staff {
        return Err(AppError::BadRequest(
            "Post author must be a staff member".into(),
        ));
    }

    let image = post.image.as_deref().filter(|path| !path.is_empty());
    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO posts (id, title, text, slug, image, published_at, author_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![id, title, post.text, slug, image, post.published_at, post.author_id],
    )?;
    Ok(id)
}

/// Save a tag under its lowercase title, returning the existing row when
/// the normalized title is already taken.
pub fn save_tag(conn: &Connection, title: &str) -> AppResult<Tag> {
    let title = Tag::normalize_title(title);
    if title.is_empty() || title.chars().count() > MAX_TAG_LEN {
        return Err(AppError::BadRequest(format!(
            "Tag title must be 1 to {MAX_TAG_LEN} characters"
        )));
    }

    conn.execute(
        "INSERT INTO tags (id, title) VALUES (?1, ?2) ON CONFLICT(title) DO NOTHING",
        params![uuid::Uuid::now_v7().to_string(), title],
    )?;

    let tag = conn.query_row(
        "SELECT id, title FROM tags WHERE title = ?1",
        params![title],
        |r| {
            Ok(Tag {
                id: r.get(0)?,
                title: r.get(1)?,
            })
        },
    )?;
    Ok(tag)
}

pub fn tag_post(conn: &Connection, post_id: &str, tag_id: &str) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?1, ?2)",
        params![post_id, tag_id],
    )?;
    Ok(())
}

/// Record that a user likes a post. Liking twice is a no-op.
pub fn like_post(conn: &Connection, post_id: &str, user_id: &str) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO post_likes (post_id, user_id) VALUES (?1, ?2)",
        params![post_id, user_id],
    )?;
    Ok(())
}

pub fn add_comment(conn: &Connection, comment: &NewComment) -> AppResult<String> {
    let text = comment.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("Comment cannot be empty".into()));
    }

    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO comments (id, post_id, author_id, text, published_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, comment.post_id, comment.author_id, text, comment.published_at],
    )?;
    Ok(id)
}

pub fn delete_post(conn: &Connection, post_id: &str) -> AppResult<()> {
    let rows = conn.execute("DELETE FROM posts WHERE id = ?1", params![post_id])?;
    if rows == 0 {
        return Err(AppError::NotFound("Post"));
    }
    Ok(())
}

/// Remove a user together with their posts, comments and likes.
pub fn delete_user(conn: &Connection, user_id: &str) -> AppResult<()> {
    let rows = conn.execute("DELETE FROM users WHERE id = ?1", params![user_id])?;
    if rows == 0 {
        return Err(AppError::NotFound("User"));
    }
    Ok(())
}
