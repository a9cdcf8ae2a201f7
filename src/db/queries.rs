//! Read-only queries behind the public pages.
//!
//! Rankings are recomputed on every call. Functions that take a set of post
//! ids answer with a single aggregate query so page listings never issue one
//! query per post.

use std::collections::HashMap;

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::db::models::{Comment, PopularPost, PopularTag, Post, Tag};
use crate::error::{AppError, AppResult};

const POST_COLUMNS: &str =
    "p.id, p.title, p.text, p.slug, p.image, p.published_at, p.author_id, u.username";

fn post_from_row(row: &Row) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        text: row.get(2)?,
        slug: row.get(3)?,
        image: row.get(4)?,
        published_at: row.get(5)?,
        author_id: row.get(6)?,
        author: row.get(7)?,
    })
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Newest posts first.
pub fn recent_posts(conn: &Connection, limit: usize) -> AppResult<Vec<Post>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {POST_COLUMNS}
         FROM posts p
         JOIN users u ON u.id = p.author_id
         ORDER BY p.published_at DESC
         LIMIT ?1"
    ))?;
    let posts = stmt
        .query_map(params![limit as i64], post_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

/// Posts ranked by number of distinct likers.
pub fn popular_posts(conn: &Connection, limit: usize) -> AppResult<Vec<PopularPost>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {POST_COLUMNS}, COUNT(DISTINCT l.user_id) AS likes_count
         FROM posts p
         JOIN users u ON u.id = p.author_id
         LEFT JOIN post_likes l ON l.post_id = p.id
         GROUP BY p.id
         ORDER BY likes_count DESC, p.published_at DESC
         LIMIT ?1"
    ))?;
    let posts = stmt
        .query_map(params![limit as i64], |row| {
            Ok(PopularPost {
                post: post_from_row(row)?,
                likes_count: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

/// Posts published during `year`, oldest first.
pub fn posts_in_year(conn: &Connection, year: i32) -> AppResult<Vec<Post>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {POST_COLUMNS}
         FROM posts p
         JOIN users u ON u.id = p.author_id
         WHERE strftime('%Y', p.published_at) = ?1
         ORDER BY p.published_at ASC"
    ))?;
    let posts = stmt
        .query_map(params![format!("{year:04}")], post_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

/// Tags ranked by number of posts carrying them.
pub fn popular_tags(conn: &Connection, limit: usize) -> AppResult<Vec<PopularTag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.title, COUNT(pt.post_id) AS posts_count
         FROM tags t
         LEFT JOIN post_tags pt ON pt.tag_id = t.id
         GROUP BY t.id
         ORDER BY posts_count DESC, t.title ASC
         LIMIT ?1",
    )?;
    let tags = stmt
        .query_map(params![limit as i64], |row| {
            Ok(PopularTag {
                tag: Tag {
                    id: row.get(0)?,
                    title: row.get(1)?,
                },
                posts_count: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

/// Number of comments per post. Every requested id that exists is present in
/// the result, with 0 when the post has no comments.
pub fn comment_counts(conn: &Connection, post_ids: &[&str]) -> AppResult<HashMap<String, i64>> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT p.id, COUNT(c.id)
         FROM posts p
         LEFT JOIN comments c ON c.post_id = p.id
         WHERE p.id IN ({})
         GROUP BY p.id",
        placeholders(post_ids.len())
    ))?;
    let counts = stmt
        .query_map(params_from_iter(post_ids.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<Result<HashMap<_, _>, _>>()?;
    Ok(counts)
}

/// Tags of each post, most popular first, each with its total post count.
pub fn tags_for_posts(
    conn: &Connection,
    post_ids: &[&str],
) -> AppResult<HashMap<String, Vec<PopularTag>>> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT pt.post_id, t.id, t.title,
                (SELECT COUNT(*) FROM post_tags x WHERE x.tag_id = t.id) AS posts_count
         FROM post_tags pt
         JOIN tags t ON t.id = pt.tag_id
         WHERE pt.post_id IN ({})
         ORDER BY posts_count DESC, t.title ASC",
        placeholders(post_ids.len())
    ))?;
    let rows = stmt
        .query_map(params_from_iter(post_ids.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                PopularTag {
                    tag: Tag {
                        id: row.get(1)?,
                        title: row.get(2)?,
                    },
                    posts_count: row.get(3)?,
                },
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut by_post: HashMap<String, Vec<PopularTag>> = HashMap::new();
    for (post_id, tag) in rows {
        by_post.entry(post_id).or_default().push(tag);
    }
    Ok(by_post)
}

/// Look up a post by slug. Slugs are not unique; the newest match wins.
pub fn post_by_slug(conn: &Connection, slug: &str) -> AppResult<Post> {
    conn.query_row(
        &format!(
            "SELECT {POST_COLUMNS}
             FROM posts p
             JOIN users u ON u.id = p.author_id
             WHERE p.slug = ?1
             ORDER BY p.published_at DESC
             LIMIT 1"
        ),
        params![slug],
        post_from_row,
    )
    .optional()?
    .ok_or(AppError::NotFound("Post"))
}

pub fn likes_count(conn: &Connection, post_id: &str) -> AppResult<i64> {
    let count = conn.query_row(
        "SELECT COUNT(DISTINCT user_id) FROM post_likes WHERE post_id = ?1",
        params![post_id],
        |r| r.get(0),
    )?;
    Ok(count)
}

/// Comments of a post, oldest first.
pub fn comments_for_post(conn: &Connection, post_id: &str) -> AppResult<Vec<Comment>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.post_id, c.author_id, u.username, c.text, c.published_at
         FROM comments c
         JOIN users u ON u.id = c.author_id
         WHERE c.post_id = ?1
         ORDER BY c.published_at ASC",
    )?;
    let comments = stmt
        .query_map(params![post_id], |row| {
            Ok(Comment {
                id: row.get(0)?,
                post_id: row.get(1)?,
                author_id: row.get(2)?,
                author: row.get(3)?,
                text: row.get(4)?,
                published_at: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(comments)
}

/// Look up a tag by title. The title is normalized the same way tags are
/// stored.
pub fn tag_by_title(conn: &Connection, title: &str) -> AppResult<Tag> {
    conn.query_row(
        "SELECT id, title FROM tags WHERE title = ?1",
        params![Tag::normalize_title(title)],
        |r| {
            Ok(Tag {
                id: r.get(0)?,
                title: r.get(1)?,
            })
        },
    )
    .optional()?
    .ok_or(AppError::NotFound("Tag"))
}

/// Posts carrying a tag, newest first.
pub fn posts_with_tag(conn: &Connection, tag_id: &str, limit: usize) -> AppResult<Vec<Post>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {POST_COLUMNS}
         FROM posts p
         JOIN users u ON u.id = p.author_id
         JOIN post_tags pt ON pt.post_id = p.id
         WHERE pt.tag_id = ?1
         ORDER BY p.published_at DESC
         LIMIT ?2"
    ))?;
    let posts = stmt
        .query_map(params![tag_id, limit as i64], post_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}
