use chrono::{Duration, Utc};

use crate::db::editor::{self, NewComment, NewPost};
use crate::error::AppResult;
use crate::state::DbPool;

const DEMO_POSTS: &[(&str, &str, &[&str])] = &[
    (
        "Walking the northern ridge",
        "walking-the-northern-ridge",
        &["travel", "mountains"],
    ),
    ("Sourdough, week three", "sourdough-week-three", &["food"]),
    (
        "Notes on reading slowly",
        "notes-on-reading-slowly",
        &["books", "habits"],
    ),
    ("A winter in the city", "a-winter-in-the-city", &["travel"]),
    ("Keeping a paper journal", "keeping-a-paper-journal", &["habits"]),
    ("Cheap fixes for old bikes", "cheap-fixes-for-old-bikes", &["diy", "travel"]),
];

/// Fill an empty database with demo content. Returns the number of posts
/// created, 0 when any user or post already exists.
pub fn demo_content(pool: &DbPool) -> AppResult<usize> {
    let conn = pool.get()?;

    let (users, posts): (i64, i64) = conn.query_row(
        "SELECT (SELECT COUNT(*) FROM users), (SELECT COUNT(*) FROM posts)",
        [],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    if users > 0 || posts > 0 {
        tracing::info!(
            "Database already has {} users and {} posts, skipping seed",
            users,
            posts
        );
        return Ok(0);
    }

    let tx = conn.unchecked_transaction()?;
    let author = editor::create_user(&tx, "editor", true)?;
    let readers = ["anna", "boris", "chen", "dana"]
        .iter()
        .map(|name| editor::create_user(&tx, name, false))
        .collect::<AppResult<Vec<_>>>()?;

    let now = Utc::now().naive_utc();
    for (i, (title, slug, tags)) in DEMO_POSTS.iter().enumerate() {
        let published_at = now - Duration::days(3 * (DEMO_POSTS.len() - i) as i64);
        let text = format!(
            "{title}. {}",
            "This is demo content written to fill the page. ".repeat(8)
        );
        let post_id = editor::create_post(
            &tx,
            &NewPost {
                title: title.to_string(),
                text,
                slug: slug.to_string(),
                image: None,
                published_at,
                author_id: author.clone(),
            },
        )?;

        for tag_title in tags.iter() {
            let tag = editor::save_tag(&tx, tag_title)?;
            editor::tag_post(&tx, &post_id, &tag.id)?;
        }

        // Spread likes and comments so the rankings differ.
        for reader in readers.iter().take(i % readers.len() + 1) {
            editor::like_post(&tx, &post_id, reader)?;
        }
        for (n, reader) in readers.iter().rev().take(i % 3).enumerate() {
            editor::add_comment(
                &tx,
                &NewComment {
                    post_id: post_id.clone(),
                    author_id: reader.clone(),
                    text: format!("Comment number {} on this post.", n + 1),
                    published_at: published_at + Duration::hours(n as i64 + 1),
                },
            )?;
        }
    }
    tx.commit()?;

    tracing::info!("Seeded {} demo posts", DEMO_POSTS.len());
    Ok(DEMO_POSTS.len())
}
