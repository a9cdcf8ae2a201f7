use chrono::NaiveDateTime;

/// A post with its author's username already joined in.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub text: String,
    pub slug: String,
    /// Path relative to the media root.
    pub image: Option<String>,
    pub published_at: NaiveDateTime,
    pub author_id: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub title: String,
}

impl Tag {
    /// Tags are stored lowercase.
    pub fn normalize_title(title: &str) -> String {
        title.trim().to_lowercase()
    }
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub author: String,
    pub text: String,
    pub published_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct PopularPost {
    pub post: Post,
    pub likes_count: i64,
}

#[derive(Debug, Clone)]
pub struct PopularTag {
    pub tag: Tag,
    pub posts_count: i64,
}
