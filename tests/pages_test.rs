use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use blog::config::Config;
use blog::db::{self, editor, editor::NewComment, editor::NewPost};
use blog::routes;
use blog::state::{AppState, DbPool};
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;
use tower::ServiceExt;

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Temp database with two tagged posts, likes and comments.
fn setup() -> (TempDir, DbPool, Router) {
    let temp_dir = TempDir::new().unwrap();
    let db_pool = db::create_pool(&temp_dir.path().join("blog.db"))
        .expect("Failed to create test database");
    db::run_migrations(&db_pool).expect("Failed to run migrations");

    {
        let conn = db_pool.get().unwrap();
        let author = editor::create_user(&conn, "editor", true).unwrap();
        let reader = editor::create_user(&conn, "reader", false).unwrap();

        let rust = editor::save_tag(&conn, "Rust").unwrap();
        let life = editor::save_tag(&conn, "life").unwrap();

        let systems = editor::create_post(
            &conn,
            &NewPost {
                title: "Systems programming".into(),
                text: format!("{}TAIL-NOT-IN-TEASER", "s".repeat(200)),
                slug: "systems".into(),
                image: Some("covers/systems.png".into()),
                published_at: at(1, 9),
                author_id: author.clone(),
            },
        )
        .unwrap();
        let weekend = editor::create_post(
            &conn,
            &NewPost {
                title: "A quiet weekend".into(),
                text: "Short & sweet".into(),
                slug: "weekend".into(),
                image: None,
                published_at: at(2, 9),
                author_id: author.clone(),
            },
        )
        .unwrap();

        editor::tag_post(&conn, &systems, &rust.id).unwrap();
        editor::tag_post(&conn, &systems, &life.id).unwrap();
        editor::tag_post(&conn, &weekend, &life.id).unwrap();
        editor::like_post(&conn, &systems, &reader).unwrap();

        for (text, author_id, published_at) in [
            ("Second comment", &author, at(3, 12)),
            ("First comment", &reader, at(3, 10)),
        ] {
            editor::add_comment(
                &conn,
                &NewComment {
                    post_id: systems.clone(),
                    author_id: author_id.clone(),
                    text: text.into(),
                    published_at,
                },
            )
            .unwrap();
        }
    }

    let state = AppState {
        db: db_pool.clone(),
        config: Config::default(),
    };
    (temp_dir, db_pool, routes::router(state))
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn index_lists_fresh_and_popular_posts() {
    let (_dir, _pool, app) = setup();

    let (status, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Systems programming"));
    assert!(body.contains("A quiet weekend"));
    assert!(body.contains("systems.png"));
    assert!(body.contains("#life (2)"));
    assert!(body.contains("#rust (1)"));
    assert!(body.contains("2 comments"));
    assert!(!body.contains("TAIL-NOT-IN-TEASER"));
    // Template output is escaped
    assert!(body.contains("Short &amp; sweet"));
}

#[tokio::test]
async fn index_renders_with_empty_database() {
    let temp_dir = TempDir::new().unwrap();
    let db_pool = db::create_pool(&temp_dir.path().join("empty.db")).unwrap();
    db::run_migrations(&db_pool).unwrap();
    let app = routes::router(AppState {
        db: db_pool,
        config: Config::default(),
    });

    let (status, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Nothing has been published yet."));
}

#[tokio::test]
async fn post_detail_shows_full_text_and_ordered_comments() {
    let (_dir, _pool, app) = setup();

    let (status, body) = get(app, "/post/systems").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("TAIL-NOT-IN-TEASER"));
    assert!(body.contains("1 likes"));
    assert!(body.contains("Comments (2)"));

    let first = body.find("First comment").unwrap();
    let second = body.find("Second comment").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let (_dir, _pool, app) = setup();

    let (status, body) = get(app, "/post/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Post not found");
}

#[tokio::test]
async fn tag_filter_lists_tagged_posts() {
    let (_dir, _pool, app) = setup();

    let (status, body) = get(app, "/tag/rust").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Posts tagged #rust"));
    assert!(body.contains("/post/systems"));
}

#[tokio::test]
async fn tag_filter_matches_any_case() {
    let (_dir, _pool, app) = setup();

    let (status, body) = get(app, "/tag/RUST").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Posts tagged #rust"));
}

#[tokio::test]
async fn unknown_tag_is_not_found() {
    let (_dir, _pool, app) = setup();

    let (status, body) = get(app, "/tag/cooking").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Tag not found");
}

#[tokio::test]
async fn contacts_page_renders() {
    let (_dir, _pool, app) = setup();

    let (status, body) = get(app, "/contacts").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Contacts"));
}

#[tokio::test]
async fn deleted_post_disappears_from_pages() {
    let (_dir, pool, app) = setup();
    {
        let conn = pool.get().unwrap();
        let post = db::queries::post_by_slug(&conn, "weekend").unwrap();
        editor::delete_post(&conn, &post.id).unwrap();
    }

    let (status, _) = get(app.clone(), "/post/weekend").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get(app, "/").await;
    assert!(!body.contains("A quiet weekend"));
    assert!(body.contains("#life (1)"));
}
