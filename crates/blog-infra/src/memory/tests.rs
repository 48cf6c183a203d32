use chrono::{TimeZone, Utc};
use uuid::Uuid;

use blog_core::domain::{Comment, Post, PostStatus, User};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};

use super::InMemoryStore;

async fn seed_author(store: &InMemoryStore, username: &str) -> User {
    store
        .users()
        .save(User::new(
            username.to_string(),
            format!("{}@example.com", username),
        ))
        .await
        .unwrap()
}

fn post_on(author: &User, slug: &str, y: i32, m: u32, d: u32, h: u32) -> Post {
    Post::new(author.id, slug.replace('-', " "), slug.to_string(), String::new())
        .with_publish(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
}

#[tokio::test]
async fn list_is_newest_first_and_published_is_a_filtered_subset() {
    let store = InMemoryStore::new();
    let author = seed_author(&store, "ana").await;
    let posts = store.posts();

    let old = posts
        .save(post_on(&author, "old", 2023, 1, 1, 9).with_status(PostStatus::Published))
        .await
        .unwrap();
    let draft = posts.save(post_on(&author, "draft", 2023, 6, 1, 9)).await.unwrap();
    let new = posts
        .save(post_on(&author, "new", 2024, 1, 1, 9).with_status(PostStatus::Published))
        .await
        .unwrap();

    let all = posts.list().await.unwrap();
    let ids: Vec<Uuid> = all.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![new.id, draft.id, old.id]);

    let published = posts.list_published().await.unwrap();
    let ids: Vec<Uuid> = published.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![new.id, old.id]);
    assert!(published.iter().all(|p| all.contains(p)));
}

#[tokio::test]
async fn duplicate_slug_on_same_day_is_rejected() {
    let store = InMemoryStore::new();
    let author = seed_author(&store, "ana").await;
    let posts = store.posts();

    posts.save(post_on(&author, "hello", 2024, 5, 1, 8)).await.unwrap();

    let err = posts
        .save(post_on(&author, "hello", 2024, 5, 1, 20))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Constraint(_)));

    // Same slug on another day is fine.
    posts.save(post_on(&author, "hello", 2024, 5, 2, 8)).await.unwrap();
}

#[tokio::test]
async fn resaving_a_post_keeps_its_creation_timestamps() {
    let store = InMemoryStore::new();
    let author = seed_author(&store, "ana").await;
    let posts = store.posts();

    let mut post = post_on(&author, "stamped", 2024, 5, 1, 8);
    let stamp = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    post.created = stamp;
    post.updated = stamp;
    let mut post = posts.save(post).await.unwrap();

    post.title = "Edited".to_string();
    post.updated = Utc::now();
    let saved = posts.save(post).await.unwrap();

    assert_eq!(saved.title, "Edited");
    assert_eq!(saved.created, stamp);
    assert_eq!(saved.updated, stamp);
}

#[tokio::test]
async fn post_requires_existing_author() {
    let store = InMemoryStore::new();
    let ghost = User::new("ghost".to_string(), "ghost@example.com".to_string());

    let err = store
        .posts()
        .save(post_on(&ghost, "boo", 2024, 1, 1, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::ForeignKey(_)));
}

#[tokio::test]
async fn find_by_date_and_slug_matches_calendar_day() {
    let store = InMemoryStore::new();
    let author = seed_author(&store, "ana").await;
    let posts = store.posts();
    let post = posts.save(post_on(&author, "late-night", 2024, 5, 1, 23)).await.unwrap();

    let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let found = posts.find_by_date_and_slug(date, "late-night").await.unwrap();
    assert_eq!(found.map(|p| p.id), Some(post.id));

    let next_day = date.succ_opt().unwrap();
    assert!(posts.find_by_date_and_slug(next_day, "late-night").await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_an_author_cascades_to_posts_and_comments() {
    let store = InMemoryStore::new();
    let ana = seed_author(&store, "ana").await;
    let bo = seed_author(&store, "bo").await;
    let posts = store.posts();
    let comments = store.comments();

    let doomed = posts.save(post_on(&ana, "doomed", 2024, 1, 1, 0)).await.unwrap();
    let kept = posts.save(post_on(&bo, "kept", 2024, 1, 1, 0)).await.unwrap();
    let comment = comments
        .save(Comment::new(doomed.id, "Cy".into(), "cy@example.com".into(), "Hi".into()))
        .await
        .unwrap();

    store.users().delete(ana.id).await.unwrap();

    assert!(posts.find_by_author(ana.id).await.unwrap().is_empty());
    assert!(posts.find_by_id(doomed.id).await.unwrap().is_none());
    assert!(comments.find_by_id(comment.id).await.unwrap().is_none());
    assert!(posts.find_by_id(kept.id).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_a_post_cascades_to_its_comments_only() {
    let store = InMemoryStore::new();
    let author = seed_author(&store, "ana").await;
    let posts = store.posts();
    let comments = store.comments();

    let first = posts.save(post_on(&author, "first", 2024, 1, 1, 0)).await.unwrap();
    let second = posts.save(post_on(&author, "second", 2024, 1, 2, 0)).await.unwrap();
    for post in [&first, &second] {
        comments
            .save(Comment::new(post.id, "Cy".into(), "cy@example.com".into(), "Hi".into()))
            .await
            .unwrap();
    }

    posts.delete(first.id).await.unwrap();

    assert!(comments.list_for_post(first.id).await.unwrap().is_empty());
    assert_eq!(comments.list_for_post(second.id).await.unwrap().len(), 1);
    assert!(matches!(posts.delete(first.id).await, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn comments_list_oldest_first_and_hidden_ones_are_filtered() {
    let store = InMemoryStore::new();
    let author = seed_author(&store, "ana").await;
    let post = store.posts().save(post_on(&author, "talk", 2024, 1, 1, 0)).await.unwrap();
    let comments = store.comments();

    let mut later = Comment::new(post.id, "B".into(), "b@example.com".into(), "2nd".into());
    later.created = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let mut earlier = Comment::new(post.id, "A".into(), "a@example.com".into(), "1st".into());
    earlier.created = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

    let later = comments.save(later).await.unwrap();
    let earlier = comments.save(earlier).await.unwrap();

    let names: Vec<String> = comments
        .list_for_post(post.id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["A", "B"]);

    comments.set_active(earlier.id, false).await.unwrap();
    let visible = comments.list_active_for_post(post.id).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, later.id);
}

#[tokio::test]
async fn resaving_a_comment_refreshes_updated_and_keeps_owner() {
    let store = InMemoryStore::new();
    let author = seed_author(&store, "ana").await;
    let posts = store.posts();
    let post = posts.save(post_on(&author, "talk", 2024, 1, 1, 0)).await.unwrap();
    let other = posts.save(post_on(&author, "other", 2024, 1, 1, 0)).await.unwrap();

    let stamp = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let mut comment = Comment::new(post.id, "A".into(), "a@example.com".into(), "x".into());
    comment.created = stamp;
    comment.updated = stamp;
    let mut comment = store.comments().save(comment).await.unwrap();

    comment.body = "edited".to_string();
    comment.post_id = other.id;
    let saved = store.comments().save(comment).await.unwrap();

    assert_eq!(saved.created, stamp);
    assert!(saved.updated > stamp);
    assert_eq!(saved.post_id, post.id);
}

#[tokio::test]
async fn set_active_on_missing_comment_is_not_found() {
    let store = InMemoryStore::new();
    let err = store.comments().set_active(Uuid::new_v4(), false).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound));
}

#[tokio::test]
async fn tags_are_shared_and_filter_published_posts() {
    let store = InMemoryStore::new();
    let author = seed_author(&store, "ana").await;
    let posts = store.posts();

    let live = posts
        .save(post_on(&author, "live", 2024, 1, 1, 0).with_status(PostStatus::Published))
        .await
        .unwrap();
    let draft = posts.save(post_on(&author, "draft", 2024, 1, 2, 0)).await.unwrap();

    let tags = posts
        .set_tags(live.id, &["Rust".to_string(), "rust".to_string(), "Web Dev".to_string()])
        .await
        .unwrap();
    let slugs: Vec<&str> = tags.iter().map(|t| t.slug.as_str()).collect();
    assert_eq!(slugs, vec!["rust", "web-dev"]);

    let draft_tags = posts.set_tags(draft.id, &["rust".to_string()]).await.unwrap();
    assert_eq!(draft_tags[0].id, tags[0].id);

    let tagged = posts.list_published_by_tag("rust").await.unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].id, live.id);
    assert!(posts.list_published_by_tag("nope").await.unwrap().is_empty());

    // Replacing the set drops the old links.
    posts.set_tags(live.id, &["Web Dev".to_string()]).await.unwrap();
    assert!(posts.list_published_by_tag("rust").await.unwrap().is_empty());
    assert_eq!(posts.tags_for(live.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn usernames_are_unique() {
    let store = InMemoryStore::new();
    seed_author(&store, "ana").await;

    let err = store
        .users()
        .save(User::new("ana".to_string(), "other@example.com".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Constraint(_)));
    assert!(store.users().find_by_username("ana").await.unwrap().is_some());
}
