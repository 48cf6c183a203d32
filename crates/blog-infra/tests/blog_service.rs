//! End-to-end blog workflows over the in-memory backend.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use blog_core::domain::{Post, PostDetailRoute, PostStatus};
use blog_core::ports::BaseRepository;
use blog_core::{BlogService, DomainError};
use blog_infra::Repositories;

fn service() -> BlogService {
    Repositories::in_memory().service()
}

fn draft(author_id: Uuid, slug: &str) -> Post {
    Post::new(
        author_id,
        format!("About {}", slug),
        slug.to_string(),
        "Body text".to_string(),
    )
    .with_publish(Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap())
}

#[tokio::test]
async fn publishing_makes_a_post_reachable_by_its_url() {
    let blog = service();
    let author = blog.register_author("ana", "ana@example.com").await.unwrap();
    let post = blog.create_post(draft(author.id, "first-steps")).await.unwrap();

    let route = PostDetailRoute::parse(&post.absolute_url()).unwrap();
    assert!(matches!(
        blog.post_detail(&route).await,
        Err(DomainError::PostNotFound { .. })
    ));
    assert!(blog.published_posts().await.unwrap().is_empty());

    let published = blog.publish_post(post.id).await.unwrap();
    assert_eq!(published.status, PostStatus::Published);
    assert_eq!(published.updated, post.updated);

    let found = blog.post_detail(&route).await.unwrap();
    assert_eq!(found.id, post.id);
    assert_eq!(found.to_string(), "About first-steps");

    blog.retract_post(post.id).await.unwrap();
    assert!(blog.published_posts().await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_slug_on_the_same_day_is_a_duplicate_error() {
    let blog = service();
    let author = blog.register_author("ana", "ana@example.com").await.unwrap();
    blog.create_post(draft(author.id, "same")).await.unwrap();

    let err = blog.create_post(draft(author.id, "same")).await.unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));
}

#[tokio::test]
async fn invalid_posts_and_comments_never_reach_storage() {
    let blog = service();
    let author = blog.register_author("ana", "ana@example.com").await.unwrap();

    let err = blog.create_post(draft(author.id, "bad slug")).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = blog.create_post(draft(Uuid::new_v4(), "orphan")).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "User", .. }));

    let post = blog.create_post(draft(author.id, "ok")).await.unwrap();
    let err = blog
        .add_comment(post.id, "Bo", "not an email", "hi")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    assert!(blog.comments_for(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn moderation_hides_comments_without_deleting_them() {
    let blog = service();
    let author = blog.register_author("ana", "ana@example.com").await.unwrap();
    let post = blog.create_post(draft(author.id, "talk")).await.unwrap();

    let comment = blog
        .add_comment(post.id, "Bo", "bo@example.com", "Great read")
        .await
        .unwrap();
    assert_eq!(comment.on(&post).to_string(), "Comment by Bo on About talk");

    let hidden = blog.moderate_comment(comment.id, false).await.unwrap();
    assert!(!hidden.active);
    assert!(hidden.updated >= comment.updated);
    assert!(blog.comments_for(post.id).await.unwrap().is_empty());

    blog.moderate_comment(comment.id, true).await.unwrap();
    assert_eq!(blog.comments_for(post.id).await.unwrap().len(), 1);

    let err = blog.moderate_comment(Uuid::new_v4(), false).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Comment", .. }));
}

#[tokio::test]
async fn deleting_an_author_removes_their_posts_and_comments() {
    let repos = Repositories::in_memory();
    let blog = repos.service();
    let author = blog.register_author("ana", "ana@example.com").await.unwrap();
    let post = blog.create_post(draft(author.id, "gone")).await.unwrap();
    let comment = blog
        .add_comment(post.id, "Bo", "bo@example.com", "bye")
        .await
        .unwrap();

    blog.delete_author(author.id).await.unwrap();

    assert!(repos.posts.find_by_id(post.id).await.unwrap().is_none());
    assert!(repos.comments.find_by_id(comment.id).await.unwrap().is_none());
    assert!(matches!(
        blog.delete_post(post.id).await,
        Err(DomainError::NotFound { entity_type: "Post", .. })
    ));
}

#[tokio::test]
async fn tagged_posts_are_listed_by_tag_slug() {
    let blog = service();
    let author = blog.register_author("ana", "ana@example.com").await.unwrap();
    let post = blog
        .create_post(draft(author.id, "tagged").with_status(PostStatus::Published))
        .await
        .unwrap();

    let tags = blog
        .tag_post(post.id, &["Rust".to_string(), "Async IO".to_string()])
        .await
        .unwrap();
    let names: Vec<String> = tags.iter().map(ToString::to_string).collect();
    assert_eq!(names, vec!["Async IO", "Rust"]);

    let tagged = blog.published_posts_tagged("async-io").await.unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].id, post.id);
}

#[tokio::test]
async fn usernames_must_be_unique() {
    let blog = service();
    blog.register_author("ana", "ana@example.com").await.unwrap();
    let err = blog
        .register_author("ana", "other@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));
}

#[tokio::test]
async fn creating_a_post_twice_does_not_overwrite_it() {
    let repos = Repositories::in_memory();
    let blog = repos.service();
    let author = blog.register_author("ana", "ana@example.com").await.unwrap();
    let post = blog.create_post(draft(author.id, "original")).await.unwrap();

    let mut again = post.clone();
    again.title = "Overwritten".to_string();
    let err = blog.create_post(again).await.unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));

    let stored = repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "About original");
}

#[tokio::test]
async fn moving_a_post_to_an_unknown_author_is_not_found() {
    let blog = service();
    let author = blog.register_author("ana", "ana@example.com").await.unwrap();
    let mut post = blog.create_post(draft(author.id, "owned")).await.unwrap();

    post.author_id = Uuid::new_v4();
    let err = blog.update_post(post).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "User", .. }));
}

#[tokio::test]
async fn tags_in_non_latin_scripts_are_kept() {
    let blog = service();
    let author = blog.register_author("ana", "ana@example.com").await.unwrap();
    let post = blog
        .create_post(draft(author.id, "intl").with_status(PostStatus::Published))
        .await
        .unwrap();

    let tags = blog
        .tag_post(post.id, &["日本語".to_string(), "Ελληνικά".to_string()])
        .await
        .unwrap();
    assert_eq!(tags.len(), 2);

    let tagged = blog.published_posts_tagged("ελληνικά").await.unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].id, post.id);
}

#[tokio::test]
async fn unusable_tag_names_are_rejected() {
    let blog = service();
    let author = blog.register_author("ana", "ana@example.com").await.unwrap();
    let post = blog.create_post(draft(author.id, "tags")).await.unwrap();

    let err = blog
        .tag_post(post.id, &["x".repeat(300)])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = blog
        .tag_post(post.id, &["rust".to_string(), "?!".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}
