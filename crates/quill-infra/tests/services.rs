//! Service behaviour against the in-memory store.

use std::sync::Arc;

use quill_core::DomainError;
use quill_core::domain::{
    Category, NewUpload, PostFilter, PostInput, PostStatus, Role, Session, User,
};
use quill_core::pagination::PageRequest;
use quill_core::ports::{BaseRepository, PostRepository};
use quill_core::services::{
    BlogService, CategoryService, PostService, SearchService, UploadService, UserService,
};
use quill_infra::{InMemoryFileStorage, InMemoryStore};
use uuid::Uuid;

struct Harness {
    store: Arc<InMemoryStore>,
    blog: BlogService,
    posts: PostService,
    categories: CategoryService,
    users: UserService,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            blog: BlogService::new(store.clone(), store.clone(), store.clone()),
            posts: PostService::new(store.clone(), store.clone(), store.clone()),
            categories: CategoryService::new(store.clone()),
            users: UserService::new(store.clone(), store.clone()),
            store,
        }
    }

    async fn user(&self, name: &str, role: Role) -> Session {
        let user = User::new(name.to_string(), format!("{}@example.com", name.to_lowercase()), role);
        let user = BaseRepository::<User, Uuid>::insert(self.store.as_ref(), user)
            .await
            .unwrap();
        Session {
            user_id: user.id,
            name: user.name,
            email: user.email,
            image: None,
            role,
        }
    }
}

fn input(title: &str, status: PostStatus) -> PostInput {
    PostInput {
        title: title.to_string(),
        slug: None,
        description: "About this post".to_string(),
        content: "Some words about rust and the web".to_string(),
        image_url: String::new(),
        tags: vec!["rust".to_string()],
        status,
        reading_time_mins: None,
        featured: false,
        repo_url: None,
        category_id: None,
        related_post_ids: None,
    }
}

#[tokio::test]
async fn listing_past_the_last_page_is_empty() {
    let h = Harness::new();
    let author = h.user("Ada", Role::User).await;
    for i in 0..3 {
        h.posts
            .create(&author, input(&format!("Post {i}"), PostStatus::Published))
            .await
            .unwrap();
    }

    let listing = h
        .blog
        .list(PostFilter::All, PageRequest::new(5).unwrap(), None)
        .await
        .unwrap();

    assert!(listing.page.items.is_empty());
    assert_eq!(listing.page.total_pages, 1);
    assert_eq!(listing.page.current_page, 5);
}

#[tokio::test]
async fn drafts_are_hidden_from_the_public() {
    let h = Harness::new();
    let author = h.user("Ada", Role::User).await;
    let draft = h
        .posts
        .create(&author, input("Secret draft", PostStatus::Draft))
        .await
        .unwrap();

    let listing = h
        .blog
        .list(PostFilter::All, PageRequest::first(), None)
        .await
        .unwrap();
    assert!(listing.page.items.is_empty());

    let err = h.blog.view_by_slug(&draft.slug).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn viewing_a_post_counts_each_read() {
    let h = Harness::new();
    let author = h.user("Ada", Role::User).await;
    h.posts
        .create(&author, input("Popular", PostStatus::Published))
        .await
        .unwrap();

    h.blog.view_by_slug("popular").await.unwrap();
    let detail = h.blog.view_by_slug("popular").await.unwrap();

    assert_eq!(detail.entry.post.views, 2);
    assert_eq!(detail.entry.author.unwrap().name, "Ada");

    let err = h.blog.record_view(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn duplicate_slugs_are_rejected() {
    let h = Harness::new();
    let author = h.user("Ada", Role::User).await;
    h.posts
        .create(&author, input("Same Title", PostStatus::Draft))
        .await
        .unwrap();

    let err = h
        .posts
        .create(&author, input("Same Title", PostStatus::Draft))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Duplicate(_)));
}

#[tokio::test]
async fn only_owners_and_admins_modify_posts() {
    let h = Harness::new();
    let owner = h.user("Ada", Role::User).await;
    let other = h.user("Bob", Role::User).await;
    let admin = h.user("Root", Role::Admin).await;
    let post = h
        .posts
        .create(&owner, input("Mine", PostStatus::Draft))
        .await
        .unwrap();

    let err = h
        .posts
        .update(&other, post.id, input("Stolen", PostStatus::Draft))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let updated = h
        .posts
        .update(&admin, post.id, input("Edited", PostStatus::Published))
        .await
        .unwrap();
    assert_eq!(updated.user_id, owner.user_id);
    assert_eq!(updated.slug, "edited");

    let err = h.posts.remove(&other, post.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));
    h.posts.remove(&owner, post.id).await.unwrap();
}

#[tokio::test]
async fn related_posts_are_validated_and_shown() {
    let h = Harness::new();
    let author = h.user("Ada", Role::User).await;
    let first = h
        .posts
        .create(&author, input("First", PostStatus::Published))
        .await
        .unwrap();

    let mut bad = input("Second", PostStatus::Published);
    bad.related_post_ids = Some(vec![Uuid::new_v4()]);
    let err = h.posts.create(&author, bad).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let mut good = input("Second", PostStatus::Published);
    good.related_post_ids = Some(vec![first.id]);
    h.posts.create(&author, good).await.unwrap();

    let detail = h.blog.view_by_slug("second").await.unwrap();
    assert_eq!(detail.related_posts.len(), 1);
    assert_eq!(detail.related_posts[0].slug, "first");
}

#[tokio::test]
async fn listing_by_category_and_tag() {
    let h = Harness::new();
    let author = h.user("Ada", Role::User).await;
    let category = h.categories.create(&author, "Systems").await.unwrap();

    let mut filed = input("Filed", PostStatus::Published);
    filed.category_id = Some(category.id.to_string());
    h.posts.create(&author, filed).await.unwrap();

    let mut tagged = input("Tagged", PostStatus::Published);
    tagged.tags = vec!["web".to_string()];
    h.posts.create(&author, tagged).await.unwrap();

    let by_category = h
        .blog
        .list(PostFilter::Category(category.id), PageRequest::first(), None)
        .await
        .unwrap();
    assert_eq!(by_category.page.items.len(), 1);
    assert_eq!(by_category.page.items[0].category.as_ref().unwrap().name, "Systems");

    let by_tag = h
        .blog
        .list(PostFilter::Tag("web".into()), PageRequest::first(), None)
        .await
        .unwrap();
    assert_eq!(by_tag.page.items.len(), 1);
    assert_eq!(by_tag.page.items[0].post.slug, "tagged");
}

#[tokio::test]
async fn category_ownership_is_enforced() {
    let h = Harness::new();
    let owner = h.user("Ada", Role::User).await;
    let other = h.user("Bob", Role::User).await;
    let category = h.categories.create(&owner, "Rust").await.unwrap();

    let err = h
        .categories
        .update(&other, category.id, "Go")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let renamed = h
        .categories
        .update(&owner, category.id, "Rust  Lang")
        .await
        .unwrap();
    assert_eq!(renamed.name, "Rust Lang");

    let listed = h.categories.list_with_owner(&other).await.unwrap();
    assert_eq!(listed[0].owner.as_ref().unwrap().name, "Ada");

    let removed = h.categories.remove(&owner, category.id).await.unwrap();
    assert_eq!(removed.id, category.id);
    assert!(h.categories.list(&owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn saved_posts_come_back_with_listings() {
    let h = Harness::new();
    let reader = h.user("Ada", Role::User).await;
    let post = h
        .posts
        .create(&reader, input("Keep me", PostStatus::Published))
        .await
        .unwrap();

    h.users.save_post(&reader, post.id).await.unwrap();
    let user = h.users.save_post(&reader, post.id).await.unwrap();
    assert_eq!(user.saved_post_ids, vec![post.id]);

    let listing = h
        .blog
        .list(PostFilter::All, PageRequest::first(), Some(&reader))
        .await
        .unwrap();
    assert_eq!(listing.saved_post_ids, vec![post.id]);

    let user = h.users.unsave_post(&reader, post.id).await.unwrap();
    assert!(user.saved_post_ids.is_empty());

    let err = h.users.save_post(&reader, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn role_changes_are_admin_only() {
    let h = Harness::new();
    let admin = h.user("Root", Role::Admin).await;
    let other_admin = h.user("Ops", Role::Admin).await;
    let user = h.user("Ada", Role::User).await;

    let err = h.users.list(&user).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let listed = h.users.list(&admin).await.unwrap();
    assert_eq!(listed[0].role, Role::Admin);
    assert_eq!(listed.last().unwrap().name, "Ada");

    let promoted = h
        .users
        .set_role(&admin, user.user_id, Role::Admin)
        .await
        .unwrap();
    assert_eq!(promoted.role, Role::Admin);

    let err = h
        .users
        .set_role(&admin, other_admin.user_id, Role::User)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let err = h
        .users
        .set_role(&admin, admin.user_id, Role::User)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn dashboard_sums_the_callers_posts() {
    let h = Harness::new();
    let author = h.user("Ada", Role::User).await;
    let other = h.user("Bob", Role::User).await;
    h.categories.create(&author, "Rust").await.unwrap();

    let post = h
        .posts
        .create(&author, input("Read me", PostStatus::Published))
        .await
        .unwrap();
    h.posts
        .create(&other, input("Not mine", PostStatus::Published))
        .await
        .unwrap();
    h.store.increment_views(post.id).await.unwrap();
    h.store.increment_views(post.id).await.unwrap();

    let stats = h.posts.dashboard(&author).await.unwrap();
    assert_eq!(stats.total_posts, 1);
    assert_eq!(stats.total_views, 2);
    assert_eq!(stats.total_categories, 1);
    assert_eq!(stats.top_posts[0].title, "Read me");
}

#[tokio::test]
async fn search_matches_titles_and_categories() {
    let h = Harness::new();
    let search = SearchService::new(h.store.clone());
    let author = h.user("Ada", Role::User).await;

    h.posts
        .create(&author, input("Learning RUST", PostStatus::Published))
        .await
        .unwrap();
    h.posts
        .create(&author, input("Rusty draft", PostStatus::Draft))
        .await
        .unwrap();
    h.categories.create(&author, "Rustaceans").await.unwrap();

    let results = search.search("rust").await.unwrap().results;
    let json = serde_json::to_value(&results).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(json[0]["type"], "post");
    assert_eq!(json[0]["url"], "/blog/posts/learning-rust");
    assert_eq!(json[1]["type"], "category");
}

#[tokio::test]
async fn category_hits_are_the_most_recently_updated() {
    let h = Harness::new();
    let search = SearchService::new(h.store.clone());
    let author = h.user("Ada", Role::User).await;
    let now = chrono::Utc::now();

    for i in 0..10 {
        let mut category = Category::new(author.user_id, &format!("aa topic {i}")).unwrap();
        category.updated_at = now - chrono::Duration::minutes(30 - i);
        BaseRepository::<Category, Uuid>::insert(h.store.as_ref(), category)
            .await
            .unwrap();
    }
    let mut newest = Category::new(author.user_id, "zz topic newest").unwrap();
    newest.updated_at = now;
    BaseRepository::<Category, Uuid>::insert(h.store.as_ref(), newest)
        .await
        .unwrap();

    let results = search.search("topic").await.unwrap().results;
    let json = serde_json::to_value(&results).unwrap();
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|hit| hit["name"].as_str())
        .collect();

    assert_eq!(names.len(), 10);
    assert_eq!(names[0], "zz topic newest");
    assert!(!names.contains(&"aa topic 0"));
}

#[tokio::test]
async fn upload_removal_stops_when_the_provider_fails() {
    let store = Arc::new(InMemoryStore::new());
    let storage = Arc::new(InMemoryFileStorage::failing_on(["stuck".to_string()]));
    let uploads = UploadService::new(store.clone(), storage.clone());
    let session = Session {
        user_id: Uuid::new_v4(),
        name: "Ada".into(),
        email: "ada@example.com".into(),
        image: None,
        role: Role::User,
    };

    let upload = |key: &str| NewUpload {
        name: "cover.png".into(),
        url: format!("https://utfs.io/f/{key}"),
        file_key: key.into(),
        mime_type: "image/png".into(),
        size: 1024,
    };

    let ok = uploads.record(&session, upload("fine")).await.unwrap();
    let stuck = uploads.record(&session, upload("stuck")).await.unwrap();

    uploads.remove(&session, ok.id).await.unwrap();
    assert_eq!(storage.deleted().await, vec!["fine".to_string()]);

    let err = uploads.remove(&session, stuck.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Internal(_)));
    assert_eq!(uploads.list(&session).await.unwrap().len(), 1);

    let err = uploads.remove(&session, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
