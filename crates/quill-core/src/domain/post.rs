use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::slug::generate_slug;

const MIN_TEXT_LEN: usize = 3;
const WORDS_PER_MINUTE: usize = 200;

/// Publication state; only published posts are visible to the public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

/// Post entity - a blog article addressed publicly by its slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub views: i64,
    pub reading_time_mins: i32,
    pub featured: bool,
    pub repo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `user_id`.
    pub fn new(user_id: Uuid, fields: PostFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            category_id: fields.category_id,
            title: fields.title,
            slug: fields.slug,
            description: fields.description,
            content: fields.content,
            image_url: fields.image_url,
            tags: fields.tags,
            status: fields.status,
            views: 0,
            reading_time_mins: fields.reading_time_mins,
            featured: fields.featured,
            repo_url: fields.repo_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields. Owner, views and creation time are kept.
    pub fn apply(&mut self, fields: PostFields) {
        self.category_id = fields.category_id;
        self.title = fields.title;
        self.slug = fields.slug;
        self.description = fields.description;
        self.content = fields.content;
        self.image_url = fields.image_url;
        self.tags = fields.tags;
        self.status = fields.status;
        self.reading_time_mins = fields.reading_time_mins;
        self.featured = fields.featured;
        self.repo_url = fields.repo_url;
        self.updated_at = Utc::now();
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Public address of the post.
    pub fn url(&self) -> String {
        format!("/blog/posts/{}", self.slug)
    }
}

/// Raw post data as submitted by an author.
#[derive(Debug, Clone)]
pub struct PostInput {
    pub title: String,
    pub slug: Option<String>,
    pub description: String,
    pub content: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub reading_time_mins: Option<i32>,
    pub featured: bool,
    pub repo_url: Option<String>,
    pub category_id: Option<String>,
    pub related_post_ids: Option<Vec<Uuid>>,
}

/// Post data after normalization and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PostFields {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub reading_time_mins: i32,
    pub featured: bool,
    pub repo_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub related_post_ids: Option<Vec<Uuid>>,
}

impl PostInput {
    /// Normalize optional references, tags and slug, then validate.
    ///
    /// All validation failures are collected into a single error.
    pub fn normalize(self) -> Result<PostFields, DomainError> {
        let mut errors = Vec::new();

        let title = self.title.trim().to_string();
        let description = self.description.trim().to_string();
        let slug = match self.slug.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => generate_slug(s),
            _ => generate_slug(&title),
        };

        for (field, value) in [
            ("title", title.as_str()),
            ("slug", slug.as_str()),
            ("description", description.as_str()),
            ("content", self.content.trim()),
        ] {
            if value.chars().count() < MIN_TEXT_LEN {
                errors.push(format!("{field} must be at least {MIN_TEXT_LEN} characters"));
            }
        }

        let category_id = match blank_to_none(self.category_id) {
            Some(raw) => match Uuid::parse_str(&raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.push("category_id must be a valid id".to_string());
                    None
                }
            },
            None => None,
        };

        if self.reading_time_mins.is_some_and(|mins| mins < 0) {
            errors.push("reading_time_mins cannot be negative".to_string());
        }

        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        let reading_time_mins = self
            .reading_time_mins
            .unwrap_or_else(|| estimate_reading_time(&self.content));

        Ok(PostFields {
            title,
            slug,
            description,
            reading_time_mins,
            content: self.content,
            image_url: self.image_url.trim().to_string(),
            tags: normalize_tags(self.tags),
            status: self.status,
            featured: self.featured,
            repo_url: blank_to_none(self.repo_url),
            category_id,
            related_post_ids: self.related_post_ids,
        })
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim, drop empties and de-duplicate while keeping first-seen order.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Minutes needed to read `content` (markup ignored), never less than one.
pub fn estimate_reading_time(content: &str) -> i32 {
    let mut text = String::with_capacity(content.len());
    let mut in_tag = false;
    for ch in content.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    let words = text.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as i32
}

/// Public author details shown alongside a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
}

/// A post joined with its author and category.
#[derive(Debug, Clone, Serialize)]
pub struct PostEntry {
    #[serde(flatten)]
    pub post: Post,
    pub author: Option<AuthorSummary>,
    pub category: Option<super::Category>,
}

/// Minimal view of a related post.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub image_url: String,
}

impl From<Post> for RelatedPost {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            image_url: post.image_url,
        }
    }
}

/// Full single-post view.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub entry: PostEntry,
    pub related_posts: Vec<RelatedPost>,
}

/// Which posts a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Category(Uuid),
    Tag(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> PostInput {
        PostInput {
            title: "Hello, World! & More".to_string(),
            slug: None,
            description: "A first post".to_string(),
            content: "<p>Some content here</p>".to_string(),
            image_url: "https://cdn.example.com/a.png".to_string(),
            tags: vec![],
            status: PostStatus::Draft,
            reading_time_mins: None,
            featured: false,
            repo_url: None,
            category_id: None,
            related_post_ids: None,
        }
    }

    #[test]
    fn slug_defaults_to_title() {
        let fields = input().normalize().unwrap();
        assert_eq!(fields.slug, "hello-world-and-more");
    }

    #[test]
    fn supplied_slug_is_slugified() {
        let fields = PostInput {
            slug: Some("My Custom Slug".into()),
            ..input()
        }
        .normalize()
        .unwrap();
        assert_eq!(fields.slug, "my-custom-slug");
    }

    #[test]
    fn empty_optional_references_become_none() {
        let fields = PostInput {
            category_id: Some("".into()),
            repo_url: Some("  ".into()),
            ..input()
        }
        .normalize()
        .unwrap();
        assert_eq!(fields.category_id, None);
        assert_eq!(fields.repo_url, None);
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        let fields = PostInput {
            tags: vec![" rust ".into(), "web".into(), "rust".into(), "".into()],
            ..input()
        }
        .normalize()
        .unwrap();
        assert_eq!(fields.tags, vec!["rust".to_string(), "web".to_string()]);
    }

    #[test]
    fn collects_every_validation_failure() {
        let err = PostInput {
            title: "Hi".into(),
            description: "".into(),
            category_id: Some("not-a-uuid".into()),
            ..input()
        }
        .normalize()
        .unwrap_err();

        match err {
            DomainError::Validation(errors) => {
                assert_eq!(errors.len(), 4, "{errors:?}");
                assert!(errors.iter().any(|e| e.starts_with("title")));
                assert!(errors.iter().any(|e| e.starts_with("slug")));
                assert!(errors.iter().any(|e| e.starts_with("description")));
                assert!(errors.iter().any(|e| e.starts_with("category_id")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reading_time_is_estimated_from_text() {
        assert_eq!(estimate_reading_time(""), 1);
        let words = "word ".repeat(401);
        assert_eq!(estimate_reading_time(&format!("<p>{words}</p>")), 3);
    }

    #[test]
    fn explicit_reading_time_wins() {
        let fields = PostInput {
            reading_time_mins: Some(12),
            ..input()
        }
        .normalize()
        .unwrap();
        assert_eq!(fields.reading_time_mins, 12);
    }

    #[test]
    fn apply_keeps_owner_and_views() {
        let owner = Uuid::new_v4();
        let mut post = Post::new(owner, input().normalize().unwrap());
        post.views = 41;
        let created = post.created_at;

        post.apply(
            PostInput {
                title: "Another title".into(),
                status: PostStatus::Published,
                ..input()
            }
            .normalize()
            .unwrap(),
        );

        assert_eq!(post.user_id, owner);
        assert_eq!(post.views, 41);
        assert_eq!(post.created_at, created);
        assert_eq!(post.slug, "another-title");
        assert!(post.is_published());
    }
}
