//! Site search over published posts and categories.

use std::sync::Arc;

use crate::domain::{MIN_QUERY_LEN, SEARCH_LIMIT, SearchHit, SearchResults};
use crate::error::DomainError;
use crate::ports::SearchRepository;

pub struct SearchService {
    repo: Arc<dyn SearchRepository>,
}

impl SearchService {
    pub fn new(repo: Arc<dyn SearchRepository>) -> Self {
        Self { repo }
    }

    /// Substring search; posts come first, each kind newest first.
    ///
    /// Queries shorter than [`MIN_QUERY_LEN`] characters return nothing
    /// without touching the store.
    pub async fn search(&self, query: &str) -> Result<SearchResults, DomainError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Ok(SearchResults::default());
        }

        let (posts, categories) = futures::try_join!(
            self.repo.search_posts(query, SEARCH_LIMIT),
            self.repo.search_categories(query, SEARCH_LIMIT),
        )?;

        tracing::debug!(
            query,
            posts = posts.len(),
            categories = categories.len(),
            "Search completed"
        );

        let results = posts
            .into_iter()
            .map(SearchHit::from)
            .chain(categories.into_iter().map(SearchHit::from))
            .collect();

        Ok(SearchResults { results })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{Category, Post, PostStatus};
    use crate::error::RepoError;

    /// Records every query it receives.
    #[derive(Default)]
    struct RecordingSearch {
        queries: Mutex<Vec<String>>,
        posts: Vec<Post>,
        categories: Vec<Category>,
    }

    #[async_trait]
    impl SearchRepository for RecordingSearch {
        async fn search_posts(&self, query: &str, limit: u64) -> Result<Vec<Post>, RepoError> {
            assert_eq!(limit, SEARCH_LIMIT);
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.posts.clone())
        }

        async fn search_categories(
            &self,
            query: &str,
            limit: u64,
        ) -> Result<Vec<Category>, RepoError> {
            assert_eq!(limit, SEARCH_LIMIT);
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.categories.clone())
        }
    }

    fn post(title: &str, slug: &str) -> Post {
        let now = Utc::now();
        Post {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category_id: None,
            title: title.into(),
            slug: slug.into(),
            description: "desc".into(),
            content: "content".into(),
            image_url: "https://cdn.example.com/p.png".into(),
            tags: vec![],
            status: PostStatus::Published,
            views: 0,
            reading_time_mins: 1,
            featured: false,
            repo_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn short_queries_skip_the_store() {
        let repo = Arc::new(RecordingSearch::default());
        let service = SearchService::new(repo.clone());

        for query in ["", "a", "  a  ", "é"] {
            let results = service.search(query).await.unwrap();
            assert!(results.results.is_empty());
        }
        assert!(repo.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn two_characters_reach_the_store_trimmed() {
        let repo = Arc::new(RecordingSearch::default());
        let service = SearchService::new(repo.clone());

        service.search(" ab ").await.unwrap();

        let queries = repo.queries.lock().unwrap();
        assert_eq!(queries.len(), 2);
        assert!(queries.iter().all(|q| q == "ab"));
    }

    #[tokio::test]
    async fn merges_posts_before_categories_with_urls() {
        let category = Category::new(Uuid::new_v4(), "Rustaceans").unwrap();
        let repo = Arc::new(RecordingSearch {
            posts: vec![post("Rust tips", "rust-tips")],
            categories: vec![category.clone()],
            ..Default::default()
        });
        let service = SearchService::new(repo);

        let results = service.search("rust").await.unwrap().results;

        assert_eq!(results.len(), 2);
        match &results[0] {
            SearchHit::Post { url, title, .. } => {
                assert_eq!(url, "/blog/posts/rust-tips");
                assert_eq!(title, "Rust tips");
            }
            other => panic!("expected a post first, got {other:?}"),
        }
        assert_eq!(
            results[1],
            SearchHit::Category {
                id: category.id,
                name: "Rustaceans".into(),
                url: format!("/blog/category/{}", category.id),
            }
        );
    }

    #[test]
    fn hits_serialize_with_a_type_tag() {
        let hit = SearchHit::from(post("Tagged", "tagged"));
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["type"], "post");
        assert_eq!(json["url"], "/blog/posts/tagged");
    }
}
