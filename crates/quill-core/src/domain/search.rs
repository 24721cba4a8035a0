use serde::Serialize;
use uuid::Uuid;

use super::{Category, Post};

/// Queries shorter than this (after trimming) never reach the store.
pub const MIN_QUERY_LEN: usize = 2;

/// Maximum rows fetched per result kind.
pub const SEARCH_LIMIT: u64 = 10;

/// One search result, tagged by kind, with a ready-to-use link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchHit {
    Post {
        id: Uuid,
        title: String,
        url: String,
        image_url: String,
    },
    Category {
        id: Uuid,
        name: String,
        url: String,
    },
}

impl From<Post> for SearchHit {
    fn from(post: Post) -> Self {
        SearchHit::Post {
            url: post.url(),
            id: post.id,
            title: post.title,
            image_url: post.image_url,
        }
    }
}

impl From<Category> for SearchHit {
    fn from(category: Category) -> Self {
        SearchHit::Category {
            url: category.url(),
            id: category.id,
            name: category.name,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub results: Vec<SearchHit>,
}
