//! Services - the operations exposed to the HTTP layer.
//!
//! Every mutating operation takes the caller's [`Session`](crate::domain::Session)
//! explicitly; there is no ambient session lookup.

mod blog;
mod categories;
mod notifications;
mod posts;
mod search;
mod uploads;
mod users;

pub use blog::{BlogService, PostListing};
pub use categories::CategoryService;
pub use notifications::NotificationService;
pub use posts::{DashboardStats, PostService, PostStat, RECENT_POSTS_LIMIT};
pub use search::SearchService;
pub use uploads::UploadService;
pub use users::UserService;

use crate::domain::{Post, PostEntry};
use crate::error::DomainError;
use crate::ports::{CategoryRepository, UserRepository};

/// Join a post with its author and category.
async fn load_entry(
    post: Post,
    users: &dyn UserRepository,
    categories: &dyn CategoryRepository,
) -> Result<PostEntry, DomainError> {
    let author = users.find_by_id(post.user_id).await?.map(|u| u.summary());
    let category = match post.category_id {
        Some(id) => categories.find_by_id(id).await?,
        None => None,
    };

    Ok(PostEntry {
        post,
        author,
        category,
    })
}
