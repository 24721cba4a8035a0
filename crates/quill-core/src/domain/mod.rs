//! Domain entities - the core business objects.

mod category;
mod post;
mod search;
mod session;
mod upload;
mod user;

pub use category::{CATEGORY_NAME_MAX_LEN, Category, CategoryWithOwner};
pub use post::{
    AuthorSummary, Post, PostDetail, PostEntry, PostFields, PostFilter, PostInput, PostStatus,
    RelatedPost, estimate_reading_time,
};
pub use search::{MIN_QUERY_LEN, SEARCH_LIMIT, SearchHit, SearchResults};
pub use session::{Role, Session};
pub use upload::{NewUpload, Upload, UploadKind};
pub use user::User;
