pub mod driver;
pub mod error;
pub mod storage;
pub mod types;

pub use driver::{DriverLauncher, NavigationOptions, PageDriver, WaitUntil};
pub use error::{Error, Result};
pub use storage::ArticleRepository;
pub use types::{slugify, Article, ArticleDraft, Candidate, FieldDefaults, DEFAULT_AUTHOR};
