//! Database repository layer for Vibelist
//!
//! Repositories own the SQL; [`RecommendationStore`] is the seam the
//! pipeline and routes depend on, so they never touch a pool directly.

pub mod playlist;
pub mod prompt;
pub mod store;
pub mod user;
pub mod utils;

pub use playlist::PlaylistRepository;
pub use prompt::PromptRepository;
pub use store::{PgRecommendationStore, RecommendationStore, StoreError, StoreResult};
pub use user::UserRepository;
