pub mod candidates;
pub mod health;
pub mod profiles;
pub mod quota;
pub mod relationships;
pub mod validation;
pub mod views;

pub use candidates::select_candidates;
pub use health::health_check;
pub use profiles::upsert_profile;
pub use quota::{comment_created, post_created, quota_status};
pub use relationships::{act_on_candidate, relationship_status};
pub use views::record_view;
