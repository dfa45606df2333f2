pub mod profile;
pub mod quota;
pub mod relationship;
pub mod view;

pub use profile::{validate_user_id, ProfileRecord};
pub use quota::QuotaRecord;
pub use relationship::{
    EffectiveRelationship, EffectiveStatus, RelationshipAction, RelationshipEvent,
    RelationshipStatus,
};
pub use view::ViewRecord;
