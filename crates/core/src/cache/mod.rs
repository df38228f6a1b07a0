mod error;
mod invalidation;
mod keys;
mod notification;
mod patterns;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use invalidation::{invalidation_scope, InvalidationScope, ResourceType};
pub use keys::{cache_key, canonical_params, endpoints, CHANGE_SLOT_FILE};
pub use notification::{ChangeNotification, SeenIds};
pub use patterns::{key_matches, matching_keys};
pub use serialization::{
    deserialize_notification, deserialize_payload, serialize_notification, serialize_payload,
    SerializationError,
};
pub use traits::{Cache, ChangePubSub, ChangeSlot};
