pub mod auth;
pub mod health;
pub mod insights;
pub mod subscriptions;

pub use auth::{check_role, list_users, login, signup};
pub use health::health_check;
pub use insights::{ai_categorize, spend_insights};
pub use subscriptions::{
    create_subscription, delete_subscription, list_shared, list_subscriptions, set_visibility,
    update_subscription, upcoming_renewals,
};
