pub mod subscription;
pub mod user;

pub use subscription::{BillingCycle, Subscription, SubscriptionForm, Visibility};
pub use user::{Credentials, Role, User};
