mod category;
mod frequency;
mod money;
mod status;
mod subscription_name;

pub use category::Category;
pub use frequency::Frequency;
pub use money::{max_price, round_cents, saturating_total};
pub use status::SubscriptionStatus;
pub use subscription_name::SubscriptionName;
