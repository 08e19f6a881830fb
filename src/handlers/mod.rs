pub mod auth;
pub mod cms;
pub mod order;
pub mod product;
pub mod user;

pub use auth::auth_config;
pub use cms::cms_config;
pub use order::order_config;
pub use product::product_config;
pub use user::user_config;
