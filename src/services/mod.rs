pub mod auth_service;
pub mod cms_service;
pub mod order_service;
pub mod product_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use cms_service::CmsService;
pub use order_service::OrderService;
pub use product_service::ProductService;
pub use user_service::UserService;
