pub mod cms;
pub mod common;
pub mod order;
pub mod product;
pub mod user;

pub use cms::*;
pub use common::*;
pub use order::*;
pub use product::*;
pub use user::*;
