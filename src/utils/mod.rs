pub mod code_generator;
pub mod jwt;
pub mod password;
pub mod tracking;

pub use code_generator::generate_six_digit_code;
pub use jwt::{Claims, JwtService};
pub use password::{hash_password, verify_password};
pub use tracking::generate_tracking_number;
