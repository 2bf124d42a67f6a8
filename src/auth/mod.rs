pub mod credentials;
pub mod gate;
pub mod model;
pub mod password;
pub mod token;

pub use gate::AuthUser;
pub use token::{Claims, TokenService};
