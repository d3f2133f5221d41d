//! Services the screens call: authentication and the product catalog.
//!
//! Both share one `Gateway`, so every call carries the session token and
//! any 401 expires the session no matter which service made the call.

pub mod auth;
pub mod products;

pub use auth::AuthService;
pub use products::ProductService;
