//! Data models exchanged with the catalog backend.
//!
//! - `User`, `AuthResponse` and the login/registration payloads
//! - `Product`, `NewProduct` and `ProductQuery` for the catalog

pub mod product;
pub mod user;

pub use product::{NewProduct, Product, ProductQuery};
pub use user::{AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, User};
