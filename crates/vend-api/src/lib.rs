//! Vend REST client
//!
//! `VendRequest` is the HTTP transport: one reqwest client per store session
//! with Basic or Bearer credentials and a cookie store. It implements
//! [`vend_auth::HttpClient`] so the authentication gateway can use it for the
//! token exchange. `VendApi` layers product CRUD on top.

pub mod api;
pub mod error;
pub mod product;
pub mod request;

pub use api::VendApi;
pub use error::{Error, Result};
pub use product::Product;
pub use request::{Credentials, VendRequest, VendRequestBuilder};
