//! # Webling HTTP
//!
//! HTTP transport for the Webling REST API.
//!
//! [`HttpTransport`] implements [`webling_core::Transport`] on top of any
//! [`HttpClient`]. It adds the API key to every request, checks the status
//! each method is expected to return and converts error bodies into
//! [`webling_core::WeblingError`] values.
//!
//! With the default `reqwest` feature, [`manager_for_account`] returns a
//! ready-to-use entity manager:
//!
//! ```no_run
//! # #[cfg(feature = "reqwest")]
//! # fn main() -> webling_core::WeblingResult<()> {
//! let mut manager = webling_http::manager_for_account("demo", "api-key")?;
//! let members = manager.find_all("member", None, &[("Name", "ASC")], false)?;
//! println!("{} members", members.len());
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "reqwest"))]
//! # fn main() {}
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod http;
#[cfg(feature = "reqwest")]
mod reqwest_client;

pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use http::{convert_response, HttpClient, HttpRequest, HttpResponse, HttpTransport};
#[cfg(feature = "reqwest")]
pub use reqwest_client::{connect, manager_for_account, AccountManager, ReqwestClient};
