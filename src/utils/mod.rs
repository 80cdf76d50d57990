//! Utility functions shared throughout dxi.
//!
//! ## Modules
//!
//! - [`escape`] - Search-key escaping (`_` becomes `_5f`)
//! - [`slug`] - Page-slug escaping (`address__v4_8hpp` is `address_v4.hpp`)
//! - [`entities`] - HTML entities in occurrence labels
//! - [`progress`] - Optional progress bars (behind the `progress` feature)
//!
//! ## Key Functions
//!
//! ```
//! use dxi::utils::{encode_key, decode_key, decode_page};
//!
//! // Escape a symbol name into a lookup key
//! assert_eq!(encode_key("make_address"), "make_5faddress");
//! assert_eq!(decode_key("make_5faddress").unwrap(), "make_address");
//!
//! // Decode a page slug into its human-readable name
//! let page = decode_page("classsal_1_1logger_1_1worker__t.html");
//! assert_eq!(page.name, "sal::logger::worker_t");
//! ```

pub mod entities;
pub mod escape;
pub mod progress;
pub mod slug;

pub use entities::*;
pub use escape::*;
pub use progress::*;
pub use slug::*;
