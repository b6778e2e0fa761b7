//! Value generators used by [`crate::ShopGenerator`].
//!
//! Every function takes the caller's RNG so a single seeded source drives the
//! whole run.

pub mod names;
pub mod numeric;

pub use names::{generate_email, generate_item_name, generate_user_name};
pub use numeric::{generate_int_range, generate_price};
