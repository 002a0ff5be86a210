//! Configuration section definitions.
//!
//! Each module corresponds to a section in `dpix.toml`:
//!
//! | Module     | TOML Section    | Purpose                              |
//! |------------|-----------------|--------------------------------------|
//! | `policy`   | `[policy]`      | Resolution behavior switches         |
//! | `bundles`  | `[bundles]`     | Bundle schemes and root directories  |
//!
//! `[[overrides]]` entries deserialize straight into
//! [`OverrideRoot`](crate::resolve::OverrideRoot).

mod bundles;
mod policy;

pub use bundles::BundlesConfig;
pub use policy::Policy;
