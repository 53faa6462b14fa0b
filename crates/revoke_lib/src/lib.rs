pub mod allowance;
pub mod analytics;
pub mod config;
pub mod contracts;
pub mod display;
pub mod eth;
pub mod misc;
pub mod notify;
pub mod provider;
pub mod revoke;
pub mod signer;
pub mod web3_provider;

pub use revoke_lib_common::error;
pub use revoke_lib_common::utils;
pub use revoke_lib_common::{err_create, err_custom_create, err_from, err_from_msg};
