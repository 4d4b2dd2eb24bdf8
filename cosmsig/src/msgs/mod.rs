//! Built-in transaction messages.
//!
//! - [`bank`] - `MsgSend` and `MsgMultiSend`
//! - [`staking`] - `MsgDelegate`

pub mod bank;
pub mod staking;
