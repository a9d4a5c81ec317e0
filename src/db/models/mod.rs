mod booking;
mod client;
mod common;
mod container;
mod payment;
mod user;
mod warehouse;

pub use booking::*;
pub use client::*;
pub use common::*;
pub use container::*;
pub use payment::*;
pub use user::*;
pub use warehouse::*;
