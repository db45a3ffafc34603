//! Data Transfer Objects for REST response serialization.

pub mod room_dto;

pub use room_dto::*;
