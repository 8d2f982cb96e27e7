//! Session boundary: fetches the signed-in user's profile from the backend
//! and turns the outcome into home view state.

pub mod client;
pub mod home;

pub use client::{SessionError, UserClient};
pub use home::{HomeView, ProfileCard};
