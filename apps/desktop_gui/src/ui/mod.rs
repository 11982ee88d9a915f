//! UI layer for the signup window: app shell, roster cards, signup form, and banner.

pub mod app;

pub use app::SignupGuiApp;
