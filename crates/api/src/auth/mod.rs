pub mod github;
pub mod jwt;
pub mod state_cookie;
