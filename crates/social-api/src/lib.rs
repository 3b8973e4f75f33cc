pub mod admin;
pub mod auth;
pub mod error;
pub mod extract;
pub mod friends;
pub mod messages;
pub mod middleware;
pub mod notifications;
pub mod photos;
pub mod posts;
pub mod rate_limit;
pub mod routes;
pub mod search;
pub mod session;
pub mod settings;
pub mod state;
pub mod upload;
pub mod users;
