pub mod auth;
pub mod humanize;
pub mod posts;
pub mod query;
pub mod times;
pub mod users;
