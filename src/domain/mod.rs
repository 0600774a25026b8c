pub mod post;
pub mod time_of_day;
pub mod time_record;
pub mod user;
