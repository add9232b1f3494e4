pub mod avatar;
pub mod health;
pub mod local_media;
pub mod user;
