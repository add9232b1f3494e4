//! Shared application state handed to every handler.

use std::sync::Arc;

use saasbase_core::Config;
use saasbase_services::{AvatarService, Storage, UserService};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub avatars: AvatarService,
    pub users: UserService,
    /// Needed directly only by the local upload route
    pub storage: Arc<dyn Storage>,
}
