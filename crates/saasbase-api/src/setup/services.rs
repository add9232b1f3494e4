use crate::state::AppState;
use saasbase_core::Config;
use saasbase_services::{
    AvatarService, IdentityProvider, ImageTransformer, MediaService, Repositories, Storage,
    UserService,
};
use std::sync::Arc;
use std::time::Duration;

/// Wire services over the chosen backends.
pub fn initialize_services(
    config: &Config,
    repositories: Repositories,
    storage: Arc<dyn Storage>,
    identity: Arc<dyn IdentityProvider>,
) -> Arc<AppState> {
    let media = Arc::new(MediaService::new(
        repositories.media,
        storage.clone(),
        Arc::new(ImageTransformer),
        Duration::from_secs(config.upload_url_expiry_secs()),
    ));

    Arc::new(AppState {
        config: config.clone(),
        avatars: AvatarService::new(media),
        users: UserService::new(repositories.users, identity),
        storage,
    })
}
