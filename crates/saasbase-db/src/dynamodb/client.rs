use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::Client;
use saasbase_core::Config;

/// Build a DynamoDB client from the service configuration.
///
/// `DYNAMO_DB_ENDPOINT` points the client at DynamoDB Local or LocalStack;
/// explicit `AWS_ACCESS_ID`/`AWS_ACCESS_SECRET` override the default
/// credential chain.
pub async fn build_client(config: &Config) -> Client {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region().to_string()))
        .load()
        .await;

    let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);

    if let Some(endpoint) = config.dynamo_db_endpoint() {
        builder = builder.endpoint_url(endpoint);
    }

    if let (Some(id), Some(secret)) = (config.aws_access_key_id(), config.aws_secret_access_key()) {
        builder = builder.credentials_provider(Credentials::new(
            id,
            secret,
            None,
            None,
            "saasbase-config",
        ));
    }

    tracing::info!(
        region = %config.aws_region(),
        endpoint = ?config.dynamo_db_endpoint(),
        "DynamoDB client configured"
    );

    Client::from_conf(builder.build())
}
