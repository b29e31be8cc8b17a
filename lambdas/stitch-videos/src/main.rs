use std::sync::Arc;

use aws_config::{meta::region::RegionProviderChain, BehaviorVersion, Region};
use lambda_runtime::{run, service_fn, tracing, Error, LambdaEvent};

use crate::event::UploadNotification;
use crate::handler::AppContext;
use crate::storage::S3ObjectStore;
use crate::transcoder::ElasticTranscoder;

mod assets;
mod config;
mod error;
mod event;
mod filter;
mod handler;
mod job;
mod storage;
mod transcoder;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = config::load_config()?;
    let template = config.job_template()?;

    // Configure the AWS SDK
    let region_provider = RegionProviderChain::default_provider().or_else(Region::new("eu-west-1"));
    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await;

    let s3_client = aws_sdk_s3::Client::new(&aws_config);
    let transcoder_config = aws_sdk_elastictranscoder::config::Builder::from(&aws_config)
        .region(Region::new(config.transcoder_region.clone()))
        .build();
    let transcoder_client = aws_sdk_elastictranscoder::Client::from_conf(transcoder_config);

    tracing::info!(
        pipeline_id = %template.pipeline_id,
        transcoder_region = %config.transcoder_region,
        presets = template.presets.len(),
        "stitch-videos ready"
    );

    let context = Arc::new(AppContext {
        store: S3ObjectStore::new(s3_client),
        transcoder: ElasticTranscoder::new(transcoder_client),
        template,
    });

    run(service_fn(|event: LambdaEvent<UploadNotification>| {
        let context = context.clone();
        async move { context.function_handler(event).await }
    }))
    .await
}
