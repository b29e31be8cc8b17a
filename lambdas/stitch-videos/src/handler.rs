use chrono::{DateTime, Utc};
use lambda_runtime::{tracing, Error, LambdaEvent};

use crate::assets;
use crate::error::StitchError;
use crate::event::{FolderContext, UploadEvent, UploadNotification, UploadRecord};
use crate::filter::{self, Eligibility, SkipReason};
use crate::job::JobTemplate;
use crate::storage::ObjectStore;
use crate::transcoder::JobSubmitter;

/// What happened to one upload record.
#[derive(Debug)]
pub enum Outcome {
    Skipped(SkipReason),
    Submitted(String),
    Failed(StitchError),
}

/// Collaborators shared by every invocation.
pub struct AppContext<S, T> {
    pub store: S,
    pub transcoder: T,
    pub template: JobTemplate,
}

impl<S: ObjectStore, T: JobSubmitter> AppContext<S, T> {
    /// Turns one upload into at most one transcoding job.
    pub async fn process_upload(&self, event: &UploadEvent, now: DateTime<Utc>) -> Outcome {
        let ctx = match FolderContext::from_encoded_key(&event.object_key) {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::error!(bucket = %event.bucket_name, key = %event.object_key, "{}", e);
                return Outcome::Failed(e);
            }
        };
        tracing::debug!(
            bucket = %event.bucket_name,
            file_path = %ctx.file_path,
            dir = %ctx.directory_path,
            folder = %ctx.folder_name,
            pipeline_id = %self.template.pipeline_id,
            "derived transcoder options"
        );

        match filter::check(&ctx) {
            Eligibility::Eligible => {}
            Eligibility::Skip(reason) => {
                tracing::info!(key = %ctx.file_path, "{}, skipping", reason);
                return Outcome::Skipped(reason);
            }
            Eligibility::Reject(e) => {
                tracing::error!(key = %ctx.file_path, "{}", e);
                return Outcome::Failed(e);
            }
        }

        let found = assets::discover(&self.store, &event.bucket_name, &ctx).await;
        let job = self.template.build(&ctx, &found, now);
        match serde_json::to_string(&job) {
            Ok(json) => tracing::info!(key = %ctx.file_path, "job configuration: {}", json),
            Err(e) => tracing::warn!(key = %ctx.file_path, "could not render job configuration: {}", e),
        }

        match self.transcoder.submit(&job).await {
            Ok(job_id) => {
                tracing::info!(key = %ctx.file_path, job_id = %job_id, "transcoding job submitted");
                Outcome::Submitted(job_id)
            }
            Err(e) => {
                tracing::error!(key = %ctx.file_path, error = ?e, "something went wrong submitting the job");
                Outcome::Failed(e.into())
            }
        }
    }

    async fn process_record(&self, record: &UploadRecord) -> Outcome {
        match UploadEvent::try_from(record) {
            Ok(event) => self.process_upload(&event, Utc::now()).await,
            Err(e) => {
                tracing::error!("{}", e);
                Outcome::Failed(e)
            }
        }
    }

    /// Lambda entry point. Never fails: every problem is logged per record.
    pub async fn function_handler(&self, event: LambdaEvent<UploadNotification>) -> Result<(), Error> {
        let records = event.payload.records;
        if records.is_empty() {
            tracing::warn!(request_id = %event.context.request_id, "notification carried no records");
            return Ok(());
        }

        let mut job_ids = Vec::new();
        let (mut skipped, mut failed) = (0, 0);
        for record in &records {
            match self.process_record(record).await {
                Outcome::Submitted(job_id) => job_ids.push(job_id),
                Outcome::Skipped(_) => skipped += 1,
                Outcome::Failed(_) => failed += 1,
            }
        }
        tracing::info!(?job_ids, skipped, failed, "finished processing upload records");

        Ok(())
    }
}
