use std::future::Future;

use aws_sdk_elastictranscoder::types::{CreateJobOutput, JobInput, JobWatermark};
use aws_sdk_elastictranscoder::Client;

use crate::error::SubmitError;
use crate::job::{InputSpec, JobRequest, OutputSpec};

/// Something that accepts transcoding jobs and hands back a job id.
pub trait JobSubmitter: Send + Sync {
    fn submit(&self, job: &JobRequest) -> impl Future<Output = Result<String, SubmitError>> + Send;
}

pub struct ElasticTranscoder {
    client: Client,
}

impl ElasticTranscoder {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn job_input(input: &InputSpec) -> JobInput {
    JobInput::builder()
        .key(&input.key)
        .frame_rate(&input.frame_rate)
        .resolution(&input.resolution)
        .aspect_ratio(&input.aspect_ratio)
        .interlaced(&input.interlaced)
        .container(&input.container)
        .build()
}

fn job_output(output: &OutputSpec) -> CreateJobOutput {
    let watermarks = output
        .watermarks
        .iter()
        .map(|w| {
            JobWatermark::builder()
                .input_key(&w.input_key)
                .preset_watermark_id(&w.preset_watermark_id)
                .build()
        })
        .collect::<Vec<_>>();

    CreateJobOutput::builder()
        .key(&output.key)
        .preset_id(&output.preset_id)
        .set_thumbnail_pattern(output.thumbnail_pattern.clone())
        .set_watermarks((!watermarks.is_empty()).then_some(watermarks))
        .build()
}

impl JobSubmitter for ElasticTranscoder {
    async fn submit(&self, job: &JobRequest) -> Result<String, SubmitError> {
        let response = self
            .client
            .create_job()
            .pipeline_id(&job.pipeline_id)
            .set_inputs(Some(job.inputs.iter().map(job_input).collect()))
            .set_outputs(Some(job.outputs.iter().map(job_output).collect()))
            .user_metadata("date", &job.metadata.date)
            .user_metadata("copyright", &job.metadata.copyright)
            .send()
            .await
            .map_err(|e| SubmitError::Service(format!("{:?}", e)))?;

        response
            .job()
            .and_then(|j| j.id())
            .map(str::to_string)
            .ok_or(SubmitError::MissingJobId)
    }
}

#[cfg(test)]
pub mod recording {
    use std::sync::Mutex;

    use super::*;

    /// Keeps every submitted job; answers with a fixed id or a failure.
    #[derive(Default)]
    pub struct RecordingSubmitter {
        pub jobs: Mutex<Vec<JobRequest>>,
        pub fail: bool,
    }

    impl RecordingSubmitter {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn submitted(&self) -> Vec<JobRequest> {
            self.jobs.lock().unwrap().clone()
        }
    }

    impl JobSubmitter for RecordingSubmitter {
        async fn submit(&self, job: &JobRequest) -> Result<String, SubmitError> {
            self.jobs.lock().unwrap().push(job.clone());
            if self.fail {
                Err(SubmitError::Service("ValidationException: pipeline not found".to_string()))
            } else {
                Ok(format!("job-{}", self.jobs.lock().unwrap().len()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::WatermarkSpec;

    #[test]
    fn maps_input_detection_flags() {
        let input = job_input(&InputSpec::auto("videos/projectA/clip.mp4"));

        assert_eq!(input.key(), Some("videos/projectA/clip.mp4"));
        assert_eq!(input.frame_rate(), Some("auto"));
        assert_eq!(input.container(), Some("auto"));
    }

    #[test]
    fn maps_output_with_watermark() {
        let output = job_output(&OutputSpec {
            key: "videos/projectA/clip.mp4.output.720p.mp4".to_string(),
            thumbnail_pattern: None,
            preset_id: "1351620000001-000010".to_string(),
            watermarks: vec![WatermarkSpec {
                input_key: "videos/projectA/watermark.png".to_string(),
                preset_watermark_id: "BottomRight".to_string(),
            }],
        });

        assert_eq!(output.thumbnail_pattern(), None);
        assert_eq!(output.watermarks().len(), 1);
        assert_eq!(output.watermarks()[0].preset_watermark_id(), Some("BottomRight"));
    }

    #[test]
    fn output_without_watermark_sends_none() {
        let output = job_output(&OutputSpec {
            key: "k".to_string(),
            thumbnail_pattern: Some("k-{count}".to_string()),
            preset_id: "p".to_string(),
            watermarks: vec![],
        });

        assert!(output.watermarks().is_empty());
        assert_eq!(output.thumbnail_pattern(), Some("k-{count}"));
    }
}
