use serde::{Deserialize, Serialize};

use crate::error::StitchError;

// --- S3 NOTIFICATION START ---
// Only the fields we read are modelled, the rest of the payload is ignored.
#[derive(Debug, Deserialize, Serialize)]
pub struct UploadNotification {
    #[serde(rename = "Records", default)]
    pub records: Vec<UploadRecord>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UploadRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct S3Bucket {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct S3Object {
    pub key: Option<String>,
}
// --- S3 NOTIFICATION END ---

/// One uploaded object, as named in the notification (key still encoded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEvent {
    pub bucket_name: String,
    pub object_key: String,
}

impl TryFrom<&UploadRecord> for UploadEvent {
    type Error = StitchError;

    fn try_from(record: &UploadRecord) -> Result<Self, Self::Error> {
        match (&record.s3.bucket.name, &record.s3.object.key) {
            (Some(bucket), Some(key)) if !bucket.is_empty() && !key.is_empty() => Ok(Self {
                bucket_name: bucket.clone(),
                object_key: key.clone(),
            }),
            _ => Err(StitchError::IncompleteRecord),
        }
    }
}

/// Naming derived from the decoded object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderContext {
    /// Full decoded key of the uploaded object.
    pub file_path: String,
    /// Everything before the last `/`, empty for keys at the bucket root.
    pub directory_path: String,
    /// Last segment of `directory_path`.
    pub folder_name: String,
    /// Last segment of `file_path`.
    pub file_name: String,
    /// Text after the final `.` of `file_path`, as uploaded (no case folding).
    pub file_extension: String,
}

impl FolderContext {
    /// Decodes an S3 notification key (`+` for space, then percent-encoding)
    /// and splits it into its naming parts.
    pub fn from_encoded_key(raw_key: &str) -> Result<Self, StitchError> {
        let spaced = raw_key.replace('+', " ");
        if has_bad_escape(&spaced) {
            return Err(StitchError::MalformedKey(raw_key.to_string()));
        }
        let file_path = urlencoding::decode(&spaced)
            .map_err(|_| StitchError::MalformedKey(raw_key.to_string()))?
            .into_owned();

        let file_extension = match file_path.rfind('.') {
            Some(idx) => file_path[idx + 1..].to_string(),
            None => return Err(StitchError::MalformedKey(file_path)),
        };

        let (directory_path, file_name) = match file_path.rsplit_once('/') {
            Some((dir, name)) => (dir.to_string(), name.to_string()),
            None => (String::new(), file_path.clone()),
        };
        let folder_name = directory_path
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            file_path,
            directory_path,
            folder_name,
            file_name,
            file_extension,
        })
    }

    /// Key of a sibling object in the same folder.
    pub fn sibling(&self, file_name: &str) -> String {
        format!("{}/{}", self.directory_path, file_name)
    }
}

/// `%` not followed by two hex digits.
fn has_bad_escape(key: &str) -> bool {
    let bytes = key.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}
