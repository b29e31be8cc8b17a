use std::fmt;

use crate::error::StitchError;
use crate::event::FolderContext;

const ACCEPTED_EXTENSIONS: [&str; 2] = ["mp4", "mov"];
const PROCESSED_MARKER: &str = "output";
const SEED_FOLDERS: [&str; 2] = ["intro.mp4", "outro.mp4"];

/// Why an upload was deliberately left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedExtension(String),
    AlreadyProcessed,
    SeedFile,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedExtension(ext) => write!(f, "skipping non-mp4/non-mov file (.{ext})"),
            SkipReason::AlreadyProcessed => write!(f, "the file is already processed"),
            SkipReason::SeedFile => write!(f, "intro or outro uploaded"),
        }
    }
}

/// Result of checking an upload against the processing rules.
#[derive(Debug)]
pub enum Eligibility {
    Eligible,
    Skip(SkipReason),
    Reject(StitchError),
}

/// Applies the processing rules in order, first match wins.
pub fn check(ctx: &FolderContext) -> Eligibility {
    let extension = ctx.file_extension.to_lowercase();
    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Eligibility::Skip(SkipReason::UnsupportedExtension(ctx.file_extension.clone()));
    }
    if ctx.directory_path.is_empty() {
        return Eligibility::Reject(StitchError::NoDirectory(ctx.file_path.clone()));
    }
    if ctx.file_name.contains(PROCESSED_MARKER) {
        return Eligibility::Skip(SkipReason::AlreadyProcessed);
    }
    let folder = ctx.folder_name.to_lowercase();
    if SEED_FOLDERS.contains(&folder.as_str()) {
        return Eligibility::Skip(SkipReason::SeedFile);
    }

    Eligibility::Eligible
}
