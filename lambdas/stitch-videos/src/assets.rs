use lambda_runtime::tracing;

use crate::error::StoreError;
use crate::event::FolderContext;
use crate::storage::ObjectStore;

/// Optional sibling files that decorate a job when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    Intro,
    Outro,
    Watermark,
}

impl Asset {
    fn base_name(self) -> &'static str {
        match self {
            Asset::Intro => "intro",
            Asset::Outro => "outro",
            Asset::Watermark => "watermark",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Asset::Intro | Asset::Outro => "mp4",
            Asset::Watermark => "png",
        }
    }

    /// File names to try, in order: lowercase extension first.
    pub fn candidates(self) -> [String; 2] {
        let ext = self.extension();
        [
            format!("{}.{}", self.base_name(), ext),
            format!("{}.{}", self.base_name(), ext.to_uppercase()),
        ]
    }
}

/// Resolved keys of the optional assets found next to an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetAvailability {
    pub intro: Option<String>,
    pub outro: Option<String>,
    pub watermark: Option<String>,
}

/// Looks for one asset, returning the key of the first existing variant.
/// Lookup errors never escape: they count as "absent".
pub async fn probe<S: ObjectStore>(store: &S, bucket: &str, ctx: &FolderContext, asset: Asset) -> Option<String> {
    for name in asset.candidates() {
        let key = ctx.sibling(&name);
        match store.exists(bucket, &key).await {
            Ok(()) => {
                tracing::info!(bucket = %bucket, key = %key, asset = ?asset, "optional asset found");
                return Some(key);
            }
            Err(StoreError::NotFound { .. }) => {
                tracing::debug!(bucket = %bucket, key = %key, "{} not available", key);
            }
            Err(e) => {
                // Not a 404; we still can't use it, but say so.
                tracing::warn!(bucket = %bucket, key = %key, error = %e, "lookup failed, treating asset as absent");
            }
        }
    }
    None
}

/// Probes intro, outro and watermark concurrently.
pub async fn discover<S: ObjectStore>(store: &S, bucket: &str, ctx: &FolderContext) -> AssetAvailability {
    let (intro, outro, watermark) = tokio::join!(
        probe(store, bucket, ctx, Asset::Intro),
        probe(store, bucket, ctx, Asset::Outro),
        probe(store, bucket, ctx, Asset::Watermark),
    );

    AssetAvailability { intro, outro, watermark }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    fn ctx() -> FolderContext {
        FolderContext::from_encoded_key("videos/projectA/clip.mp4").unwrap()
    }

    #[test]
    fn candidates_try_lowercase_first() {
        assert_eq!(Asset::Intro.candidates(), ["intro.mp4".to_string(), "intro.MP4".to_string()]);
        assert_eq!(
            Asset::Watermark.candidates(),
            ["watermark.png".to_string(), "watermark.PNG".to_string()]
        );
    }

    #[tokio::test]
    async fn nothing_present() {
        let store = MemoryStore::default();
        assert_eq!(discover(&store, "uploads", &ctx()).await, AssetAvailability::default());
    }

    #[tokio::test]
    async fn resolves_uppercase_variant() {
        let store = MemoryStore::default()
            .with("uploads", "videos/projectA/intro.MP4")
            .with("uploads", "videos/projectA/watermark.PNG");

        let found = discover(&store, "uploads", &ctx()).await;

        assert_eq!(found.intro.as_deref(), Some("videos/projectA/intro.MP4"));
        assert_eq!(found.outro, None);
        assert_eq!(found.watermark.as_deref(), Some("videos/projectA/watermark.PNG"));
    }

    #[tokio::test]
    async fn lowercase_wins_when_both_exist() {
        let store = MemoryStore::default()
            .with("uploads", "videos/projectA/outro.mp4")
            .with("uploads", "videos/projectA/outro.MP4");

        let found = probe(&store, "uploads", &ctx(), Asset::Outro).await;
        assert_eq!(found.as_deref(), Some("videos/projectA/outro.mp4"));
    }

    #[tokio::test]
    async fn ignores_assets_in_other_buckets_and_folders() {
        let store = MemoryStore::default()
            .with("other", "videos/projectA/intro.mp4")
            .with("uploads", "videos/projectB/intro.mp4");

        assert_eq!(probe(&store, "uploads", &ctx(), Asset::Intro).await, None);
    }

    #[tokio::test]
    async fn access_error_falls_through_to_next_variant() {
        let store = MemoryStore::default()
            .deny("uploads", "videos/projectA/intro.mp4")
            .with("uploads", "videos/projectA/intro.MP4");

        let found = probe(&store, "uploads", &ctx(), Asset::Intro).await;
        assert_eq!(found.as_deref(), Some("videos/projectA/intro.MP4"));
    }

    #[tokio::test]
    async fn access_error_on_both_variants_is_absent() {
        let store = MemoryStore::default()
            .deny("uploads", "videos/projectA/watermark.png")
            .deny("uploads", "videos/projectA/watermark.PNG");

        assert_eq!(probe(&store, "uploads", &ctx(), Asset::Watermark).await, None);
    }
}
