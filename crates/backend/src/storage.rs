//! Object storage for product images.

use reqwest::Method;
use tracing::{info, instrument};
use url::Url;

use crate::client::SupabaseClient;
use crate::error::BackendError;

impl SupabaseClient {
    /// Public URL of an object in a public bucket.
    ///
    /// # Errors
    ///
    /// Returns error if the bucket or object name do not form a valid URL.
    pub fn public_object_url(&self, bucket: &str, object_name: &str) -> Result<Url, BackendError> {
        self.endpoint(&format!("storage/v1/object/public/{bucket}/{object_name}"), &[])
    }

    /// Upload `bytes` to `bucket/object_name` and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns error if the upload is rejected.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_object(
        &self,
        bucket: &str,
        object_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Url, BackendError> {
        let url = self.endpoint(&format!("storage/v1/object/{bucket}/{object_name}"), &[])?;
        let request = self
            .request(Method::POST, url)
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(bytes);
        self.send(request).await?;

        let public_url = self.public_object_url(bucket, object_name)?;
        info!(url = %public_url, "Image uploaded");
        Ok(public_url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::client::tests::client;

    #[test]
    fn test_public_object_url() {
        let client = client("https://abcd.supabase.co");
        let url = client
            .public_object_url("product-images", "0b6a8f0e.png")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://abcd.supabase.co/storage/v1/object/public/product-images/0b6a8f0e.png"
        );
    }
}
