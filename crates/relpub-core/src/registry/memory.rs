//! In-memory registry for pipeline tests.

use std::sync::Mutex;

use async_trait::async_trait;
use relpub_schema::{Release, ReleaseDescriptor, UploadTarget};
use tokio::io::AsyncReadExt;

use super::{Registry, RegistryError, UploadBody};

#[derive(Debug, Default)]
pub(crate) struct MemoryRegistry {
    pub(crate) registered: Mutex<Vec<ReleaseDescriptor>>,
    pub(crate) uploaded: Mutex<Vec<(UploadTarget, Vec<u8>)>>,
    pub(crate) reject_upsert: bool,
    pub(crate) reject_upload: bool,
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn upsert_release(
        &self,
        descriptor: &ReleaseDescriptor,
    ) -> Result<Release, RegistryError> {
        if self.reject_upsert {
            return Err(RegistryError::Api {
                code: "VERSION_TAKEN".to_string(),
                title: "Unprocessable resource".to_string(),
                detail: "version already exists".to_string(),
            });
        }

        let mut registered = self.registered.lock().unwrap();
        registered.push(descriptor.clone());
        let id = format!("rel-{}", registered.len());

        Ok(Release {
            upload_target: UploadTarget::new(format!("memory://{id}")),
            id,
        })
    }

    async fn upload(
        &self,
        target: &UploadTarget,
        mut body: UploadBody,
        content_length: u64,
    ) -> Result<(), RegistryError> {
        let mut bytes = Vec::new();
        body.read_to_end(&mut bytes).await?;

        if self.reject_upload {
            return Err(RegistryError::Transfer { status: 403 });
        }
        assert_eq!(bytes.len() as u64, content_length);

        self.uploaded.lock().unwrap().push((target.clone(), bytes));
        Ok(())
    }
}
