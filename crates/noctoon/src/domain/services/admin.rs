use thiserror::Error;

use crate::{
    domain::{
        entities::{stats::Stats, upload::UploadSignature},
        repositories::stats::{StatsRepository, StatsRepositoryError},
    },
    infrastructure::{config::UploadConfig, utils},
};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("upload signing is not configured")]
    UploadNotConfigured,
    #[error("repository error: {0}")]
    RepositoryError(#[from] StatsRepositoryError),
}

#[derive(Clone)]
pub struct AdminService<R>
where
    R: StatsRepository,
{
    repo: R,
    upload: Option<UploadConfig>,
}

impl<R> AdminService<R>
where
    R: StatsRepository,
{
    pub fn new(repo: R, upload: Option<UploadConfig>) -> Self {
        Self { repo, upload }
    }

    pub async fn fetch_stats(&self) -> Result<Stats, AdminError> {
        Ok(self.repo.get_stats().await?)
    }

    pub fn sign_upload(&self) -> Result<UploadSignature, AdminError> {
        let upload = self.upload.as_ref().ok_or(AdminError::UploadNotConfigured)?;

        Ok(utils::sign_upload(upload, chrono::Utc::now().timestamp()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::infrastructure::{database, repositories::stats::StatsRepositoryImpl};

    #[tokio::test]
    async fn test_sign_upload_requires_config() {
        let pool = database::establish_memory_connection().await.unwrap();

        let svc = AdminService::new(StatsRepositoryImpl::new(pool.clone()), None);
        assert!(matches!(svc.sign_upload(), Err(AdminError::UploadNotConfigured)));

        let svc = AdminService::new(
            StatsRepositoryImpl::new(pool),
            Some(UploadConfig {
                cloud_name: "demo".to_string(),
                api_key: "1234".to_string(),
                api_secret: "abcd".to_string(),
                folder: "noctoon".to_string(),
            }),
        );
        let signature = svc.sign_upload().unwrap();
        assert_eq!(signature.folder, "noctoon");
        assert_eq!(signature.signature.len(), 40);
        assert!(signature.timestamp > 0);
    }
}
