use tracing::debug;

use super::{fields, JobBoard};
use crate::error::BoardError;
use crate::store::{Collection, Document, DocumentStore, Filter, InsertOneResult};

impl<S: DocumentStore> JobBoard<S> {
    /// List jobs, optionally only those posted by `hr_email`.
    ///
    /// An empty filter string is treated the same as no filter.
    pub async fn list_jobs(&self, hr_email: Option<&str>) -> Result<Vec<Document>, BoardError> {
        let filter = match hr_email {
            Some(email) if !email.is_empty() => Filter::equals(fields::HR_EMAIL, email),
            _ => Filter::All,
        };

        let jobs = self.store().find(Collection::Jobs, &filter).await?;
        debug!(count = jobs.len(), hr_email = ?hr_email, "Listed jobs");
        Ok(jobs)
    }

    /// Fetch a single job. A well-formed id with no match yields `None`.
    pub async fn get_job(&self, id: &str) -> Result<Option<Document>, BoardError> {
        Ok(self.store().find_by_id(Collection::Jobs, id).await?)
    }

    /// Insert a job posting as given.
    pub async fn create_job(&self, job: Document) -> Result<InsertOneResult, BoardError> {
        let result = self.store().insert_one(Collection::Jobs, job).await?;
        debug!(job_id = %result.inserted_id, "Created job");
        Ok(result)
    }
}
