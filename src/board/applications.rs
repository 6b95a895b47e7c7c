use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::{fields, JobBoard};
use crate::error::BoardError;
use crate::store::{
    parse_id, Collection, DeleteResult, Document, DocumentStore, Filter, InsertOneResult,
    UpdateResult,
};

impl<S: DocumentStore> JobBoard<S> {
    /// List every application filed against `job_id`.
    pub async fn list_applications_for_job(
        &self,
        job_id: &str,
    ) -> Result<Vec<Document>, BoardError> {
        let filter = Filter::equals(fields::JOB_ID, job_id);
        Ok(self
            .store()
            .find(Collection::JobApplications, &filter)
            .await?)
    }

    /// File an application and bump the referenced job's application count.
    ///
    /// The count is incremented atomically in the store. If the application
    /// has no `job_id`, or the job does not exist, the increment is skipped
    /// and the insert still succeeds. A malformed `job_id` is rejected before
    /// the application is written.
    pub async fn create_application(
        &self,
        application: Document,
    ) -> Result<InsertOneResult, BoardError> {
        let job_id = application
            .get(fields::JOB_ID)
            .and_then(Value::as_str)
            .map(str::to_owned);
        if let Some(job_id) = &job_id {
            parse_id(job_id)?;
        }

        let result = self
            .store()
            .insert_one(Collection::JobApplications, application)
            .await?;

        let Some(job_id) = job_id else {
            debug!(application_id = %result.inserted_id, "Application has no job_id; count not updated");
            return Ok(result);
        };

        let update = self
            .store()
            .increment(Collection::Jobs, &job_id, fields::APPLICATION_COUNT, 1)
            .await?;
        if update.matched_count == 0 {
            debug!(job_id = %job_id, "Referenced job not found; count not updated");
        } else {
            debug!(job_id = %job_id, application_id = %result.inserted_id, "Filed application");
        }

        Ok(result)
    }

    /// Replace the `status` of one application, leaving other fields untouched.
    pub async fn update_application_status(
        &self,
        id: &str,
        status: Value,
    ) -> Result<UpdateResult, BoardError> {
        let mut update = Document::new();
        update.insert(fields::STATUS.to_string(), status);

        Ok(self
            .store()
            .set_fields(Collection::JobApplications, id, update)
            .await?)
    }

    /// List the applications filed by `applicant_email`, enriched with the
    /// title, company and logo of each referenced job.
    ///
    /// Applications whose job is missing, or that have no `job_id`, are
    /// returned without the display fields. A malformed `job_id` fails the
    /// whole listing.
    pub async fn list_applications_for_applicant(
        &self,
        applicant_email: &str,
    ) -> Result<Vec<Document>, BoardError> {
        let filter = Filter::equals(fields::APPLICANT_EMAIL, applicant_email);
        let mut applications = self
            .store()
            .find(Collection::JobApplications, &filter)
            .await?;

        let mut jobs: HashMap<String, Option<Document>> = HashMap::new();
        for application in &mut applications {
            let Some(job_id) = application.get(fields::JOB_ID).and_then(Value::as_str) else {
                continue;
            };

            if !jobs.contains_key(job_id) {
                let job = self.store().find_by_id(Collection::Jobs, job_id).await?;
                jobs.insert(job_id.to_string(), job);
            }

            if let Some(Some(job)) = jobs.get(job_id) {
                enrich(application, job);
            }
        }

        Ok(applications)
    }

    /// Delete one application. No ownership check is performed.
    pub async fn delete_application(&self, id: &str) -> Result<DeleteResult, BoardError> {
        let result = self
            .store()
            .delete_one(Collection::JobApplications, id)
            .await?;
        if result.deleted_count == 0 {
            debug!(application_id = %id, "Delete matched no application");
        }
        Ok(result)
    }
}

/// Copy the job's display fields onto an application.
fn enrich(application: &mut Document, job: &Document) {
    for field in fields::ENRICHED {
        match job.get(field) {
            Some(value) => {
                application.insert(field.to_string(), value.clone());
            }
            None => {
                application.remove(field);
            }
        }
    }
}
