use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::action::ActionDescriptor;
use crate::models::{
    DeployParams, DiskOffering, IsoSummary, ListDiskOfferingsEnvelope, ListIsosEnvelope,
    ListServiceOfferingsEnvelope, ListTemplatesEnvelope, ListVirtualMachinesEnvelope,
    ListZonesEnvelope, QueryAsyncJobResultEnvelope, ServiceOffering, TemplateFilter,
    TemplateSummary, VirtualMachine, Zone,
};
use crate::types::{ConfigError, JobId, QueryError, SubmitError};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Wire job status taxonomy: 0 pending, 1 succeeded, 2 failed. Any other
/// value is rejected at parse time as [`QueryError::UnknownJobStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
}

/// Parsed `queryAsyncJobResult` response.
#[derive(Debug, Clone, PartialEq)]
pub struct JobPoll {
    pub status: JobStatus,
    pub virtual_machine: Option<VirtualMachine>,
    pub job_result: Option<String>,
}

/// Command seam toward the control plane. The engine and the tests drive
/// everything through this trait; [`HttpControlPlane`] is the production
/// implementation.
#[async_trait::async_trait]
pub trait ControlPlane: Send + Sync {
    async fn list_virtual_machines(&self) -> Result<Vec<VirtualMachine>, QueryError>;
    async fn submit_action(
        &self,
        descriptor: &ActionDescriptor,
        instance_id: &str,
    ) -> Result<JobId, SubmitError>;
    async fn submit_deploy(&self, params: &DeployParams) -> Result<JobId, SubmitError>;
    async fn query_job(&self, job_id: &JobId) -> Result<JobPoll, QueryError>;
    async fn list_zones(&self) -> Result<Vec<Zone>, QueryError>;
    async fn list_service_offerings(&self) -> Result<Vec<ServiceOffering>, QueryError>;
    async fn list_disk_offerings(&self) -> Result<Vec<DiskOffering>, QueryError>;
    async fn list_templates(
        &self,
        zone_id: &str,
        filter: TemplateFilter,
    ) -> Result<Vec<TemplateSummary>, QueryError>;
    async fn list_isos(&self, zone_id: &str) -> Result<Vec<IsoSummary>, QueryError>;
}

/// reqwest-backed control-plane client: HTTP GET with query-string command
/// encoding and JSON responses.
#[derive(Debug, Clone)]
pub struct HttpControlPlane {
    client: Client,
    base_url: Url,
}

impl HttpControlPlane {
    pub fn new(base_url: &str, settings: ClientSettings) -> Result<Self, ConfigError> {
        let base_url =
            Url::parse(base_url).map_err(|err| ConfigError::InvalidBaseUrl(err.to_string()))?;
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;
        Ok(Self { client, base_url })
    }

    async fn get_json(&self, query: &[(&str, &str)]) -> Result<serde_json::Value, QueryError> {
        let response = self
            .client
            .get(self.base_url.clone())
            .query(query)
            .query(&[("response", "json")])
            .send()
            .await
            .map_err(|err| QueryError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::HttpStatus(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|err| QueryError::Malformed(err.to_string()))
    }

    /// Issues a submission and extracts the job id from
    /// `body[envelope_key].jobid`. A missing key fails fast so that an
    /// unknown job id is never polled.
    async fn submit(
        &self,
        query: &[(&str, &str)],
        envelope_key: &str,
    ) -> Result<JobId, SubmitError> {
        let body = self.get_json(query).await.map_err(submit_error)?;
        body.get(envelope_key)
            .and_then(|envelope| envelope.get("jobid"))
            .and_then(job_id_text)
            .map(JobId::new)
            .ok_or_else(|| SubmitError::MalformedEnvelope {
                key: envelope_key.to_string(),
            })
    }
}

#[async_trait::async_trait]
impl ControlPlane for HttpControlPlane {
    async fn list_virtual_machines(&self) -> Result<Vec<VirtualMachine>, QueryError> {
        let body = self.get_json(&[("command", "listVirtualMachines")]).await?;
        let envelope: ListVirtualMachinesEnvelope = parse(body)?;
        Ok(envelope.listvirtualmachinesresponse.virtualmachine)
    }

    async fn submit_action(
        &self,
        descriptor: &ActionDescriptor,
        instance_id: &str,
    ) -> Result<JobId, SubmitError> {
        if !descriptor.is_async_job {
            // Synchronous actions are a declared-but-unwired code path.
            return Err(SubmitError::SynchronousUnsupported {
                command: descriptor.command_name,
            });
        }
        self.submit(
            &[("command", descriptor.command_name), ("id", instance_id)],
            descriptor.response_envelope_key,
        )
        .await
    }

    async fn submit_deploy(&self, params: &DeployParams) -> Result<JobId, SubmitError> {
        let mut query: Vec<(&str, &str)> = vec![
            ("command", "deployVirtualMachine"),
            ("zoneId", &params.zone_id),
            ("templateId", &params.template_id),
            ("serviceOfferingId", &params.service_offering_id),
        ];
        if let Some(name) = params.display_name.as_deref() {
            query.push(("displayname", name));
        }
        if let Some(group) = params.group.as_deref() {
            query.push(("group", group));
        }
        if let Some(disk_offering_id) = params.disk_offering_id.as_deref() {
            query.push(("diskOfferingId", disk_offering_id));
        }
        self.submit(&query, "deployvirtualmachineresponse").await
    }

    async fn query_job(&self, job_id: &JobId) -> Result<JobPoll, QueryError> {
        let body = self
            .get_json(&[("command", "queryAsyncJobResult"), ("jobId", job_id.as_str())])
            .await?;
        let envelope: QueryAsyncJobResultEnvelope = parse(body)?;
        let result = envelope.queryasyncjobresultresponse;
        let status = match result.jobstatus {
            0 => JobStatus::Pending,
            1 => JobStatus::Succeeded,
            2 => JobStatus::Failed,
            other => return Err(QueryError::UnknownJobStatus(other)),
        };
        Ok(JobPoll {
            status,
            virtual_machine: result
                .virtualmachine
                .and_then(|mut machines| {
                    if machines.is_empty() {
                        None
                    } else {
                        Some(machines.remove(0))
                    }
                }),
            job_result: result.jobresult.map(job_result_text),
        })
    }

    async fn list_zones(&self) -> Result<Vec<Zone>, QueryError> {
        let body = self
            .get_json(&[("command", "listZones"), ("available", "true")])
            .await?;
        let envelope: ListZonesEnvelope = parse(body)?;
        Ok(envelope.listzonesresponse.zone)
    }

    async fn list_service_offerings(&self) -> Result<Vec<ServiceOffering>, QueryError> {
        let body = self.get_json(&[("command", "listServiceOfferings")]).await?;
        let envelope: ListServiceOfferingsEnvelope = parse(body)?;
        Ok(envelope.listserviceofferingsresponse.serviceoffering)
    }

    async fn list_disk_offerings(&self) -> Result<Vec<DiskOffering>, QueryError> {
        let body = self.get_json(&[("command", "listDiskOfferings")]).await?;
        let envelope: ListDiskOfferingsEnvelope = parse(body)?;
        Ok(envelope.listdiskofferingsresponse.diskoffering)
    }

    async fn list_templates(
        &self,
        zone_id: &str,
        filter: TemplateFilter,
    ) -> Result<Vec<TemplateSummary>, QueryError> {
        let body = self
            .get_json(&[
                ("command", "listTemplates"),
                ("templatefilter", filter.as_query()),
                ("zoneid", zone_id),
            ])
            .await?;
        let envelope: ListTemplatesEnvelope = parse(body)?;
        Ok(envelope.listtemplatesresponse.template)
    }

    async fn list_isos(&self, zone_id: &str) -> Result<Vec<IsoSummary>, QueryError> {
        let body = self
            .get_json(&[
                ("command", "listIsos"),
                ("isReady", "true"),
                ("bootable", "true"),
                ("zoneid", zone_id),
            ])
            .await?;
        let envelope: ListIsosEnvelope = parse(body)?;
        Ok(envelope.listisosresponse.iso)
    }
}

fn parse<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, QueryError> {
    serde_json::from_value(body).map_err(|err| QueryError::Malformed(err.to_string()))
}

fn submit_error(err: QueryError) -> SubmitError {
    match err {
        QueryError::HttpStatus(code) => SubmitError::HttpStatus(code),
        QueryError::Transport(message) => SubmitError::Transport(message),
        QueryError::Malformed(message) => SubmitError::Malformed(message),
        QueryError::UnknownJobStatus(code) => {
            SubmitError::Malformed(format!("unknown job status {code}"))
        }
    }
}

/// Job ids arrive as strings or bare numbers depending on server version.
fn job_id_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(id) => Some(id.clone()),
        serde_json::Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// `jobresult` is free-form: a plain string on most failures, an object on
/// some. Anything non-string is rendered as compact JSON.
fn job_result_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    }
}
