use serde::Deserialize;

/// Instance record in control-plane wire format. Field names follow the
/// all-lowercase keys of the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct VirtualMachine {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub displayname: String,
    #[serde(default)]
    pub ipaddress: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub zonename: String,
    #[serde(default)]
    pub templatename: String,
    #[serde(default)]
    pub serviceofferingname: String,
    /// "true"/"false" on the wire.
    #[serde(default)]
    pub haenable: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub isoid: Option<String>,
}

impl VirtualMachine {
    pub fn ha_enabled(&self) -> bool {
        self.haenable == "true"
    }
}

/// Parameters of a `deployVirtualMachine` submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployParams {
    pub zone_id: String,
    pub display_name: Option<String>,
    pub group: Option<String>,
    pub template_id: String,
    pub service_offering_id: String,
    pub disk_offering_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceOffering {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub displaytext: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiskOffering {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub displaytext: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateSummary {
    pub id: String,
    #[serde(default)]
    pub displaytext: String,
    #[serde(default)]
    pub ostypename: String,
    #[serde(default)]
    pub account: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IsoSummary {
    pub id: String,
    #[serde(default)]
    pub displaytext: String,
    #[serde(default)]
    pub ostypename: String,
    #[serde(default)]
    pub account: String,
}

/// Server-side template catalogue the wizard can browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFilter {
    Featured,
    Mine,
    Community,
}

impl TemplateFilter {
    pub(crate) fn as_query(self) -> &'static str {
        match self {
            TemplateFilter::Featured => "featured",
            TemplateFilter::Mine => "selfexecutable",
            TemplateFilter::Community => "community",
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListVirtualMachinesEnvelope {
    #[serde(default)]
    pub listvirtualmachinesresponse: ListVirtualMachinesResponse,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListVirtualMachinesResponse {
    #[serde(default)]
    pub virtualmachine: Vec<VirtualMachine>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryAsyncJobResultEnvelope {
    pub queryasyncjobresultresponse: QueryAsyncJobResultResponse,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryAsyncJobResultResponse {
    pub jobstatus: i64,
    #[serde(default)]
    pub jobresult: Option<serde_json::Value>,
    #[serde(default)]
    pub virtualmachine: Option<Vec<VirtualMachine>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListZonesEnvelope {
    #[serde(default)]
    pub listzonesresponse: ListZonesResponse,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListZonesResponse {
    #[serde(default)]
    pub zone: Vec<Zone>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListServiceOfferingsEnvelope {
    #[serde(default)]
    pub listserviceofferingsresponse: ListServiceOfferingsResponse,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListServiceOfferingsResponse {
    #[serde(default)]
    pub serviceoffering: Vec<ServiceOffering>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListDiskOfferingsEnvelope {
    #[serde(default)]
    pub listdiskofferingsresponse: ListDiskOfferingsResponse,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListDiskOfferingsResponse {
    #[serde(default)]
    pub diskoffering: Vec<DiskOffering>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListTemplatesEnvelope {
    #[serde(default)]
    pub listtemplatesresponse: ListTemplatesResponse,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListTemplatesResponse {
    #[serde(default)]
    pub template: Vec<TemplateSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListIsosEnvelope {
    #[serde(default)]
    pub listisosresponse: ListIsosResponse,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListIsosResponse {
    #[serde(default)]
    pub iso: Vec<IsoSummary>,
}
