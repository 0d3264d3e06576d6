use panel_engine::{
    ActionCommand, ActionDescriptor, ClientSettings, ControlPlane, DeployParams, HttpControlPlane,
    JobId, JobStatus, QueryError, SubmitError, TemplateFilter,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HttpControlPlane {
    HttpControlPlane::new(&server.uri(), ClientSettings::default()).expect("client")
}

#[tokio::test]
async fn submit_action_extracts_job_id_from_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("command", "stopVirtualMachine"))
        .and(query_param("id", "100"))
        .and(query_param("response", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stopvirtualmachineresponse": { "jobid": "55" }
        })))
        .mount(&server)
        .await;

    let job_id = client(&server)
        .submit_action(ActionCommand::StopVirtualMachine.descriptor(), "100")
        .await
        .expect("submission accepted");
    assert_eq!(job_id, JobId::new("55"));
}

#[tokio::test]
async fn submit_action_accepts_numeric_job_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("command", "startVirtualMachine"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "startvirtualmachineresponse": { "jobid": 55 }
        })))
        .mount(&server)
        .await;

    let job_id = client(&server)
        .submit_action(ActionCommand::StartVirtualMachine.descriptor(), "100")
        .await
        .expect("submission accepted");
    assert_eq!(job_id, JobId::new("55"));
}

#[tokio::test]
async fn submit_action_fails_fast_on_missing_envelope_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": {} })))
        .mount(&server)
        .await;

    let err = client(&server)
        .submit_action(ActionCommand::StopVirtualMachine.descriptor(), "100")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SubmitError::MalformedEnvelope {
            key: "stopvirtualmachineresponse".to_string(),
        }
    );
}

#[tokio::test]
async fn submit_action_rejects_synchronous_descriptors() {
    let server = MockServer::start().await;
    let descriptor = ActionDescriptor {
        command_name: "rebootVirtualMachine",
        display_label: "Reboot",
        is_async_job: false,
        response_envelope_key: "rebootvirtualmachineresponse",
    };

    let err = client(&server)
        .submit_action(&descriptor, "100")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SubmitError::SynchronousUnsupported {
            command: "rebootVirtualMachine",
        }
    );
    // No request may be issued for a rejected submission.
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn submit_action_surfaces_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server)
        .submit_action(ActionCommand::StartVirtualMachine.descriptor(), "100")
        .await
        .unwrap_err();
    assert_eq!(err, SubmitError::HttpStatus(500));
}

#[tokio::test]
async fn submit_deploy_encodes_all_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("command", "deployVirtualMachine"))
        .and(query_param("zoneId", "z1"))
        .and(query_param("templateId", "t9"))
        .and(query_param("serviceOfferingId", "so2"))
        .and(query_param("displayname", "web-01"))
        .and(query_param("group", "batch"))
        .and(query_param("diskOfferingId", "do4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deployvirtualmachineresponse": { "jobid": "77" }
        })))
        .mount(&server)
        .await;

    let params = DeployParams {
        zone_id: "z1".to_string(),
        display_name: Some("web-01".to_string()),
        group: Some("batch".to_string()),
        template_id: "t9".to_string(),
        service_offering_id: "so2".to_string(),
        disk_offering_id: Some("do4".to_string()),
    };
    let job_id = client(&server)
        .submit_deploy(&params)
        .await
        .expect("submission accepted");
    assert_eq!(job_id, JobId::new("77"));
}

#[tokio::test]
async fn query_job_parses_success_with_entity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("command", "queryAsyncJobResult"))
        .and(query_param("jobId", "55"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "queryasyncjobresultresponse": {
                "jobstatus": 1,
                "virtualmachine": [{ "id": "100", "state": "Stopped" }]
            }
        })))
        .mount(&server)
        .await;

    let poll = client(&server)
        .query_job(&JobId::new("55"))
        .await
        .expect("query ok");
    assert_eq!(poll.status, JobStatus::Succeeded);
    let machine = poll.virtual_machine.expect("entity payload");
    assert_eq!(machine.id, "100");
    assert_eq!(machine.state, "Stopped");
}

#[tokio::test]
async fn query_job_reports_failure_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "queryasyncjobresultresponse": {
                "jobstatus": 2,
                "jobresult": "quota exceeded"
            }
        })))
        .mount(&server)
        .await;

    let poll = client(&server)
        .query_job(&JobId::new("77"))
        .await
        .expect("query ok");
    assert_eq!(poll.status, JobStatus::Failed);
    assert_eq!(poll.job_result.as_deref(), Some("quota exceeded"));
}

#[tokio::test]
async fn query_job_rejects_unknown_status_codes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "queryasyncjobresultresponse": { "jobstatus": 7 }
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .query_job(&JobId::new("55"))
        .await
        .unwrap_err();
    assert_eq!(err, QueryError::UnknownJobStatus(7));
}

#[tokio::test]
async fn list_virtual_machines_parses_records_and_tolerates_empty_lists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("command", "listVirtualMachines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "listvirtualmachinesresponse": {
                "virtualmachine": [{
                    "id": "100",
                    "name": "i-2-100-VM",
                    "displayname": "frontend",
                    "state": "Running",
                    "haenable": "true",
                    "group": "web"
                }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let machines = client(&server)
        .list_virtual_machines()
        .await
        .expect("listing ok");
    assert_eq!(machines.len(), 1);
    assert_eq!(machines[0].displayname, "frontend");
    assert!(machines[0].ha_enabled());

    server.reset().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "listvirtualmachinesresponse": {} })),
        )
        .mount(&server)
        .await;
    let machines = client(&server)
        .list_virtual_machines()
        .await
        .expect("listing ok");
    assert!(machines.is_empty());
}

#[tokio::test]
async fn list_templates_passes_filter_and_zone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("command", "listTemplates"))
        .and(query_param("templatefilter", "selfexecutable"))
        .and(query_param("zoneid", "z1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "listtemplatesresponse": {
                "template": [{ "id": "t1", "displaytext": "CentOS 5.3", "ostypename": "CentOS" }]
            }
        })))
        .mount(&server)
        .await;

    let templates = client(&server)
        .list_templates("z1", TemplateFilter::Mine)
        .await
        .expect("listing ok");
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].displaytext, "CentOS 5.3");
}

#[tokio::test]
async fn wizard_option_listings_parse() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("command", "listZones"))
        .and(query_param("available", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "listzonesresponse": { "zone": [{ "id": "z1", "name": "zone-1" }] }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("command", "listServiceOfferings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "listserviceofferingsresponse": {
                "serviceoffering": [{ "id": "so1", "name": "Small", "displaytext": "Small Instance" }]
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("command", "listDiskOfferings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "listdiskofferingsresponse": {
                "diskoffering": [{ "id": "do1", "name": "Small", "displaytext": "5 GB" }]
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("command", "listIsos"))
        .and(query_param("isReady", "true"))
        .and(query_param("bootable", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "listisosresponse": { "iso": [{ "id": "iso1", "displaytext": "Rescue CD" }] }
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.list_zones().await.expect("zones")[0].name, "zone-1");
    assert_eq!(
        client.list_service_offerings().await.expect("offerings")[0].displaytext,
        "Small Instance"
    );
    assert_eq!(
        client.list_disk_offerings().await.expect("offerings")[0].displaytext,
        "5 GB"
    );
    assert_eq!(
        client.list_isos("z1").await.expect("isos")[0].displaytext,
        "Rescue CD"
    );
}
