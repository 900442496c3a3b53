// SPDX-FileCopyrightText: 2026 Apinox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::folder::Folder;
use super::ids::{FolderId, ProjectId, RequestId, TestCaseId, TestStepId, TestSuiteId};
use super::interface::{Interface, Operation};
use super::project::Project;
use super::request::{Assertion, Request};
use super::test_suite::{StepConfig, TestCase, TestStep, TestSuite};

fn rid(value: &str) -> RequestId {
    RequestId::new(value).expect("request id")
}

pub(crate) fn request(name: &str, id: &str, body: &str) -> Request {
    let mut req = Request::new(name, body);
    req.set_id(Some(rid(id)));
    req.set_endpoint(Some("http://localhost:8080/ws".to_owned()));
    req.set_method(Some("POST".to_owned()));
    req.set_content_type(Some("text/xml".to_owned()));
    req.headers_mut()
        .insert("SOAPAction".to_owned(), "urn:action".to_owned());
    req
}

pub(crate) fn login_interface() -> Interface {
    let mut iface = Interface::new("AuthService", "wsdl");
    iface.set_binding_name(Some("AuthBinding".to_owned()));
    iface.set_protocol_version(Some("1.1".to_owned()));
    iface.set_definition_source(Some("http://example.com/auth?wsdl".to_owned()));

    let mut login = Operation::new("Login");
    login.set_action(Some("urn:Login".to_owned()));
    let mut login_req = request("Basic Login", "r-login-1", "<Login><user>bob</user></Login>");
    login_req
        .assertions_mut()
        .push(Assertion::new("Simple Contains"));
    login.requests_mut().push(login_req);

    let mut logout = Operation::new("Logout");
    logout.set_action(Some("urn:Logout".to_owned()));
    logout
        .requests_mut()
        .push(request("Logout All", "r-logout-1", "<Logout/>"));

    iface.operations_mut().push(login);
    iface.operations_mut().push(logout);
    iface
}

pub(crate) fn nested_folders() -> Folder {
    let mut root = Folder::new(FolderId::new("f-root").expect("folder id"), "Smoke");
    let mut mid = Folder::new(FolderId::new("f-mid").expect("folder id"), "Auth");
    let mut leaf = Folder::new(FolderId::new("f-leaf").expect("folder id"), "Edge Cases");
    leaf.requests_mut()
        .push(request("Expired Token", "r-edge-1", "<Check/>"));
    mid.folders_mut().push(leaf);
    mid.requests_mut()
        .push(request("Happy Path", "r-mid-1", "<Login/>"));
    root.folders_mut().push(mid);
    root
}

pub(crate) fn regression_suite() -> TestSuite {
    let mut suite = TestSuite::new(TestSuiteId::new("s-regression").expect("suite id"), "Regression");
    let mut case = TestCase::new(TestCaseId::new("c-auth").expect("case id"), "Auth Cycle");
    case.steps_mut().push(TestStep::new(
        TestStepId::new("st-1").expect("step id"),
        "Call Login",
        StepConfig::Request {
            request: request("Login Step", "r-step-1", "<Login/>"),
        },
    ));
    case.steps_mut().push(TestStep::new(
        TestStepId::new("st-2").expect("step id"),
        "Check Session",
        StepConfig::Script {
            script_name: Some("check_session".to_owned()),
            source: "assert(response.status === 200);".to_owned(),
        },
    ));
    case.steps_mut().push(TestStep::new(
        TestStepId::new("st-3").expect("step id"),
        "Cooldown",
        StepConfig::Delay { millis: 250 },
    ));
    suite.test_cases_mut().push(case);
    suite
}

pub(crate) fn sample_project() -> Project {
    let mut project = Project::new("Payments");
    project.set_id(Some(ProjectId::new("p-payments").expect("project id")));
    project.set_description(Some("Payment gateway contract tests".to_owned()));
    project.interfaces_mut().push(login_interface());
    project.folders_mut().push(nested_folders());
    project.test_suites_mut().push(regression_suite());
    project
}
