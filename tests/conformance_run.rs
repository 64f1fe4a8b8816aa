//! Whole-run tests against an in-process stand-in for the Wallet2FA API.
//!
//! `FakeWallet2fa` answers every route the way a conforming deployment does;
//! `Faults` switches individual behaviours off to prove the runner notices.

use anyhow::Result;
use serde_json::{json, Value};
use std::{
    io::{self, Write},
    net::TcpListener,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use wallet2fa_conformance::conformance::{
    contract::DOCUMENTED_ENDPOINTS, ApiClient, Check, ResultsLog, RunContext, Runner, Suite,
};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

#[derive(Debug, Default, Clone, Copy)]
struct Faults {
    accept_missing_address: bool,
    drop_cors_headers: bool,
    public_profile: bool,
}

struct FakeWallet2fa {
    issued: AtomicU64,
    faults: Faults,
}

impl FakeWallet2fa {
    fn new(faults: Faults) -> Self {
        Self {
            issued: AtomicU64::new(0x00c0_ffee),
            faults,
        }
    }

    fn with_cors(&self, template: ResponseTemplate) -> ResponseTemplate {
        if self.faults.drop_cors_headers {
            return template;
        }
        template
            .insert_header("Access-Control-Allow-Origin", "*")
            .insert_header(
                "Access-Control-Allow-Methods",
                "GET, POST, PUT, DELETE, OPTIONS",
            )
            .insert_header("Access-Control-Allow-Headers", "Content-Type, Authorization")
    }

    fn nonce(&self, body: &Value) -> ResponseTemplate {
        if !has_text(body, "address") && !self.faults.accept_missing_address {
            return ResponseTemplate::new(400).set_body_json(json!({"error": "Address is required"}));
        }
        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        ResponseTemplate::new(200).set_body_json(json!({ "nonce": format!("{n:032x}") }))
    }

    fn profile(&self, req: &Request) -> ResponseTemplate {
        if self.faults.public_profile {
            return ResponseTemplate::new(200).set_body_json(json!({"address": "0x0"}));
        }
        let error = if req.headers.contains_key("authorization") {
            "Unauthorized: invalid token"
        } else {
            "Unauthorized"
        };
        ResponseTemplate::new(401).set_body_json(json!({ "error": error }))
    }
}

fn has_text(body: &Value, field: &str) -> bool {
    body.get(field)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

impl Respond for FakeWallet2fa {
    fn respond(&self, req: &Request) -> ResponseTemplate {
        let route = req.url.path().strip_prefix("/api").unwrap_or("");
        let body: Value = serde_json::from_slice(&req.body).unwrap_or(Value::Null);

        let template = match (req.method.as_str(), route) {
            ("OPTIONS", _) => ResponseTemplate::new(200),
            ("GET", "/health") => ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "timestamp": 1_700_000_000_000_u64,
                "service": "Wallet2FA Backend"
            })),
            ("GET", "/") => ResponseTemplate::new(200).set_body_json(json!({
                "message": "Wallet2FA API",
                "version": "1.0.0",
                "endpoints": DOCUMENTED_ENDPOINTS,
            })),
            ("POST", "/auth/nonce") => self.nonce(&body),
            ("POST", "/auth/verify") => {
                if ["message", "signature", "address"]
                    .iter()
                    .all(|field| has_text(&body, field))
                {
                    ResponseTemplate::new(401)
                        .set_body_json(json!({"success": false, "message": "Invalid signature"}))
                } else {
                    ResponseTemplate::new(400).set_body_json(
                        json!({"error": "Message, signature, and address are required"}),
                    )
                }
            }
            ("GET", "/user/profile") => self.profile(req),
            (_, other) => ResponseTemplate::new(404)
                .set_body_json(json!({ "error": format!("Route {other} not found") })),
        };

        self.with_cors(template)
    }
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn contents(&self) -> String {
        self.0
            .lock()
            .map(|b| String::from_utf8_lossy(&b).into_owned())
            .unwrap_or_default()
    }
}

async fn fake_service(faults: Faults) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(FakeWallet2fa::new(faults))
        .mount(&server)
        .await;
    server
}

fn runner_for(base_url: &str, out: &SharedBuf) -> Result<Runner> {
    let client = ApiClient::new(base_url, Duration::from_secs(5))?;
    Ok(Runner::new(
        client,
        RunContext::default(),
        ResultsLog::new(Box::new(out.clone())),
    ))
}

#[tokio::test]
async fn conforming_service_passes_every_check() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = fake_service(Faults::default()).await;
    let out = SharedBuf::default();
    let mut runner = runner_for(&format!("{}/api", server.uri()), &out)?;

    let checks = Suite::All.checks();
    let summary = runner.run(&checks).await;

    let failures: Vec<_> = runner
        .log()
        .results()
        .iter()
        .filter(|r| !r.success)
        .map(|r| r.render())
        .collect();
    assert!(failures.is_empty(), "unexpected failures: {failures:#?}");

    assert_eq!(summary.passed, checks.len());
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.exit_code(), 0);

    // nonce issuance and profile authorization each record two results
    assert_eq!(runner.log().len(), checks.len() + 2);

    let nonce = runner.context().nonce().map(str::to_string);
    assert_eq!(nonce.map(|n| n.len()), Some(32));

    let output = out.contents();
    assert!(output.contains(&format!("Base URL: {}/api", server.uri())));
    assert!(output.contains("PASS Health Endpoint: Health endpoint working correctly"));
    assert!(output.contains("PASS Burst Liveness"));
    assert!(output.contains(&format!("Passed: {}\nFailed: 0\nSuccess Rate: 100.0%", checks.len())));
    Ok(())
}

#[tokio::test]
async fn contract_violations_are_reported_without_stopping() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = fake_service(Faults {
        accept_missing_address: true,
        drop_cors_headers: true,
        public_profile: true,
    })
    .await;
    let out = SharedBuf::default();
    let mut runner = runner_for(&format!("{}/api", server.uri()), &out)?;

    let checks = Suite::Backend.checks();
    let summary = runner.run(&checks).await;

    assert_eq!(summary.failed, 3);
    assert_eq!(summary.passed, checks.len() - 3);
    assert_eq!(summary.exit_code(), 1);

    let failed: Vec<&str> = runner
        .log()
        .results()
        .iter()
        .filter(|r| !r.success)
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(
        failed,
        vec![
            "Nonce Endpoint Validation",
            "Profile Endpoint Unauthorized",
            "CORS Headers"
        ]
    );

    let output = out.contents();
    assert!(output.contains("FAIL Nonce Endpoint Validation: Expected 400 for missing address, got 200"));
    assert!(output.contains("Success Rate: 66.7%"));
    assert!(output.contains("Some checks failed."));
    Ok(())
}

#[tokio::test]
async fn unreachable_service_fails_each_check_once() -> Result<()> {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?.port()
    };
    let out = SharedBuf::default();
    let client = ApiClient::new(
        &format!("http://127.0.0.1:{port}/api"),
        Duration::from_millis(500),
    )?;
    let mut runner = Runner::new(
        client,
        RunContext::default(),
        ResultsLog::new(Box::new(out.clone())),
    );

    let checks = Suite::All.checks();
    let summary = runner.run(&checks).await;

    assert_eq!(summary.passed, 0);
    assert_eq!(summary.failed, checks.len());
    assert_eq!(runner.log().len(), checks.len());
    assert!(runner.context().nonce().is_none());

    for (result, check) in runner.log().results().iter().zip(&checks) {
        assert_eq!(result.name, check.name());
        assert!(!result.success);
    }

    assert!(out.contents().contains("Success Rate: 0.0%"));
    Ok(())
}

#[tokio::test]
async fn signature_check_reuses_nonce_from_issuance() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = fake_service(Faults::default()).await;
    let out = SharedBuf::default();
    let mut runner = runner_for(&format!("{}/api", server.uri()), &out)?;

    runner
        .run(&[Check::NonceIssuance, Check::VerifySignatureRejection])
        .await;

    let nonce = runner
        .context()
        .nonce()
        .map(str::to_string)
        .unwrap_or_default();
    assert!(!nonce.is_empty());

    let requests = server.received_requests().await.unwrap_or_default();
    let verify = requests
        .iter()
        .find(|r| r.url.path() == "/api/auth/verify")
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .unwrap_or_default();
    assert!(verify.contains(&format!("Nonce: {nonce}")));
    Ok(())
}
