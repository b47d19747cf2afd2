mod common;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use time_travel::{NotifyConfig, PageContext, TimeUpdateNotifier, get_fake_date, set_fake_date};

const FROZEN_ISO: &str = "2010-01-01T00:00:00.000Z";

async fn wait_for_requests(server: &MockServer, count: usize) {
    for _ in 0..500 {
        let received = server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len());
        if received >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {count} notification request(s)");
}

fn notifier_for(server: &MockServer, client_key: &str) -> TimeUpdateNotifier {
    let config = NotifyConfig::from_values(
        Some(format!("{}/updateTime", server.uri())),
        None,
        client_key,
    );
    TimeUpdateNotifier::new(&config, "app-demo.timetravel.example")
}

#[tokio::test]
async fn posts_time_update_with_identifying_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/updateTime"))
        .and(header("Time-Travel-Client-Key", "test-key"))
        .and(body_json(json!({ "time": FROZEN_ISO })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = PageContext::new("app-demo.timetravel.example");
    let notifier = notifier_for(&server, "test-key");

    set_fake_date(&ctx, &notifier, FROZEN_ISO);

    // local state is visible immediately, before the detached task lands
    assert_eq!(get_fake_date(&ctx), FROZEN_ISO);
    wait_for_requests(&server, 1).await;
}

#[tokio::test]
async fn clearing_the_fake_date_also_notifies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/updateTime"))
        .and(body_json(json!({ "time": "" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = PageContext::new("app-demo.timetravel.example");
    let notifier = notifier_for(&server, "test-key");

    set_fake_date(&ctx, &notifier, "");
    wait_for_requests(&server, 1).await;
}

#[tokio::test]
async fn notification_failure_never_touches_local_state() {
    let (lines, _guard) = common::capture_logs();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/updateTime"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = PageContext::new("app-demo.timetravel.example");
    let notifier = notifier_for(&server, "test-key");

    set_fake_date(&ctx, &notifier, FROZEN_ISO);
    assert_eq!(get_fake_date(&ctx), FROZEN_ISO);

    wait_for_requests(&server, 1).await;
    for _ in 0..500 {
        if common::snapshot(&lines)
            .iter()
            .any(|line| line.contains("notify.failure"))
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let logs = common::snapshot(&lines);
    assert!(logs.iter().any(|line| line.contains("notify.start")));
    assert!(logs.iter().any(|line| line.contains("notify.failure")));
    // the failure stays where it was logged; the setting is intact
    assert_eq!(get_fake_date(&ctx), FROZEN_ISO);
}

#[test]
fn dispatch_without_a_runtime_skips_the_notification() {
    let ctx = PageContext::new("app-demo.timetravel.example");
    let config = NotifyConfig::from_values(
        Some("http://127.0.0.1:9/updateTime".to_string()),
        None,
        "test-key",
    );
    let notifier = TimeUpdateNotifier::new(&config, ctx.host());

    // no tokio runtime here; the write must still land
    set_fake_date(&ctx, &notifier, FROZEN_ISO);
    assert_eq!(get_fake_date(&ctx), FROZEN_ISO);
}
