/*!
 * Integration tests for the wiki client against a mock server
 */

use questvox::app_config::WikiConfig;
use questvox::wiki::WikiClient;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use crate::common;

fn client_for(server: &MockServer) -> WikiClient {
    let config = WikiConfig {
        base_url: server.uri(),
        timeout_secs: 5,
        ..WikiConfig::default()
    };
    WikiClient::new(config).unwrap()
}

/// Test that pages are fetched with the configured User-Agent
#[tokio::test]
async fn test_fetchPage_shouldSendUserAgent() {
    let server = MockServer::start().await;
    let user_agent = WikiConfig::default().user_agent;
    Mock::given(method("GET"))
        .and(path("/w/Transcript:Cooks_Assistant"))
        .and(header("user-agent", user_agent.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(common::COOKS_ASSISTANT_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let html = client
        .fetch_page(&format!("{}/w/Transcript:Cooks_Assistant", server.uri()))
        .await
        .unwrap();

    assert!(html.contains("mw-parser-output"));
}

/// Test that error statuses surface without retry
#[tokio::test]
async fn test_fetchPage_withNotFound_shouldFailOnce() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .fetch_page(&format!("{}/w/Transcript:Missing", server.uri()))
        .await;

    let error = result.unwrap_err();
    assert!(error.to_string().contains("Not Found"));
}

/// Test listing the quest transcripts
#[tokio::test]
async fn test_listQuestTranscripts_shouldParseCategoryPage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/Category:Quest_transcript"))
        .respond_with(ResponseTemplate::new(200).set_body_string(common::category_page(&[
            ("/w/Transcript:Cook%27s_Assistant", "Transcript:Cook's Assistant"),
            ("/w/Transcript:Imp_Catcher", "Transcript:Imp Catcher"),
        ])))
        .mount(&server)
        .await;

    let listings = client_for(&server).list_quest_transcripts().await.unwrap();

    assert_eq!(listings.len(), 2);
    assert_eq!(listings[1].quest_name(), "Imp Catcher");
    assert_eq!(listings[1].link, format!("{}/w/Transcript:Imp_Catcher", server.uri()));
}
