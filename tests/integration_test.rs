mod common;

use common::{five_questions, test_config, ScriptedTransport};
use cv_agent_client::orchestrator::RunStats;
use cv_agent_client::services::FileDownloadSink;
use cv_agent_client::utils::logging;
use cv_agent_client::{App, Config, InterviewPhase, ReqwestTransport, SessionOrchestrator};
use base64::Engine;
use serde_json::json;
use std::sync::Arc;
use tokio_test::assert_ok;

fn script_full_session(transport: &ScriptedTransport) {
    transport.reply_json("/ping", 200, json!({ "status": "ok" }));
    transport.reply_raw("/resume/upload", 404, b"Not Found");
    transport.reply_json(
        "/ingest/pdf",
        200,
        json!({ "text": "  Jean Dupont\nDéveloppeur Rust  " }),
    );
    transport.reply_json(
        "/analyze-text",
        200,
        json!({ "match_score": 72, "missing_keywords": ["Kafka"], "suggestions": [] }),
    );
    transport.reply_json(
        "/cv/rewrite",
        200,
        json!({ "headline": "Ingénieur Rust", "bullets": ["Services async"], "skills": ["Rust"] }),
    );
    transport.reply_json(
        "/linkedin/optimize",
        200,
        json!({ "headline": "Dev Rust", "summary": "Passionné par les systèmes" }),
    );
    transport.reply_json("/interview/generate", 200, five_questions());
    for score in [6, 7, 8, 9, 7] {
        transport.reply_json(
            "/interview/score",
            200,
            json!({ "score": score, "tips": ["Soyez concret"] }),
        );
    }
    transport.reply_raw("/export/docx", 200, b"PK docx");
    transport.reply_json(
        "/linkedin/export/pdf-b64",
        200,
        json!({ "data": base64::engine::general_purpose::STANDARD.encode(b"%PDF about") }),
    );
}

fn app_with(config: Config, transport: Arc<ScriptedTransport>) -> App {
    let sink = Arc::new(FileDownloadSink::new(&config.output_dir));
    let orchestrator = SessionOrchestrator::new(&config, transport, sink);
    App::with_orchestrator(config, orchestrator)
}

#[tokio::test]
async fn test_full_scenario_from_file() {
    logging::init(false);

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cv.pdf"), b"%PDF-1.4").unwrap();
    std::fs::write(dir.path().join("job.txt"), "Développeur Rust senior").unwrap();
    std::fs::write(
        dir.path().join("scenario.toml"),
        r#"
resume_file = "cv.pdf"
job_file = "job.txt"
full_name = "Jean Dupont"
answers = ["R1", "R2", "R3", "R4", "R5", "R6 en trop"]
"#,
    )
    .unwrap();

    let mut config = test_config(&dir);
    config.scenario_file = dir.path().join("scenario.toml").display().to_string();

    let transport = ScriptedTransport::new();
    script_full_session(&transport);
    let app = app_with(config, transport.clone());

    let stats = assert_ok!(app.run().await);
    assert_eq!(
        stats,
        RunStats {
            applied: 13,
            ignored: 0,
            stale: 0,
            failed: 0,
        }
    );

    let state = app.orchestrator().snapshot();
    assert_eq!(state.resume_text, "Jean Dupont\nDéveloppeur Rust");
    assert_eq!(state.job_text, "Développeur Rust senior");
    assert_eq!(state.last_ping, Some(json!({ "status": "ok" })));
    assert_eq!(
        state.result.linkedin.as_ref().unwrap().about,
        "Passionné par les systèmes"
    );
    assert_eq!(state.result.interview.answers().len(), 5);
    assert_eq!(state.result.interview.phase(), InterviewPhase::Complete);

    // 第六条回答没有发出请求
    assert_eq!(transport.requests_to("/interview/score").len(), 5);

    assert_eq!(
        std::fs::read(dir.path().join("cv_optimise.docx")).unwrap(),
        b"PK docx".to_vec()
    );
    assert_eq!(
        std::fs::read(dir.path().join("linkedin.pdf")).unwrap(),
        b"%PDF about".to_vec()
    );
    assert!(app.orchestrator().notification().is_none());
}

#[tokio::test]
async fn test_scenario_continues_after_failures() {
    let dir = tempfile::tempdir().unwrap();
    let transport = ScriptedTransport::new();
    transport.unreachable("/ping");
    transport.reply_raw("/analyze-text", 500, b"LLM indisponible");
    transport.reply_json(
        "/linkedin/optimize",
        200,
        json!({ "headline": "Dev", "about": "Un About" }),
    );
    transport.reply_json(
        "/linkedin/export/pdf-b64",
        200,
        json!({ "filename": "about.pdf", "data": "JVBERg==" }),
    );
    // rewrite / interview 未配置，服务端返回 404

    let app = app_with(test_config(&dir), transport.clone());
    let scenario = cv_agent_client::models::Scenario {
        resume_text: Some("CV collé".to_string()),
        job_text: Some("Offre".to_string()),
        answers: vec!["Réponse".to_string()],
        ..Default::default()
    };

    let stats = app.run_scenario(&scenario).await.unwrap();

    // ping / analyze / rewrite / interview / docx 失败，linkedin + pdf 成功
    assert_eq!(stats.failed, 5);
    assert_eq!(stats.applied, 2);

    let state = app.orchestrator().snapshot();
    assert_eq!(state.resume_text, "CV collé");
    assert!(state.result.analyze.is_none());
    assert_eq!(state.result.linkedin.unwrap().headline, "Dev");
    assert_eq!(state.result.interview.phase(), InterviewPhase::Empty);
    assert!(transport.requests_to("/interview/score").is_empty());
    assert!(transport.requests_to("/export/docx").is_empty());
    assert_eq!(
        std::fs::read(dir.path().join("about.pdf")).unwrap(),
        b"%PDF".to_vec()
    );
}

#[tokio::test]
async fn test_concurrent_pings_keep_latest() {
    let dir = tempfile::tempdir().unwrap();
    let transport = ScriptedTransport::new();
    for i in 0..4 {
        transport.reply_delayed(
            "/ping",
            200,
            json!({ "n": i }),
            std::time::Duration::from_millis(80 - i * 20),
        );
    }
    let app = app_with(test_config(&dir), transport.clone());
    let orch = app.orchestrator();

    let outcomes = futures::future::join_all((0..4).map(|_| orch.ping())).await;

    assert_eq!(outcomes.iter().filter(|o| o.is_applied()).count(), 1);
    assert!(outcomes[3].is_applied());
    assert_eq!(orch.snapshot().last_ping, Some(json!({ "n": 3 })));
}

#[tokio::test]
#[ignore] // 需要本地运行的服务：cargo test -- --ignored
async fn test_ping_live_service() {
    logging::init(true);

    let config = Config::from_env().expect("读取环境变量失败");
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("创建 HTTP 客户端失败");
    let transport = Arc::new(ReqwestTransport::with_client(client));
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(FileDownloadSink::new(dir.path()));
    let orchestrator = SessionOrchestrator::new(&config, transport, sink);

    let outcome = orchestrator.ping().await;
    assert!(outcome.is_applied(), "ping 失败: {:?}", outcome);
    assert!(orchestrator.snapshot().last_ping.is_some());
}
