use std::sync::Arc;

use smartsum::{
    config::Config,
    extraction::{PdfPageExtractor, TesseractOcr},
    processing::{ContentType, SummaryService, build_prompt},
    summarization::{SummarizationClient, build_summarization_client},
};

fn live_config() -> Config {
    dotenvy::dotenv().ok();
    Config::from_env().expect("config from environment")
}

#[tokio::test]
#[ignore = "Requires GROQ_API_KEY and network access"]
async fn live_chat_completion_roundtrip() {
    let config = live_config();
    config.require_api_key().expect("GROQ_API_KEY must be set");
    let client = build_summarization_client(&config).expect("client");

    let reply = client
        .complete(&build_prompt(
            ContentType::Text,
            "The quick brown fox jumps over the lazy dog.",
        ))
        .await
        .expect("provider reply");
    assert!(!reply.trim().is_empty());
}

#[tokio::test]
#[ignore = "Requires GROQ_API_KEY, pdftoppm, tesseract, and SMARTSUM_LIVE_PDF"]
async fn live_document_summary() {
    let config = live_config();
    let path = std::env::var("SMARTSUM_LIVE_PDF").expect("SMARTSUM_LIVE_PDF must point at a PDF");
    let bytes = std::fs::read(path).expect("read pdf");

    let service = SummaryService::new(
        Arc::new(PdfPageExtractor::new(Arc::new(TesseractOcr::new(config.ocr.clone())))),
        build_summarization_client(&config).expect("client"),
    );
    let report = service.summarize_document(bytes).await.expect("report");

    assert!(!report.fragments.is_empty());
    assert_eq!(report.failed_pages(), 0, "{}", report.render());
}
