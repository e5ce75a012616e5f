//! Walk every page of a listing
//!
//! Uploads a batch of files, then follows page tokens until the listing is
//! exhausted.
//!
//! Run with: cargo run --example list_all

use files_client::{FilesClient, ListFilesOptions};
use futures::TryStreamExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let endpoint =
        std::env::var("FILES_ENDPOINT").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let client = FilesClient::with_endpoint(&endpoint)?;

    println!("📤 Uploading 25 files under 'batch/'...");
    for i in 0..25 {
        client
            .upload(&format!("batch/file_{i:02}.txt"), format!("file {i}"), Some("text/plain"))
            .await?;
    }

    let options = ListFilesOptions::default()
        .with_directory("batch/")
        .with_page_size(10);

    let mut pages = std::pin::pin!(client.pages(options));
    let mut page_number = 0;
    while let Some(page) = pages.try_next().await? {
        page_number += 1;
        println!(
            "📄 Page {page_number}: {} files, more: {}",
            page.files.len(),
            page.next_page_token.is_some()
        );
    }

    for i in 0..25 {
        client.delete(&format!("batch/file_{i:02}.txt")).await?;
    }
    println!("🧹 Cleaned up");

    Ok(())
}
