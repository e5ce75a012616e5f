//! Quickstart for the files API
//!
//! This example demonstrates:
//! - Uploading a file (created, then overwritten)
//! - Reading its metadata and content
//! - Listing a directory
//! - Deleting the file
//!
//! Start a gateway first, for example with the in-memory backend:
//!
//!     cargo run -p files-cli -- --bucket demo --backend memory
//!
//! Then run with: cargo run --example quickstart

use files_client::{FilesClient, ListFilesOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let endpoint =
        std::env::var("FILES_ENDPOINT").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let client = FilesClient::with_endpoint(&endpoint)?;

    println!("🚀 Files API - Quickstart ({endpoint})\n");

    println!("📤 Uploading 'docs/hello.txt'...");
    let result = client
        .upload("docs/hello.txt", "Hello, World!", Some("text/plain"))
        .await?;
    println!("   {} (created: {})", result.message, result.created);

    let result = client
        .upload("docs/hello.txt", "Hello again!", Some("text/plain"))
        .await?;
    println!("   {} (created: {})", result.message, result.created);

    println!("\n🔎 Metadata...");
    let info = client.head("docs/hello.txt").await?;
    println!(
        "   type: {:?}, length: {:?}, modified: {:?}",
        info.content_type, info.content_length, info.last_modified
    );

    println!("\n📥 Downloading...");
    let content = client.get("docs/hello.txt").await?;
    println!("   {}", String::from_utf8_lossy(&content.data));

    println!("\n📋 Listing 'docs/'...");
    let page = client
        .list(&ListFilesOptions::default().with_directory("docs/"))
        .await?;
    for file in &page.files {
        println!("   - {} ({} bytes)", file.file_path, file.size_bytes);
    }

    println!("\n🗑️  Deleting...");
    client.delete("docs/hello.txt").await?;
    println!("   exists afterwards: {}", client.exists("docs/hello.txt").await?);

    println!("\n✅ Done");
    Ok(())
}
