//! Example: a full refresh run against a mock backend, no Ollama needed.
//!
//! Run with: `cargo run --example mock_run`

use std::sync::Arc;

use listing_refresh::{GenerationConfig, MockBackend, MockReply, NewProperty, Refresher, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = Store::open(&dir.path().join("demo.db")).await?;

    store
        .insert_property(&NewProperty {
            title: "Cabin".into(),
            description: "A small cabin near the lake.".into(),
            rating: 4.5,
            location: Some("Lake Tahoe".into()),
            amenities: vec!["WiFi".into(), "Fireplace".into()],
        })
        .await?;

    // Canned replies, fragmented the way a live stream would arrive.
    let mock = MockBackend::new(vec![
        MockReply::stream([
            "Title: Serene Lakeside",
            " Cabin\nDescription: Wake up to still water and pine air",
            " in this warm two-person hideaway.",
        ]),
        MockReply::stream(["A warm lakeside cabin for two,", " steps from the water."]),
    ]);

    let refresher = Refresher::new(GenerationConfig::default()).with_backend(Arc::new(mock));
    let report = refresher.run(&store).await?;

    println!(
        "updated {} of {} properties",
        report.updated, report.processed
    );
    for property in store.list_properties().await? {
        println!();
        println!("Title:       {}", property.title);
        println!("Description: {}", property.description);
        if let Some(summary) = store.get_summary(property.id).await? {
            println!("Summary:     {}", summary.summary);
        }
    }

    Ok(())
}
