//! Declare an endpoint and fetch it on both lanes.
//!
//! Run with `cargo run --example basic_fetch`.

use std::time::Duration;

use lane_http::{Client, Lane, Method, ParameterEncoding, Parameters, Router, StaticEndpoint, Task};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client = Client::new("demo", Router::default());

    let mut query = Parameters::new();
    query.insert("q".to_string(), json!("lane_http"));
    query.insert("page".to_string(), json!(1));

    let search = StaticEndpoint::new("https://httpbin.org", "/get")
        .with_method(Method::Get)
        .with_task(Task::WithParameters {
            body: None,
            query: Some(query),
            encoding: ParameterEncoding::Url,
        });

    // Waiting dispatch on the serial lane; the outcome arrives through the
    // callback once the exchange settles.
    let (sent, outcome) = tokio::sync::oneshot::channel();
    client
        .fetch(search, Lane::Serial, move |outcome| {
            let _ = sent.send(outcome);
        })
        .await;
    match outcome.await? {
        Ok(body) => println!("search: {} bytes", body.len()),
        Err(error) => eprintln!("search failed: {error}"),
    }

    // Fire-and-forget on the parallel lane, delayed by a second.
    let (sent, outcome) = tokio::sync::oneshot::channel();
    let delayed = StaticEndpoint::new("https://httpbin.org", "/uuid");
    client.spawn_fetch_after(delayed, Lane::Parallel, Duration::from_secs(1), move |outcome| {
        let _ = sent.send(outcome);
    });
    match outcome.await? {
        Ok(body) => println!("delayed: {}", String::from_utf8_lossy(&body)),
        Err(error) => eprintln!("delayed fetch failed: {error}"),
    }

    Ok(())
}
