use std::env;

use serde_json::json;

#[tokio::main]
async fn main() {
    let base = env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let client = reqwest::Client::new();

    let update = client
        .post(format!("{base}/update-profile"))
        .json(&json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "interests": "hiking, jazz"
        }))
        .send()
        .await
        .unwrap();

    println!("update-profile: {}", update.status());
    println!("{}", update.text().await.unwrap());

    let profile = client
        .get(format!("{base}/get-profile"))
        .send()
        .await
        .unwrap();

    println!("get-profile: {}", profile.status());
    println!("{}", profile.text().await.unwrap());
}
