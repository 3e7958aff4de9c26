#[tokio::main]
async fn main() {
    profile_server::start_server().await;
}
