#[tokio::main]
async fn main() -> anyhow::Result<()> {
    donation::start_server().await
}
