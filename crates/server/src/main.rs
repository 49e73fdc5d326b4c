#[tokio::main]
async fn main() -> anyhow::Result<()> {
    agritrust_server::start().await
}
