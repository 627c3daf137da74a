#[tokio::main]
async fn main() -> anyhow::Result<()> {
    notecards_backend::run().await
}
