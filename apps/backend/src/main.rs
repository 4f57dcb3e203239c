#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gramvoc_backend::run().await
}
