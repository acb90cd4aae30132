#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lexai::cli::run().await
}
