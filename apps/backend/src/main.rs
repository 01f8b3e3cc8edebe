#[tokio::main]
async fn main() -> anyhow::Result<()> {
    split_deck_backend::run().await
}
