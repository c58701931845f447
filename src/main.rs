#[tokio::main]
async fn main() -> std::io::Result<()> {
    triage_backend::run().await
}
