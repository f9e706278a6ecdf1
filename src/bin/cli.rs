use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    todo_mcp::cli::run().await
}
