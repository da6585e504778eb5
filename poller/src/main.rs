mod client;
mod commander;
mod host;
mod poll;
mod reader;
#[cfg(test)]
mod testing;
mod token;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    host::run().await
}
