#[tokio::main]
async fn main() {
    if let Err(e) = lumina_lib::run().await {
        eprintln!("lumina: {}", e);
        std::process::exit(1);
    }
}
