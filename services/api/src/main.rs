use fundability_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("fundability: {err}");
        std::process::exit(1);
    }
}
