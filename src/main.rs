use mailioc::app::App;
use mailioc::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::from_args();

    match App::run(&cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
