use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = ptwater::cli::Cli::parse();
    let exit_code = ptwater::run(cli).await;
    std::process::exit(exit_code);
}
