fn main() -> anyhow::Result<()> {
    subsorganizer::cli::run_cli()
}
