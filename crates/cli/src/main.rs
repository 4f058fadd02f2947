fn main() -> anyhow::Result<()> {
    trailscope_cli::run()
}
