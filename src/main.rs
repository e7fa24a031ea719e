use anyhow::Result;

fn main() -> Result<()> {
    pal::cli::run()
}
