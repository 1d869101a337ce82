fn main() {
    #[cfg(feature = "cli")]
    magicblock::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("magicblock: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
