use branching_tree::LibraryError;
use branching_tree::run;

fn main() -> Result<(), LibraryError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    run(std::env::args().collect())
}
