use std::process::ExitCode;

mod app {
    pub(crate) mod bootstrap;
    mod gameplay;
    pub(crate) mod loop_runner;
}

fn main() -> ExitCode {
    let wiring = app::bootstrap::build_app();
    app::loop_runner::run(wiring)
}
