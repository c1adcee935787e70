use csr_plot::plot::{parse_cli, PlotCommand};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let request = parse_cli();
    match &request.output {
        Some(fout) => log::info!(
            "plot {} to {}",
            request.input_file.display(),
            fout.display()
        ),
        None => log::info!("plot {}", request.input_file.display()),
    }
    let command = PlotCommand::new(request.title, request.output);
    if let Err(e) = command.plot(&request.input_file) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
