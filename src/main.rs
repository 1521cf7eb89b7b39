use colored::Colorize;

fn main() {
    env_logger::init();
    let command_line_interface = json_marshal::cli::CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(3);
    }
}
