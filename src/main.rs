use clap::Parser;
use topicmap::cli::{Cli, Command};
use topicmap::{cmd_cluster, cmd_graph, cmd_init, logging};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli.config.as_deref();
    let exit_code = match cli.command {
        Command::Cluster(args) => cmd_cluster(args, config),
        Command::Graph(args) => cmd_graph(args, config),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}
