use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub struct Cli {
    pub config_path: Option<PathBuf>,
    pub port: Option<u16>,
}

impl From<ArgMatches> for Cli {
    fn from(matches: ArgMatches) -> Self {
        Cli {
            config_path: matches.get_one::<PathBuf>("config").cloned(),
            port: matches.get_one::<u16>("port").copied(),
        }
    }
}

pub fn command() -> Command {
    Command::new("dockgate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("inspect, start, stop and restart docker containers over http")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML configuration file, DOCKGATE_* variables override it")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("port to listen on, overrides the configuration")
                .value_name("PORT")
                .value_parser(clap::value_parser!(u16)),
        )
}

pub fn configure_cli() -> Cli {
    command().get_matches().into()
}

#[test]
fn test_parse_arguments() {
    let cli: Cli = command()
        .try_get_matches_from(["dockgate", "--config", "/etc/dockgate.toml", "-p", "4000"])
        .unwrap()
        .into();
    assert_eq!(cli.config_path, Some(PathBuf::from("/etc/dockgate.toml")));
    assert_eq!(cli.port, Some(4000));

    let cli: Cli = command().try_get_matches_from(["dockgate"]).unwrap().into();
    assert!(cli.config_path.is_none());
    assert!(cli.port.is_none());
}
