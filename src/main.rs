use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use log::error;

use dnswalk::{domain, Config, IterativeResolver, NetTransport, SystemResolver};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Walk from the root servers down to the authoritative server
    Iterative,
    /// Ask the system resolver
    Recursive,
}

#[derive(Debug, Parser)]
#[command(name = "resolve", about = "Resolve a domain name to an IPv4 address")]
struct Cli {
    #[arg(value_enum)]
    mode: Mode,
    domain: String,
}

fn parse_args() -> Result<Cli, ExitCode> {
    Cli::try_parse().map_err(|err| {
        use clap::error::ErrorKind;
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                ExitCode::SUCCESS
            }
            ErrorKind::InvalidValue => {
                eprintln!("Error: First argument must be 'iterative' or 'recursive'.");
                ExitCode::FAILURE
            }
            _ => {
                eprintln!("Usage: resolve <iterative|recursive> <domain>");
                ExitCode::FAILURE
            }
        }
    })
}

async fn run(mode: Mode, domain: &str) {
    let system = match SystemResolver::new() {
        Ok(system) => system,
        Err(err) => {
            println!("[ERROR] {}", err);
            return;
        }
    };

    match mode {
        Mode::Iterative => {
            let resolver = IterativeResolver::new(NetTransport, system, Config::default());
            match resolver.resolve(domain).await {
                Ok(resolution) => println!("[SUCCESS] {} -> {}", domain, resolution.address),
                Err(err) => println!("[ERROR] {}", err),
            }
        }
        Mode::Recursive => match system.recursive_lookup(domain).await {
            Ok(answer) => {
                for ns in &answer.nameservers {
                    println!("[SUCCESS] {} -> {}", domain, ns);
                }
                for ip in &answer.addresses {
                    println!("[SUCCESS] {} -> {}", domain, ip);
                }
            }
            Err(err) => println!("[ERROR] {}", err),
        },
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(code) => return code,
    };

    let domain = match domain::prepare(&cli.domain) {
        Ok(domain) => domain,
        Err(err) => {
            error!("{}", err);
            println!("Invalid domain");
            return ExitCode::FAILURE;
        }
    };
    if !domain.contains('.') {
        println!("Error: Invalid domain format.");
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("could not start runtime: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    runtime.block_on(run(cli.mode, &domain));
    println!("Time taken: {:.3} seconds", start.elapsed().as_secs_f64());

    ExitCode::SUCCESS
}
