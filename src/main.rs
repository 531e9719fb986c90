use eco_store::{EcoError, Manager, Record, StoreOptions, config::LogConfig};
use mimalloc::MiMalloc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "usage: eco-store <get ID | set ID DATA | update ID DATA | del ID | list | drop>";

#[derive(Debug)]
enum Command {
    Get(String),
    Set(Record),
    Update(Record),
    Del(String),
    List,
    Drop,
}

fn parse_command(args: &[String]) -> Option<Command> {
    let parse_record = |id: &String, data: &String| -> Option<Record> {
        Some(Record::new(id.clone(), data.parse().ok()?))
    };
    match args {
        [cmd, id] if cmd == "get" => Some(Command::Get(id.clone())),
        [cmd, id, data] if cmd == "set" => parse_record(id, data).map(Command::Set),
        [cmd, id, data] if cmd == "update" => parse_record(id, data).map(Command::Update),
        [cmd, id] if cmd == "del" => Some(Command::Del(id.clone())),
        [cmd] if cmd == "list" => Some(Command::List),
        [cmd] if cmd == "drop" => Some(Command::Drop),
        _ => None,
    }
}

async fn run(manager: &Manager, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Get(id) => match manager.read(&id).await? {
            Some(rec) => println!("{}", serde_json::to_string(&rec)?),
            None => println!("null"),
        },
        Command::Set(rec) => {
            let res = manager.write(&rec).await?;
            info!(id = %rec.id, rows_affected = res.rows_affected(), "write");
        }
        Command::Update(rec) => {
            let res = manager.update(&rec).await?;
            info!(id = %rec.id, rows_affected = res.rows_affected(), "update");
        }
        Command::Del(id) => println!("{}", manager.delete(&id).await?),
        Command::List => println!("{}", serde_json::to_string_pretty(&manager.read_all().await?)?),
        Command::Drop => {
            manager.delete_all().await?;
            info!(table = %manager.table(), "table dropped");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let log_cfg = LogConfig::load()?;
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_cfg.log.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = parse_command(&args) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let opts = StoreOptions::load()?;
    info!(
        host = %opts.host,
        port = opts.port,
        database = %opts.database,
        table = %opts.table_name()
    );

    let manager = Manager::new(opts).with_listener(|msg| info!("{msg}"));
    if let Err(e) = manager.init_database().await {
        error!(error = %e, "could not connect");
        return Err(e.into());
    }

    if let Err(e) = run(&manager, command).await {
        if e.downcast_ref::<EcoError>().is_some_and(EcoError::is_local) {
            eprintln!("{USAGE}");
        }
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_known_commands() {
        assert!(matches!(parse_command(&args(&["get", "alice"])), Some(Command::Get(id)) if id == "alice"));
        assert!(matches!(
            parse_command(&args(&["set", "alice", "100"])),
            Some(Command::Set(rec)) if rec == Record::new("alice", 100)
        ));
        assert!(matches!(parse_command(&args(&["list"])), Some(Command::List)));
        assert!(matches!(parse_command(&args(&["drop"])), Some(Command::Drop)));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_command(&args(&[])).is_none());
        assert!(parse_command(&args(&["set", "alice", "lots"])).is_none());
        assert!(parse_command(&args(&["frobnicate"])).is_none());
    }
}
