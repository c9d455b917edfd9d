use clap::{App, Arg, ArgMatches, SubCommand};
use env_logger::Env;
use log::{error, info};
use worldnbt::{NamedCompound, Value};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn read_archive(args: &ArgMatches) -> Result<NamedCompound> {
    let path = args.value_of("file").ok_or("no file given")?;
    let data = std::fs::read(path)?;
    info!("read {} bytes from {}", data.len(), path);

    let mut archive = None;
    worldnbt::parse(&data, |res| archive = Some(res))?;

    Ok(archive.ok_or("archive was not parsed")??)
}

fn dump(args: &ArgMatches) -> Result<()> {
    let archive = read_archive(args)?;

    if args.is_present("json") {
        println!("{}", serde_json::to_string_pretty(&archive)?);
    } else {
        println!("{:#?}", archive);
    }
    Ok(())
}

fn get(args: &ArgMatches) -> Result<()> {
    let archive = read_archive(args)?;
    let pointer = args.value_of("pointer").ok_or("no pointer given")?;

    match archive.pointer(pointer) {
        Some(Value::String(s)) => println!("{}", s),
        Some(v) if args.is_present("json") => println!("{}", serde_json::to_string_pretty(v)?),
        Some(v) => println!("{:#?}", v),
        None => return Err(format!("nothing at {}", pointer).into()),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let file = Arg::with_name("file")
        .takes_value(true)
        .required(true)
        .help("NBT file, optionally gzip compressed, eg level.dat");
    let json = Arg::with_name("json")
        .long("json")
        .takes_value(false)
        .required(false)
        .help("print as JSON rather than Rust debug output");

    let matches = App::new("nbt-dump")
        .subcommand(
            SubCommand::with_name("dump")
                .about("print a whole archive")
                .arg(file.clone())
                .arg(json.clone()),
        )
        .subcommand(
            SubCommand::with_name("get")
                .about("print the value at a pointer, eg /Data/LevelName")
                .arg(file)
                .arg(
                    Arg::with_name("pointer")
                        .takes_value(true)
                        .required(true),
                )
                .arg(json),
        )
        .get_matches();

    match matches.subcommand() {
        ("dump", Some(args)) => dump(args)?,
        ("get", Some(args)) => get(args)?,
        _ => error!("{}", matches.usage()),
    };

    Ok(())
}
