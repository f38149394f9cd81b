use std::process;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::error;

use msk_locator::config::DEFAULT_RADIUS;
use msk_locator::{
    dataset, AppConfig, Coordinate, CoordinateSystem, CoordinateTransformer, Error, GeodeticPoint, MapLinks,
    Result, SearchMode, SpatialQueryEngine, TextSearchEngine,
};

fn cli() -> Command {
    Command::new("msk-locator")
        .about("Look up survey points in a local MSK grid")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE")
                .default_value("msk-locator.toml")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print results as JSON")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a coordinate pair between msk, sk42 and wgs84")
                .arg(Arg::new("from").long("from").value_name("SYSTEM").default_value("msk"))
                .arg(Arg::new("to").long("to").value_name("SYSTEM").default_value("wgs84"))
                .arg(
                    Arg::new("x")
                        .help("Northing, or latitude for wgs84")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64))
                        .index(1),
                )
                .arg(
                    Arg::new("y")
                        .help("Easting, or longitude for wgs84")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64))
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("search")
                .about("Find points by name")
                .arg(Arg::new("term").required(true).index(1))
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .value_name("MODE")
                        .help("contains or exact")
                        .default_value("contains"),
                )
                .arg(
                    Arg::new("normalize")
                        .short('n')
                        .long("normalize")
                        .help("Ignore . _ , - when comparing names")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("nearby")
                .about("List points within a radius of a record or a WGS-84 position")
                .arg(Arg::new("id").long("id").value_name("ID").conflicts_with_all(["lat", "lon"]))
                .arg(
                    Arg::new("lat")
                        .long("lat")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64))
                        .requires("lon"),
                )
                .arg(
                    Arg::new("lon")
                        .long("lon")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64))
                        .requires("lat"),
                )
                .arg(
                    Arg::new("radius")
                        .short('r')
                        .long("radius")
                        .value_name("METERS")
                        .value_parser(value_parser!(f64)),
                ),
        )
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("msk-locator.toml");
    let config = AppConfig::from_path(config_path)?;
    let transformer = CoordinateTransformer::with_cache_capacity(&config.zone, config.cache_capacity)?;

    match matches.subcommand() {
        Some(("convert", sub)) => convert(&transformer, sub),
        Some(("search", sub)) => search(&config, &transformer, sub),
        Some(("nearby", sub)) => nearby(&config, &transformer, sub),
        _ => Err(Error::Query("no command given".to_string())),
    }
}

fn load_records(config: &AppConfig) -> Result<Vec<msk_locator::Record>> {
    match &config.records {
        Some(path) => dataset::load_records_from_path(path),
        None => Err(Error::Configuration("`records` is not set in the configuration".to_string())),
    }
}

fn system_arg(matches: &ArgMatches, name: &str) -> Result<CoordinateSystem> {
    matches
        .get_one::<String>(name)
        .ok_or_else(|| Error::Query(format!("missing --{}", name)))?
        .parse()
}

fn convert(transformer: &CoordinateTransformer, matches: &ArgMatches) -> Result<()> {
    let from = system_arg(matches, "from")?;
    let to = system_arg(matches, "to")?;
    let x = matches.get_one::<f64>("x").copied().unwrap_or_default();
    let y = matches.get_one::<f64>("y").copied().unwrap_or_default();

    let result = transformer.transform(Coordinate::new(x, y), from, to)?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{} -> {}", from.description(transformer.zone()), to.description(transformer.zone()));
    if to.is_planar() {
        println!("x={:.3} y={:.3}", result.x, result.y);
    } else {
        println!("lat={:.8} lon={:.8}", result.x, result.y);
        let links = MapLinks::new(GeodeticPoint::from(result), msk_locator::links::DEFAULT_ZOOM);
        println!("{}", links.google);
        println!("{}", links.yandex);
    }

    Ok(())
}

fn search(config: &AppConfig, transformer: &CoordinateTransformer, matches: &ArgMatches) -> Result<()> {
    let records = load_records(config)?;
    let term = matches.get_one::<String>("term").map(String::as_str).unwrap_or("");
    let mode: SearchMode = matches
        .get_one::<String>("mode")
        .map(String::as_str)
        .unwrap_or("contains")
        .parse()?;
    let normalize = matches.get_flag("normalize");

    let hits = TextSearchEngine::new().search(&records, term, mode, normalize);

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    println!("{} match(es)", hits.len());

    for record in hits {
        print!("{:<12} {:<20} x={:.3} y={:.3}", record.id, record.name, record.planar.x, record.planar.y);
        match transformer.to_geodetic(record.planar) {
            Ok(point) => println!("  lat={:.7} lon={:.7}", point.lat, point.lon),
            Err(_) => println!(),
        }
    }

    Ok(())
}

fn nearby(config: &AppConfig, transformer: &CoordinateTransformer, matches: &ArgMatches) -> Result<()> {
    let records = load_records(config)?;
    let radius = matches
        .get_one::<f64>("radius")
        .copied()
        .unwrap_or(if config.default_radius > 0.0 { config.default_radius } else { DEFAULT_RADIUS });
    let engine = SpatialQueryEngine::new(transformer);

    let hits = if let Some(id) = matches.get_one::<String>("id") {
        let reference = records
            .iter()
            .find(|record| &record.id == id)
            .ok_or_else(|| Error::Query(format!("unknown record: {}", id)))?;
        engine.nearby_record(&records, reference, radius)?
    } else {
        let lat = matches.get_one::<f64>("lat").copied();
        let lon = matches.get_one::<f64>("lon").copied();
        match (lat, lon) {
            (Some(lat), Some(lon)) => engine.nearby_from_geodetic(&records, GeodeticPoint::new(lat, lon), radius)?,
            _ => return Err(Error::Query("give either --id or --lat/--lon".to_string())),
        }
    };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    println!("{} point(s) within {} m", hits.len(), radius);
    for hit in hits {
        println!("{:>8.1} m  {:<12} {}", hit.distance, hit.record.id, hit.record.name);
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = cli().get_matches();

    if let Err(e) = run(&matches) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
