use anyhow::Result;
use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use curio::build::build_site;
use curio::config::Config;
use curio::listing::{list_page, requested_page, show_post};
use env_logger::{Builder, Env};
use log::{error, info};
use std::path::Path;

fn init_logger() {
    // RUST_LOG overrides; info by default
    Builder::from_env(Env::default().default_filter_or("info")).init();
}

fn project_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("project")
        .long("project")
        .short("p")
        .takes_value(true)
        .default_value(".")
        .help("The project directory (or any directory beneath it)")
}

fn main() {
    init_logger();

    let matches = App::new("curio")
        .version(crate_version!())
        .about("Builds a static blog with a paginated index")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("build")
                .about("Builds the site into the output directory")
                .arg(project_arg())
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .takes_value(true)
                        .help("The output directory (default: {project}/_output)"),
                ),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("Prints one page of the blog index")
                .arg(project_arg())
                .arg(
                    Arg::with_name("page")
                        .long("page")
                        .takes_value(true)
                        .allow_hyphen_values(true)
                        .conflicts_with("query")
                        .help("The page number to show"),
                )
                .arg(
                    Arg::with_name("query")
                        .long("query")
                        .takes_value(true)
                        .help("A URL query string to read the page from, e.g. `page=2`"),
                ),
        )
        .subcommand(
            SubCommand::with_name("show")
                .about("Prints a single post's metadata and HTML body")
                .arg(project_arg())
                .arg(Arg::with_name("slug").required(true).help("The post's slug")),
        )
        .get_matches();

    let result = match matches.subcommand() {
        ("build", Some(m)) => build(m),
        ("list", Some(m)) => list(m),
        ("show", Some(m)) => show(m),
        _ => Ok(()),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn build(matches: &ArgMatches) -> Result<()> {
    let project = Path::new(matches.value_of("project").unwrap_or("."));
    let config = Config::from_directory(project, matches.value_of("output").map(Path::new))?;
    let report = build_site(config)?;
    info!(
        "built {} posts into {} pages ({} static files)",
        report.posts, report.pages, report.static_files
    );
    Ok(())
}

fn list(matches: &ArgMatches) -> Result<()> {
    let project = Path::new(matches.value_of("project").unwrap_or("."));
    let config = Config::from_directory(project, None)?;
    let page = requested_page(matches.value_of("page"), matches.value_of("query"));
    print!("{}", list_page(&config, page)?);
    Ok(())
}

fn show(matches: &ArgMatches) -> Result<()> {
    let project = Path::new(matches.value_of("project").unwrap_or("."));
    let config = Config::from_directory(project, None)?;
    print!("{}", show_post(&config, matches.value_of("slug").unwrap_or_default())?);
    Ok(())
}
