use log::{debug, error};
use recipe_loader::{fetch_recipe_details, fetch_recipes, LoaderConfig, SourceFactory};
use std::env;

const USAGE: &str = "Usage: recipe-loader [<source>] [--pages N] [--detail <url>] | --list-sources";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = LoaderConfig::load()?;
    debug!("{:#?}", config);

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return Ok(());
    }
    if args.iter().any(|a| a == "--list-sources") {
        for name in SourceFactory::available_sources() {
            println!("{name}");
        }
        return Ok(());
    }

    let mut source = config.default_source.clone();
    let mut pages = config.max_pages;
    let mut detail_url = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--pages" => {
                let value = args.next().ok_or("--pages needs a number")?;
                pages = value.parse()?;
            }
            "--detail" => {
                detail_url = Some(args.next().ok_or("--detail needs a URL")?);
            }
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown option {flag}\n{USAGE}").into());
            }
            name => source = name.to_string(),
        }
    }

    match detail_url {
        Some(url) => match fetch_recipe_details(&source, &url, &config).await? {
            Some(recipe) => println!("{}", serde_json::to_string_pretty(&recipe)?),
            None => {
                error!("Unable to parse a recipe from {url}");
                std::process::exit(1);
            }
        },
        None => {
            let recipes = fetch_recipes(&source, pages, &config).await?;
            println!("{}", serde_json::to_string_pretty(&recipes)?);
        }
    }

    Ok(())
}
