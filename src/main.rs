use anyhow::{Context, Result, bail};
use tubelist::{Query, QueryEngine, QuerySpec, config::Config, model::ChannelSource};

const USAGE: &str = "usage: tubelist <trending | search <text...> | channel <ref> | playlist <id> | channels>";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let query = parse_query(&config, std::env::args().skip(1).collect())?;
    let spec = QuerySpec::from_config(query, &config);

    let engine = QueryEngine::from_config(&config).context("failed to build http client")?;
    for record in engine.run(&spec).await {
        println!("{}", serde_json::to_string(&record)?);
    }
    Ok(())
}

fn parse_query(config: &Config, args: Vec<String>) -> Result<Query> {
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    let query = match (command.as_str(), rest) {
        ("trending", []) => Query::Trending,
        ("search", words) if !words.is_empty() => Query::Search {
            text: words.join(" "),
        },
        ("channel", [reference]) => Query::ChannelVideos {
            channel: ChannelSource::parse(reference)?,
        },
        ("playlist", [playlist_id]) => Query::PlaylistVideos {
            playlist_id: playlist_id.clone(),
        },
        ("channels", []) => Query::ChannelDirectory {
            sources: config.channel_sources(),
        },
        _ => bail!(USAGE),
    };
    Ok(query)
}
