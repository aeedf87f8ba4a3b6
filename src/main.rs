use clap::Parser;
use cms_feed::{reading_time, utils, CmsApiSource, FeedAggregator, FetchConfig, Query};
use std::sync::Arc;
use tracing::{error, info};

/// Fetch a paginated post feed from a headless CMS and print it.
#[derive(Parser, Debug)]
#[command(name = "cms-feed", about = "Paginated content-feed aggregator for a headless CMS")]
struct Args {
    /// Base URL of the CMS API, e.g. https://myrepo.cdn.prismic.io/api/v2
    #[arg(long)]
    api_url: String,

    /// Document type to query.
    #[arg(long, default_value = "post")]
    document_type: String,

    /// Documents per page.
    #[arg(long, default_value_t = 20)]
    page_size: u32,

    /// Stop after this many pages even if the feed has more.
    #[arg(long, default_value_t = 5)]
    max_pages: u32,

    /// Access token for private repositories.
    #[arg(long)]
    access_token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    info!("Starting cms-feed against {}", args.api_url);

    let mut source = CmsApiSource::new(args.api_url.as_str(), FetchConfig::default())?;
    if let Some(token) = &args.access_token {
        source = source.with_access_token(token.as_str());
    }

    let query = Query::new(args.document_type.as_str()).with_fields(vec![
        format!("{}.title", args.document_type),
        format!("{}.subtitle", args.document_type),
        format!("{}.author", args.document_type),
        format!("{}.banner", args.document_type),
        format!("{}.content", args.document_type),
    ]);

    let feed = FeedAggregator::new(Arc::new(source), query, args.page_size);

    let mut new_posts = feed.seed_from_source().await?;
    let mut pages_loaded = 1;

    loop {
        for post in &new_posts {
            let date = post
                .publication_date
                .as_ref()
                .map(utils::format_publication_date)
                .unwrap_or_else(|| "undated".to_string());
            println!(
                "{} | {} | {} | {} min read",
                date,
                post.title,
                post.author,
                reading_time::estimate(post)
            );
        }

        if pages_loaded >= args.max_pages || !feed.has_more().await {
            break;
        }

        match feed.load_next().await {
            Ok(posts) => {
                new_posts = posts;
                pages_loaded += 1;
            }
            Err(e) if e.is_transient() => {
                // Previously printed posts stay valid; the caller owns retry
                // policy, and here we simply stop.
                error!("Load more failed (retriable): {}", e);
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(
        "Done: feed {}: {} posts across {} pages (exhausted: {})",
        feed.id(),
        feed.len().await,
        pages_loaded,
        !feed.has_more().await
    );
    Ok(())
}
